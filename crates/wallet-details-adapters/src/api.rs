//! Ark public API client.
//!
//! Only the two calls the details view needs: a wallet's transaction page
//! and the static fee table. Amounts arrive as decimal strings on v2 nodes
//! and as numbers on older ones; both are accepted.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tokio::sync::watch;
use tracing::{debug, warn};

use wallet_details_core::{
    ApiClientPort, Fees, Network, PortError, TimestampMs, Transaction, TransactionListResponse,
};

use crate::config::WalletDetailsConfig;

pub struct ArkApiAdapter {
    client: reqwest::Client,
    base_url: String,
    page_limit: u32,
    network: Network,
    fees_tx: watch::Sender<Option<Fees>>,
}

impl ArkApiAdapter {
    pub fn new(config: &WalletDetailsConfig, network: Network) -> Result<Self, PortError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.api_timeout_ms))
            .build()
            .map_err(|e| PortError::Transport(format!("http client build failed: {e}")))?;
        let (fees_tx, _) = watch::channel(None);
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            page_limit: config.transaction_page_limit,
            network,
            fees_tx,
        })
    }

    /// Fetches the fee table and publishes it to every fee subscriber.
    pub async fn refresh_fees(&self) -> Result<Fees, PortError> {
        let url = format!("{}/transactions/fees", self.base_url);
        let body = self.get_text(&url).await?;
        let fees = parse_fees(&body)?;
        self.fees_tx.send_replace(Some(fees.clone()));
        Ok(fees)
    }

    async fn get_text(&self, url: &str) -> Result<String, PortError> {
        debug!(%url, "api request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("request to {url} failed: {e}")))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(url.to_owned()));
        }
        if !status.is_success() {
            return Err(PortError::Transport(format!("{url} returned {status}")));
        }
        response
            .text()
            .await
            .map_err(|e| PortError::Transport(format!("reading {url} failed: {e}")))
    }
}

#[async_trait]
impl ApiClientPort for ArkApiAdapter {
    fn network(&self) -> Network {
        self.network.clone()
    }

    fn fees(&self) -> watch::Receiver<Option<Fees>> {
        self.fees_tx.subscribe()
    }

    async fn get_transaction_list(
        &self,
        address: &str,
    ) -> Result<TransactionListResponse, PortError> {
        let url = format!(
            "{}/wallets/{}/transactions?limit={}",
            self.base_url, address, self.page_limit
        );
        match self.get_text(&url).await {
            Ok(body) => Ok(TransactionListResponse {
                success: true,
                transactions: parse_transaction_page(&body)?,
            }),
            // The node does not know wallets that never received anything.
            Err(PortError::NotFound(_)) => {
                warn!(%address, "wallet unknown to node");
                Ok(TransactionListResponse {
                    success: true,
                    transactions: Vec::new(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    id: String,
    #[serde(deserialize_with = "lenient_u64")]
    amount: u64,
    #[serde(deserialize_with = "lenient_u64")]
    fee: u64,
    sender: String,
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    vendor_field: Option<String>,
    #[serde(default)]
    confirmations: u32,
    timestamp: RawTimestamp,
}

#[derive(Debug, Deserialize)]
struct RawTimestamp {
    unix: u64,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        Transaction {
            id: raw.id,
            timestamp: TimestampMs(raw.timestamp.unix.saturating_mul(1_000)),
            amount: raw.amount,
            fee: raw.fee,
            sender: raw.sender,
            recipient: raw.recipient,
            vendor_field: raw.vendor_field.filter(|v| !v.is_empty()),
            confirmations: raw.confirmations,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFees {
    #[serde(deserialize_with = "lenient_u64")]
    transfer: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    second_signature: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    delegate_registration: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    vote: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    multi_signature: u64,
}

pub fn parse_transaction_page(body: &str) -> Result<Vec<Transaction>, PortError> {
    let page: Envelope<Vec<RawTransaction>> = serde_json::from_str(body)
        .map_err(|e| PortError::Validation(format!("transaction page: {e}")))?;
    Ok(page.data.into_iter().map(Transaction::from).collect())
}

pub fn parse_fees(body: &str) -> Result<Fees, PortError> {
    let raw: Envelope<RawFees> = serde_json::from_str(body)
        .map_err(|e| PortError::Validation(format!("fee table: {e}")))?;
    let raw = raw.data;
    Ok(Fees {
        transfer: raw.transfer,
        second_signature: raw.second_signature,
        delegate_registration: raw.delegate_registration,
        vote: raw.vote,
        multi_signature: raw.multi_signature,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
