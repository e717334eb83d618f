//! Flat key → text table built from nested i18n JSON
//! (`{"PAGE": {"KEY": "text"}}` becomes `PAGE.KEY`).

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use wallet_details_core::{PortError, TranslationPort};

const EN: &str = include_str!("../assets/i18n/en.json");

#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    pub fn english() -> Result<Self, PortError> {
        Self::from_json(EN)
    }

    pub fn from_json(raw: &str) -> Result<Self, PortError> {
        let root: Value = serde_json::from_str(raw)
            .map_err(|e| PortError::Validation(format!("translation table: {e}")))?;
        let mut entries = HashMap::new();
        flatten(None, &root, &mut entries)?;
        Ok(Self { entries })
    }

    /// Falls back to the key itself so missing entries stay visible.
    pub fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(
    prefix: Option<&str>,
    value: &Value,
    out: &mut HashMap<String, String>,
) -> Result<(), PortError> {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = match prefix {
                    Some(p) => format!("{p}.{k}"),
                    None => k.clone(),
                };
                flatten(Some(&key), v, out)?;
            }
            Ok(())
        }
        Value::String(text) => {
            if let Some(key) = prefix {
                out.insert(key.to_owned(), text.clone());
            }
            Ok(())
        }
        other => Err(PortError::Validation(format!(
            "translation {} is not text: {other}",
            prefix.unwrap_or("<root>")
        ))),
    }
}

#[async_trait]
impl TranslationPort for TranslationTable {
    async fn get(&self, key: &str) -> Result<String, PortError> {
        Ok(self.translate(key))
    }
}
