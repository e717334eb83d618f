//! Reusable UI components and formatting

use eframe::egui;
use wallet_details_core::{Network, ToastLevel};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 212, 170);

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(ACCENT));
}

/// Section header with separator
pub fn section_header(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(text).strong().size(14.0));
    });
    ui.separator();
}

/// Labeled field with copy button. Returns true when the button was clicked.
pub fn labeled_field_with_copy(ui: &mut egui::Ui, label: &str, value: &str, hint: &str) -> bool {
    let mut copied = false;
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(format!("{}:", label)).strong());
        ui.label(egui::RichText::new(value).monospace());
        if ui.small_button("📋").on_hover_text(hint).clicked() {
            copied = true;
        }
    });
    copied
}

pub fn labeled_value(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(format!("{}:", label)).strong());
        ui.label(value);
    });
}

pub fn toast_color(level: ToastLevel) -> egui::Color32 {
    match level {
        ToastLevel::Success => ACCENT,
        ToastLevel::Warning => egui::Color32::from_rgb(220, 180, 50),
        ToastLevel::Error => egui::Color32::from_rgb(220, 50, 50),
    }
}

/// Token amount with the network symbol, trimmed of trailing zeros.
pub fn format_token(network: &Network, amount: u64) -> String {
    let whole = network.to_whole_units(amount);
    let text = format!("{:.*}", network.decimals as usize, whole);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    format!("{} {}", network.symbol, text)
}

pub fn format_fiat(symbol: &str, value: f64) -> String {
    format!("{} {:.2}", symbol, value)
}

pub fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}
