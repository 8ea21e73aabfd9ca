//! Nearby network scan handler.

use tabled::Tabled;

use opdi_core::{PollKind, ScanResult};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{Device, fetch};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ScanRow {
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "RSSI")]
    rssi: i32,
    #[tabled(rename = "Auth")]
    auth: String,
    #[tabled(rename = "Ch")]
    channel: u8,
    #[tabled(rename = "BSSID")]
    bssid: String,
}

impl From<&ScanResult> for ScanRow {
    fn from(s: &ScanResult) -> Self {
        Self {
            ssid: s.ssid.clone().unwrap_or_else(|| "<hidden>".into()),
            rssi: s.rssi,
            auth: s.auth.to_string(),
            channel: s.channel,
            bssid: s.bssid.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(device: &Device, summary: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let kind = if summary {
        PollKind::ScanSummary
    } else {
        PollKind::Scan
    };
    let snap = fetch(device, &[kind]).await?;

    // Strongest first
    let mut results = snap.scan.as_ref().clone();
    results.sort_by(|a, b| b.rssi.cmp(&a.rssi));

    let out = output::render_list(&global.output, &results, |s| ScanRow::from(s), |s| {
        s.ssid.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
