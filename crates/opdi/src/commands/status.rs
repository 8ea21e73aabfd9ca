//! Read-only device queries: status, metrics, version, system info, logs.

use tabled::Tabled;

use opdi_core::{DeviceLogLine, DeviceState, Metrics, PollKind};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{Device, fetch};

// ── Detail views ────────────────────────────────────────────────────

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub(crate) fn state_detail(state: &DeviceState, color: bool) -> String {
    let mut lines = vec![
        format!("Mode:     {}", output::paint_mode(state.mode, color)),
        format!("IP:       {}", or_dash(state.ip.as_deref())),
        format!("Gateway:  {}", or_dash(state.gateway.as_deref())),
        format!(
            "RSSI:     {}",
            state
                .rssi
                .map_or_else(|| "-".into(), |rssi| format!("{rssi} dBm"))
        ),
    ];
    if let Some(ref ap) = state.ap_config {
        lines.push(format!("AP SSID:  {}", ap.ssid));
        lines.push(format!("AP Chan:  {}", ap.channel));
    }
    lines.join("\n")
}

fn metrics_detail(m: &Metrics) -> String {
    [
        format!("Attempts:     {}", m.attempts),
        format!("Successes:    {}", m.successes),
        format!("Avg connect:  {} ms", m.avg_latency_ms),
        format!("Scans:        {}", m.scan_count),
        format!("Retries:      {}", m.retry_count),
    ]
    .join("\n")
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&DeviceLogLine> for LogRow {
    fn from(line: &DeviceLogLine) -> Self {
        Self {
            uptime: format_uptime(line.uptime_ms),
            message: line.message.clone(),
        }
    }
}

fn format_uptime(ms: u64) -> String {
    format!("{}.{:03}s", ms / 1000, ms % 1000)
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn status(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = fetch(device, &[PollKind::Status]).await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &snap.state,
        |s| state_detail(s, color),
        |s| s.mode.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn metrics(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = fetch(device, &[PollKind::Metrics]).await?;
    let out = output::render_single(&global.output, &snap.metrics, metrics_detail, |m| {
        format!("{}/{}", m.successes, m.attempts)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn version(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = fetch(device, &[PollKind::Version]).await?;
    let value = snap.version.clone().unwrap_or_default();
    let out = output::render_single(&global.output, &value, output::render_value_detail, |v| {
        output::render_json(v, true)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn sysinfo(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = fetch(device, &[PollKind::SystemInfo]).await?;
    let value = snap.system_info.clone().unwrap_or_default();
    let out = output::render_single(&global.output, &value, output::render_value_detail, |v| {
        output::render_json(v, true)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn logs(device: &Device, tail: Option<usize>, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = fetch(device, &[PollKind::Logs]).await?;
    let lines = snap.device_logs.as_slice();
    let start = tail.map_or(0, |n| lines.len().saturating_sub(n));
    let shown = lines.get(start..).unwrap_or_default();

    let out = output::render_list(&global.output, shown, |l| LogRow::from(l), |l| {
        format!("{} {}", format_uptime(l.uptime_ms), l.message)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
