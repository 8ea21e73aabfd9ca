//! Live view: runs the synchronizer and prints each published snapshot.

use owo_colors::OwoColorize;
use tokio::sync::broadcast::error::RecvError;

use opdi_core::{DeviceSnapshot, LogEntry};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::Device;

/// One line per snapshot.
pub(crate) fn summary_line(snap: &DeviceSnapshot, color: bool) -> String {
    let state = &snap.state;
    let mut line = format!(
        "#{:<5} {}",
        snap.sequence,
        output::paint_mode(state.mode, color)
    );
    if let Some(ref ip) = state.ip {
        line.push_str(&format!("  ip={ip}"));
    }
    if let Some(rssi) = state.rssi {
        line.push_str(&format!("  rssi={rssi}dBm"));
    }
    if let Some(ref ap) = state.ap_config {
        line.push_str(&format!("  ap={}/{}", ap.ssid, ap.channel));
    }
    line.push_str(&format!(
        "  stream={}",
        output::paint_phase(snap.stream.phase, color)
    ));
    if let Some(delay) = snap.stream.next_delay_ms {
        line.push_str(&format!(" (retry #{} in {delay}ms)", snap.stream.attempt));
    }
    if !snap.poll_errors.is_empty() {
        let failed: Vec<String> = snap.poll_errors.keys().map(ToString::to_string).collect();
        let note = format!("  failing: {}", failed.join(","));
        if color {
            line.push_str(&note.red().to_string());
        } else {
            line.push_str(&note);
        }
    }
    line
}

fn render_snapshot(snap: &DeviceSnapshot, format: &OutputFormat, color: bool) -> String {
    match format {
        OutputFormat::Table => summary_line(snap, color),
        OutputFormat::Plain => snap.state.mode.to_string(),
        // One document per line so the output can be piped
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(snap, true),
        OutputFormat::Yaml => format!("---\n{}", output::render_yaml(snap)),
    }
}

fn render_log(entry: &LogEntry, color: bool) -> String {
    let at = entry.at.format("%H:%M:%S%.3f");
    let kind = format!("[{}]", entry.kind);
    if color {
        format!("{} {} {}", at.dimmed(), kind.dimmed(), entry.message)
    } else {
        format!("{at} {kind} {}", entry.message)
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(device: &Device, args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut snapshots = device.subscribe();
    let mut log = device.event_log();

    device.start().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            biased;

            signal = &mut ctrl_c => {
                break signal.map_err(CliError::from);
            }

            snap = snapshots.changed() => {
                let Some(snap) = snap else {
                    break Ok(());
                };
                output::print_output(&render_snapshot(&snap, &global.output, color), global.quiet);
            }

            entry = log.recv(), if args.events => match entry {
                Ok(entry) => eprintln!("{}", render_log(&entry, color)),
                Err(RecvError::Lagged(skipped)) => {
                    eprintln!("... {skipped} log entries skipped");
                }
                Err(RecvError::Closed) => break Ok(()),
            },
        }
    };

    device.stop().await;
    result
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use opdi_core::{DeviceMode, LogKind, PollKind, StreamPhase};

    use super::*;

    #[test]
    fn summary_shows_address_and_stream() {
        let mut snap = DeviceSnapshot::initial();
        snap.sequence = 7;
        snap.state.mode = DeviceMode::StaConnected;
        snap.state.ip = Some("192.168.1.23".into());
        snap.state.rssi = Some(-58);
        snap.stream.phase = StreamPhase::Open;

        assert_eq!(
            summary_line(&snap, false),
            "#7     sta_connected  ip=192.168.1.23  rssi=-58dBm  stream=open"
        );
    }

    #[test]
    fn summary_flags_retry_and_failing_polls() {
        let mut snap = DeviceSnapshot::initial();
        snap.stream.phase = StreamPhase::Disconnected;
        snap.stream.attempt = 2;
        snap.stream.next_delay_ms = Some(2000);
        snap.poll_errors
            .insert(PollKind::Profiles, "timed out".into());

        let line = summary_line(&snap, false);
        assert!(line.contains("stream=disconnected (retry #2 in 2000ms)"));
        assert!(line.ends_with("failing: profiles"));
    }

    #[test]
    fn log_line_without_color() {
        let entry = LogEntry {
            at: chrono::Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            kind: LogKind::Command,
            message: "connect ok".into(),
        };
        assert_eq!(render_log(&entry, false), "03:04:05.000 [command] connect ok");
    }
}
