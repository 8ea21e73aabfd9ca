//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod ap;
pub mod camera;
pub mod config_cmd;
pub mod profiles;
pub mod scan;
pub mod status;
pub mod util;
pub mod watch;

use std::time::Duration;

use opdi_api::DeviceClient;
use opdi_core::{DeviceSnapshot, PollKind, SyncConfig, Synchronizer, build_client, fetch_once};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Synchronizer over the real HTTP/WebSocket transport.
pub type Device = Synchronizer<DeviceClient>;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    mut config: SyncConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Watch(ref args) = cmd {
        config.stream_enabled &= !args.no_stream;
        if let Some(ms) = args.interval_ms {
            if ms == 0 {
                return Err(CliError::Validation {
                    field: "interval-ms".into(),
                    reason: "must be greater than zero".into(),
                });
            }
            config.poll_interval = Duration::from_millis(ms);
        }
    }

    let client = build_client(&config)?;
    let device = Synchronizer::new(config, client);

    match cmd {
        Command::Status => status::status(&device, global).await,
        Command::Metrics => status::metrics(&device, global).await,
        Command::Version => status::version(&device, global).await,
        Command::Sysinfo => status::sysinfo(&device, global).await,
        Command::Logs { tail } => status::logs(&device, tail, global).await,
        Command::Watch(args) => watch::handle(&device, &args, global).await,
        Command::Profiles(args) => profiles::handle(&device, args, global).await,
        Command::Connect { ssid } => profiles::connect(&device, ssid, global).await,
        Command::Scan { summary } => scan::handle(&device, summary, global).await,
        Command::Ap(args) => ap::handle(&device, args, global).await,
        Command::Camera(args) => camera::handle(&device, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not talk to a device".into(),
        )),
    }
}

/// Poll once and reconcile, without starting background tasks.
pub(crate) async fn fetch(device: &Device, kinds: &[PollKind]) -> Result<DeviceSnapshot, CliError> {
    Ok(fetch_once(device.transport().as_ref(), kinds).await?)
}
