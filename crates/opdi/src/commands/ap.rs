//! Soft-AP settings handlers.

use opdi_core::{ApConfig, Command as CoreCommand, PollKind};

use crate::cli::{ApArgs, ApCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Device, fetch};

fn detail(ap: &ApConfig) -> String {
    [
        format!("SSID:     {}", ap.ssid),
        format!("Channel:  {}", ap.channel),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(device: &Device, args: ApArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ApCommand::Show => {
            let snap = fetch(device, &[PollKind::ApConfig]).await?;
            let Some(ap) = snap.state.ap_config else {
                return Err(CliError::NotFound {
                    resource_type: "AP config".into(),
                    identifier: "ap".into(),
                    list_command: "status".into(),
                });
            };
            let out = output::render_single(&global.output, &ap, detail, |a| a.ssid.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApCommand::Set { ssid, channel } => {
            device
                .execute(CoreCommand::SetApConfig { ssid, channel })
                .await?;
            if !global.quiet {
                eprintln!("AP settings updated");
            }
            Ok(())
        }
    }
}
