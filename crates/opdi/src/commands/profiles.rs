//! Saved Wi-Fi profile and station connect handlers.

use secrecy::SecretString;
use tabled::Tabled;

use opdi_core::{Command as CoreCommand, CoreError, PollKind, Profile};

use crate::cli::{GlobalOpts, ProfilesArgs, ProfilesCommand};
use crate::error::CliError;
use crate::output;

use super::util::{confirm, prompt_err};
use super::{Device, fetch};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SSID Len")]
    ssid_length: u32,
    #[tabled(rename = "Hidden")]
    hidden: String,
    #[tabled(rename = "Successes")]
    successes: u32,
}

impl From<&Profile> for ProfileRow {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id.clone(),
            ssid_length: p.ssid_length,
            hidden: if p.hidden { "yes" } else { "no" }.into(),
            successes: p.success_count,
        }
    }
}

fn resolve_psk(psk: Option<String>, ask: bool) -> Result<Option<SecretString>, CliError> {
    let raw = match psk {
        Some(psk) => Some(psk),
        None if ask => Some(rpassword::prompt_password("Pre-shared key: ").map_err(prompt_err)?),
        None => None,
    };
    Ok(raw.filter(|p| !p.is_empty()).map(SecretString::from))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    device: &Device,
    args: ProfilesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProfilesCommand::List => {
            let snap = fetch(device, &[PollKind::Profiles]).await?;
            let out = output::render_list(
                &global.output,
                snap.profiles.as_slice(),
                |p| ProfileRow::from(p),
                |p| p.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfilesCommand::Add {
            ssid,
            psk,
            ask_psk,
            hidden,
        } => {
            let psk = resolve_psk(psk, ask_psk)?;
            device
                .execute(CoreCommand::AddProfile {
                    ssid: ssid.clone(),
                    psk,
                    hidden,
                })
                .await?;
            if !global.quiet {
                eprintln!("Profile for '{ssid}' saved");
            }
            Ok(())
        }

        ProfilesCommand::Delete { id } => {
            if !confirm(&format!("Delete profile {id}?"), global.yes)? {
                return Ok(());
            }
            match device
                .execute(CoreCommand::DeleteProfile { id: id.clone() })
                .await
            {
                Ok(_) => {}
                Err(CoreError::NotFound { .. }) => {
                    return Err(CliError::NotFound {
                        resource_type: "profile".into(),
                        identifier: id,
                        list_command: "profiles list".into(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
            if !global.quiet {
                eprintln!("Profile {id} deleted");
            }
            Ok(())
        }
    }
}

pub async fn connect(
    device: &Device,
    ssid: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = ssid.clone();
    device.execute(CoreCommand::Connect { ssid }).await?;
    if !global.quiet {
        match target {
            Some(ssid) => eprintln!("Connecting to '{ssid}'"),
            None => eprintln!("Connecting to the best known network"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn empty_psk_means_open_network() {
        assert!(resolve_psk(Some(String::new()), false).unwrap().is_none());
        assert!(resolve_psk(None, false).unwrap().is_none());
    }

    #[test]
    fn given_psk_is_kept() {
        let psk = resolve_psk(Some("hunter22".into()), false).unwrap().unwrap();
        assert_eq!(psk.expose_secret(), "hunter22");
    }
}
