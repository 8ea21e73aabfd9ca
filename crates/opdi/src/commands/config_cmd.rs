//! Config subcommand handlers.

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, DeviceEntry};
use crate::error::CliError;
use crate::output;

use super::util::{confirm, prompt_err};

// ── Helpers ─────────────────────────────────────────────────────────

fn device_names(cfg: &Config) -> Vec<&str> {
    cfg.devices.keys().map(String::as_str).collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_path(global);
            eprintln!("OPDI CLI configuration");
            eprintln!("   Config path: {}\n", path.display());

            if path.exists() && !confirm("A config file already exists. Overwrite it?", global.yes)? {
                return Ok(());
            }

            let name: String = Input::new()
                .with_prompt("Device name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let url: String = Input::new()
                .with_prompt("Device URL")
                .default("http://192.168.4.1".into())
                .interact_text()
                .map_err(prompt_err)?;

            let entry = DeviceEntry {
                url,
                ..DeviceEntry::default()
            };
            let mut cfg = Config::default();
            // Reject an unusable URL before writing anything
            config::device_to_sync_config(&entry, &cfg.defaults)?;

            cfg.default_device = Some(name.clone());
            cfg.devices.insert(name.clone(), entry);
            config::save(&cfg, global)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Default device: {name}");
            eprintln!("\n  Test it: opdi status");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let text = cfg.to_toml()?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| text.trim_end().to_owned(),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path(global).display());
            Ok(())
        }

        // ── Devices ─────────────────────────────────────────────────
        ConfigCommand::Devices => {
            let cfg = config::load(global)?;
            let default = cfg.default_device.as_deref().unwrap_or("default");
            if cfg.devices.is_empty() {
                eprintln!("No devices configured. Run: opdi config init");
            } else {
                for name in device_names(&cfg) {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;

            if !cfg.devices.contains_key(&name) {
                let available = device_names(&cfg);
                return Err(CliError::UnknownDevice {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_device = Some(name.clone());
            config::save(&cfg, global)?;
            if !global.quiet {
                eprintln!("✓ Default device set to '{name}'");
            }
            Ok(())
        }
    }
}
