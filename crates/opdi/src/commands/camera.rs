//! Camera settings and still capture handlers.

use std::io::Write;

use bytesize::ByteSize;

use opdi_core::{CameraConfig, CameraSettings, Command as CoreCommand, PollKind};

use crate::cli::{CameraArgs, CameraCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Device, fetch};

fn detail(cam: &CameraConfig) -> String {
    [
        format!("Brightness:     {}", cam.brightness),
        format!("Contrast:       {}", cam.contrast),
        format!("Saturation:     {}", cam.saturation),
        format!(
            "Auto exposure:  {}",
            if cam.auto_exposure { "on" } else { "off" }
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(device: &Device, args: CameraArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        CameraCommand::Show => {
            let snap = fetch(device, &[PollKind::CameraConfig]).await?;
            let cam = snap.camera.unwrap_or_default();
            let out = output::render_single(&global.output, &cam, detail, |c| {
                output::render_json(c, true)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CameraCommand::Set {
            resolution,
            quality,
            brightness,
            contrast,
            saturation,
            auto_exposure,
        } => {
            let settings = CameraSettings {
                resolution,
                quality,
                brightness,
                contrast,
                saturation,
                auto_exposure,
            };
            device
                .execute(CoreCommand::SetCameraConfig(settings))
                .await?;
            if !global.quiet {
                eprintln!("Camera settings updated");
            }
            Ok(())
        }

        CameraCommand::Snapshot { out } => {
            let jpeg = device
                .transport()
                .camera_snapshot()
                .await
                .map_err(opdi_core::CoreError::from)?;

            if out.as_os_str() == "-" {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&jpeg)?;
                stdout.flush()?;
            } else {
                std::fs::write(&out, &jpeg)?;
                if !global.quiet {
                    eprintln!(
                        "Saved {} to {}",
                        ByteSize(u64::try_from(jpeg.len()).unwrap_or(u64::MAX)),
                        out.display()
                    );
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_spells_out_exposure() {
        let text = detail(&CameraConfig {
            brightness: 1,
            contrast: 0,
            saturation: -2,
            auto_exposure: true,
        });
        assert!(text.contains("Saturation:     -2"));
        assert!(text.contains("Auto exposure:  on"));
    }
}
