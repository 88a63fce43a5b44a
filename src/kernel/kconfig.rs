//! Kernel configuration preparation for traced builds.
//!
//! Resets the tree to a pristine state, generates the default configuration
//! and enables exactly one option through the kernel's own `scripts/config`.

use std::path::Path;

use crate::config::Settings;
use crate::error::{KconfigError, PrepStep};
use crate::models::ExternalCommand;
use crate::system::Workspace;

/// The three preparation commands, in execution order.
pub fn preparation_steps(
    settings: &Settings,
    root: &Path,
    option: &str,
) -> Vec<(PrepStep, ExternalCommand)> {
    let scripts_config = root.join("scripts").join("config");

    vec![
        (
            PrepStep::Mrproper,
            ExternalCommand::new(&settings.make_program, root).arg("mrproper"),
        ),
        (
            PrepStep::Defconfig,
            ExternalCommand::new(&settings.make_program, root).arg("defconfig"),
        ),
        (
            PrepStep::EnableOption,
            ExternalCommand::new(scripts_config.to_string_lossy(), root)
                .arg("--enable")
                .arg(option),
        ),
    ]
}

/// Run preparation steps in order, stopping at the first failure.
///
/// Nothing is reverted when a step fails; the tree is left as the failed
/// step left it.
pub fn run_preparation(
    workspace: &mut dyn Workspace,
    steps: &[(PrepStep, ExternalCommand)],
) -> Result<(), KconfigError> {
    for (step, command) in steps {
        log::info!(target: "parsed", "[Kconfig] [{}] {}", step, command);

        let status = workspace
            .run(command)
            .map_err(|source| KconfigError::Spawn {
                step: *step,
                source,
            })?;

        if !status.success() {
            log::error!("[Kconfig] [{}] failed with {}", step, status);
            return Err(KconfigError::StepFailed {
                step: *step,
                status,
            });
        }
    }

    log::info!("[Kconfig] ✓ Build configuration prepared");
    Ok(())
}
