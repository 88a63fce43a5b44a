//! Positional argument validation.
//!
//! Runs to completion before anything touches the tree. Checks happen in a
//! fixed order: argument count, tool availability, version selector, build
//! selector, build option.

use crate::config::Settings;
use crate::error::{AppError, EnvironmentError, UsageError};
use crate::models::{BuildPlan, BuildSelector, InvocationParams, VersionSelector};
use crate::system::Workspace;

pub const USAGE: &str = "analyze <version:1|2> <fix-revision> <vuln-id> <output-base-path> \
<build:1|2> <target-path> [build-option]";

const MIN_ARGS: usize = 6;
const MAX_ARGS: usize = 7;

/// First check of [`validate_invocation`]; needs neither settings nor a tree.
pub fn check_argument_count(args: &[String]) -> Result<(), UsageError> {
    if args.len() < MIN_ARGS || args.len() > MAX_ARGS {
        return Err(UsageError::ArgumentCount(args.len()));
    }
    Ok(())
}

/// Turn raw positional arguments into [`InvocationParams`].
///
/// A relative output base is made absolute against the invoking directory,
/// not the source tree.
pub fn validate_invocation(
    args: &[String],
    workspace: &dyn Workspace,
    settings: &Settings,
) -> Result<InvocationParams, AppError> {
    check_argument_count(args)?;

    if !workspace.tool_available(&settings.codeql_program) {
        return Err(EnvironmentError::ToolNotFound(settings.codeql_program.clone()).into());
    }

    let version = VersionSelector::from_arg(&args[0])
        .ok_or_else(|| UsageError::InvalidVersionSelector(args[0].clone()))?;

    let build = BuildSelector::from_arg(&args[4])
        .ok_or_else(|| UsageError::InvalidBuildSelector(args[4].clone()))?;

    let option = args.get(6).map(|s| s.trim()).filter(|s| !s.is_empty());

    let plan = match (build, option) {
        (BuildSelector::Build, Some(option)) => BuildPlan::Build {
            option: option.to_string(),
        },
        (BuildSelector::Build, None) => return Err(UsageError::MissingBuildOption.into()),
        (BuildSelector::NoBuild, Some(option)) => {
            log::warn!(
                "[Validator] Ignoring build option '{}' in no-build mode",
                option
            );
            BuildPlan::NoBuild
        }
        (BuildSelector::NoBuild, None) => BuildPlan::NoBuild,
    };

    let output_base = std::path::absolute(&args[3])
        .map_err(|e| EnvironmentError::OutputBase(format!("'{}': {}", args[3], e)))?;

    Ok(InvocationParams {
        version,
        fix_revision: args[1].clone(),
        vuln_id: args[2].clone(),
        output_base,
        plan,
        target_path: args[5].clone(),
    })
}
