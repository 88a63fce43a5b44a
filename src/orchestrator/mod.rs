//! Workflow orchestration: validation, planning and the linear execution
//! sequence of a single analysis run.
//!
//! ```text
//! validate → plan → checkout → [mrproper → defconfig → enable option] → codeql
//! ```
//!
//! The bracketed steps only run in build mode. In no-build mode the target
//! directory is checked after checkout instead. Every step is fatal on
//! failure and nothing is rolled back.

pub mod command;
pub mod executor;
pub mod naming;
pub mod validator;

use std::path::{Component, Path, PathBuf};

use crate::config::Settings;
use crate::error::{OperationError, PrepStep, Result};
use crate::kernel::{kconfig, target};
use crate::models::{
    BuildPlan, BuildTarget, ExternalCommand, InvocationParams, OutputIdentifier,
    ResolvedRevision, RunOutcome,
};
use crate::system::Workspace;

pub use executor::report_line;
pub use naming::{output_identifier, resolve_revision};
pub use validator::{check_argument_count, validate_invocation, USAGE};

/// Everything a run will do, computed before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPlan {
    pub revision: ResolvedRevision,
    pub identifier: OutputIdentifier,
    pub database: PathBuf,
    /// Kconfig steps; empty in no-build mode.
    pub preparation: Vec<(PrepStep, ExternalCommand)>,
    /// Traced build target in build mode.
    pub target: Option<BuildTarget>,
    /// Directory that must exist after checkout in no-build mode.
    pub source_root: Option<PathBuf>,
    pub command: ExternalCommand,
}

impl AnalysisPlan {
    /// Human-readable plan, one line per entry.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![
            format!("revision:   {}", self.revision),
            format!("identifier: {}", self.identifier),
            format!("database:   {}", self.database.display()),
        ];
        if let Some(target) = &self.target {
            lines.push(format!("target:     {}", target));
        }
        if let Some(source_root) = &self.source_root {
            lines.push(format!("sources:    {}", source_root.display()));
        }
        for (step, command) in &self.preparation {
            lines.push(format!("prepare:    [{}] {}", step, command));
        }
        lines.push(format!("analyze:    {}", self.command));
        lines
    }
}

/// Sequences one analysis run against a workspace.
pub struct Workflow<'a> {
    workspace: &'a mut dyn Workspace,
    settings: &'a Settings,
}

impl<'a> Workflow<'a> {
    pub fn new(workspace: &'a mut dyn Workspace, settings: &'a Settings) -> Self {
        Workflow {
            workspace,
            settings,
        }
    }

    /// Validate raw positional arguments. Never mutates the workspace.
    pub fn validate(&self, args: &[String]) -> Result<InvocationParams> {
        validate_invocation(args, &*self.workspace, self.settings)
    }

    /// Derive names and construct every command for `params`.
    pub fn plan(&self, params: &InvocationParams) -> AnalysisPlan {
        let root = self.workspace.root();
        let revision = resolve_revision(&params.fix_revision, params.version);
        let identifier = output_identifier(&params.vuln_id, params.plan.selector(), params.version);
        let database = identifier.location_under(&params.output_base);

        match &params.plan {
            BuildPlan::Build { option } => {
                let build_target = target::classify_target(&params.target_path);
                let command =
                    command::traced_build_command(self.settings, root, &database, &build_target);
                AnalysisPlan {
                    preparation: kconfig::preparation_steps(self.settings, root, option),
                    target: Some(build_target),
                    source_root: None,
                    revision,
                    identifier,
                    database,
                    command,
                }
            }
            BuildPlan::NoBuild => {
                let source_root = root.join(&params.target_path);
                let command =
                    command::source_scan_command(self.settings, root, &database, &source_root);
                AnalysisPlan {
                    preparation: Vec::new(),
                    target: None,
                    source_root: Some(source_root),
                    revision,
                    identifier,
                    database,
                    command,
                }
            }
        }
    }

    /// Carry out a plan: checkout, optional preparation, database creation.
    ///
    /// A no-build source root must stay inside the working tree: paths that
    /// leave it lexically are rejected before checkout, and the directory is
    /// resolved again after checkout so symlinks cannot point elsewhere.
    pub fn execute(&mut self, plan: &AnalysisPlan) -> Result<RunOutcome> {
        if let Some(source_root) = &plan.source_root {
            if !is_confined(self.workspace.root(), source_root) {
                return Err(OperationError::TargetDirectoryNotFound(source_root.clone()).into());
            }
        }

        log::info!(target: "parsed", "[Workflow] Checking out {}", plan.revision);
        self.workspace.checkout(&plan.revision)?;

        if !plan.preparation.is_empty() {
            log::info!(target: "parsed", "[Workflow] Preparing build configuration");
            kconfig::run_preparation(&mut *self.workspace, &plan.preparation)?;
        }

        if let Some(source_root) = &plan.source_root {
            let root = self.workspace.root();
            let resolved = self
                .workspace
                .resolve_directory(source_root)
                .filter(|dir| dir.starts_with(root));
            if resolved.is_none() {
                return Err(OperationError::TargetDirectoryNotFound(source_root.clone()).into());
            }
        }

        let outcome = executor::execute_analysis(
            &mut *self.workspace,
            &plan.command,
            &plan.identifier,
            &plan.database,
        )?;
        Ok(outcome)
    }

    /// Validate, plan and execute in one go.
    pub fn run(&mut self, args: &[String]) -> Result<RunOutcome> {
        let params = self.validate(args)?;
        let plan = self.plan(&params);
        self.execute(&plan)
    }
}

/// Whether `path` names `root` or something below it without `..` hops.
fn is_confined(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root).is_ok_and(|rest| {
        rest.components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    })
}
