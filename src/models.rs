//! Core data types for a single analysis run.
//!
//! Everything here is transient: values are built from the command line,
//! flow through one workflow invocation and are dropped at process exit.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Which side of the vulnerability fix to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    /// The immediate ancestor of the fix commit (selector `1`).
    BeforeFix,
    /// The fix commit itself (selector `2`).
    AfterFix,
}

impl VersionSelector {
    /// Parse the positional selector (`"1"` or `"2"`).
    pub fn from_arg(value: &str) -> Option<Self> {
        match value {
            "1" => Some(VersionSelector::BeforeFix),
            "2" => Some(VersionSelector::AfterFix),
            _ => None,
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::BeforeFix => write!(f, "before-fix"),
            VersionSelector::AfterFix => write!(f, "after-fix"),
        }
    }
}

/// Whether the database is extracted from a traced build or from source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSelector {
    /// Trace a real compiler invocation (selector `1`).
    Build,
    /// Scan sources without compiling (selector `2`).
    NoBuild,
}

impl BuildSelector {
    /// Parse the positional selector (`"1"` or `"2"`).
    pub fn from_arg(value: &str) -> Option<Self> {
        match value {
            "1" => Some(BuildSelector::Build),
            "2" => Some(BuildSelector::NoBuild),
            _ => None,
        }
    }
}

impl fmt::Display for BuildSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildSelector::Build => write!(f, "build"),
            BuildSelector::NoBuild => write!(f, "no-build"),
        }
    }
}

/// Build branch of the workflow.
///
/// The configuration option only exists in the `Build` branch, so a plan can
/// never carry an option without a build or a build without an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPlan {
    Build { option: String },
    NoBuild,
}

impl BuildPlan {
    pub fn selector(&self) -> BuildSelector {
        match self {
            BuildPlan::Build { .. } => BuildSelector::Build,
            BuildPlan::NoBuild => BuildSelector::NoBuild,
        }
    }

    /// Configuration option to enable, if building.
    pub fn option(&self) -> Option<&str> {
        match self {
            BuildPlan::Build { option } => Some(option),
            BuildPlan::NoBuild => None,
        }
    }
}

/// Validated command-line parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationParams {
    pub version: VersionSelector,
    pub fix_revision: String,
    pub vuln_id: String,
    pub output_base: PathBuf,
    pub plan: BuildPlan,
    /// Kept as text: classification looks at suffixes and trailing slashes.
    pub target_path: String,
}

/// Concrete revision handed to the checkout step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRevision(String);

impl ResolvedRevision {
    pub fn new(revision: impl Into<String>) -> Self {
        ResolvedRevision(revision.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic database name, e.g. `db_2025_38245_none_fixed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputIdentifier(String);

impl OutputIdentifier {
    pub fn new(identifier: impl Into<String>) -> Self {
        OutputIdentifier(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Database location under `base`.
    pub fn location_under(&self, base: &Path) -> PathBuf {
        base.join(&self.0)
    }
}

impl fmt::Display for OutputIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What `make` is asked to build in build mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildTarget {
    /// A single object file, e.g. `net/atm/mpoa.o`.
    Object(String),
    /// A directory built as an external module; always exactly one trailing `/`.
    Module(String),
}

impl BuildTarget {
    /// Arguments appended to the `make` invocation.
    pub fn make_args(&self) -> Vec<String> {
        match self {
            BuildTarget::Object(object) => vec![object.clone()],
            BuildTarget::Module(dir) => vec![format!("M={}", dir)],
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildTarget::Object(object) => write!(f, "object {}", object),
            BuildTarget::Module(dir) => write!(f, "module {}", dir),
        }
    }
}

/// A fully constructed external process invocation.
///
/// Built once, executed once. Arguments are kept as a list and handed to the
/// OS unchanged, so paths with spaces or quotes need no escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        ExternalCommand {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Shell-quoted rendering for logs and `--command` strings.
    pub fn to_shell_string(&self) -> String {
        shell_join(&self.argv())
    }

    /// A `std::process::Command` with inherited stdio.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(&self.working_dir);
        command
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell_string())
    }
}

/// Join words into a POSIX shell command line, quoting where needed.
pub fn shell_join(words: &[String]) -> String {
    words
        .iter()
        .map(|word| shell_quote(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote a single word for a POSIX shell.
///
/// Words made only of characters the shell never interprets are returned
/// unchanged; anything else is wrapped in single quotes.
pub fn shell_quote(word: &str) -> String {
    let is_plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c));
    if is_plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Exit status of a finished external process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        CommandStatus { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Status to hand back to our own caller: the child's code when it fits in
    /// a byte and is nonzero, `1` for any other failure.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            Some(0) => 0,
            Some(code) => u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1),
            None => 1,
        }
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        CommandStatus {
            code: status.code(),
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Result of the final database-creation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub identifier: OutputIdentifier,
    pub database: PathBuf,
    pub status: CommandStatus,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.status.success()
    }

    pub fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_parse_only_one_and_two() {
        assert_eq!(VersionSelector::from_arg("1"), Some(VersionSelector::BeforeFix));
        assert_eq!(VersionSelector::from_arg("2"), Some(VersionSelector::AfterFix));
        assert_eq!(VersionSelector::from_arg("3"), None);
        assert_eq!(VersionSelector::from_arg(" 1"), None);
        assert_eq!(BuildSelector::from_arg("1"), Some(BuildSelector::Build));
        assert_eq!(BuildSelector::from_arg("2"), Some(BuildSelector::NoBuild));
        assert_eq!(BuildSelector::from_arg(""), None);
    }

    #[test]
    fn test_build_plan_option_only_in_build_branch() {
        let plan = BuildPlan::Build {
            option: "CONFIG_ATM".to_string(),
        };
        assert_eq!(plan.option(), Some("CONFIG_ATM"));
        assert_eq!(plan.selector(), BuildSelector::Build);
        assert_eq!(BuildPlan::NoBuild.option(), None);
    }

    #[test]
    fn test_module_target_uses_m_variable() {
        let target = BuildTarget::Module("drivers/net/".to_string());
        assert_eq!(target.make_args(), vec!["M=drivers/net/".to_string()]);
        let object = BuildTarget::Object("net/atm/mpoa.o".to_string());
        assert_eq!(object.make_args(), vec!["net/atm/mpoa.o".to_string()]);
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("make"), "make");
        assert_eq!(shell_quote("-j8"), "-j8");
        assert_eq!(shell_quote("M=drivers/net/"), "M=drivers/net/");
        assert_eq!(shell_quote("my dir/a.o"), "'my dir/a.o'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("$(rm -rf /)"), "'$(rm -rf /)'");
    }

    #[test]
    fn test_external_command_rendering() {
        let cmd = ExternalCommand::new("make", "/src")
            .arg("-j4")
            .args(["net/atm/mpoa.o"]);
        assert_eq!(cmd.to_shell_string(), "make -j4 net/atm/mpoa.o");
        assert_eq!(cmd.argv().len(), 3);
        assert_eq!(cmd.working_dir, PathBuf::from("/src"));
    }

    #[test]
    fn test_command_status_exit_codes() {
        assert_eq!(CommandStatus::from_code(0).exit_code(), 0);
        assert_eq!(CommandStatus::from_code(2).exit_code(), 2);
        assert_eq!(CommandStatus::from_code(256).exit_code(), 1);
        assert_eq!(CommandStatus::from_code(-1).exit_code(), 1);
        assert_eq!(CommandStatus { code: None }.exit_code(), 1);
        assert!(CommandStatus::from_code(0).success());
        assert!(!CommandStatus { code: None }.success());
    }

    #[test]
    fn test_output_identifier_location() {
        let id = OutputIdentifier::new("db_2025_38245");
        assert_eq!(
            id.location_under(Path::new("/dbs")),
            PathBuf::from("/dbs/db_2025_38245")
        );
    }
}
