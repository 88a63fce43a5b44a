//! `codeql database create` command construction.

use std::path::Path;

use crate::config::Settings;
use crate::models::{shell_join, BuildTarget, ExternalCommand};

/// The `make` invocation traced in build mode.
pub fn build_invocation(settings: &Settings, target: &BuildTarget) -> Vec<String> {
    let mut words = vec![settings.make_program.clone()];
    if settings.jobs > 0 {
        words.push(format!("-j{}", settings.jobs));
    }
    words.extend(target.make_args());
    words
}

/// Database creation driven by a traced `make` build, run from the tree root.
pub fn traced_build_command(
    settings: &Settings,
    root: &Path,
    database: &Path,
    target: &BuildTarget,
) -> ExternalCommand {
    let build = shell_join(&build_invocation(settings, target));

    database_create(settings, root, database)
        .arg(format!("--command={}", build))
        .args(settings.extra_codeql_args.iter().cloned())
        .arg("--overwrite")
}

/// Source-only database creation (`--build-mode=none`) over `source_root`.
pub fn source_scan_command(
    settings: &Settings,
    root: &Path,
    database: &Path,
    source_root: &Path,
) -> ExternalCommand {
    database_create(settings, root, database)
        .arg("--build-mode=none")
        .arg(format!("--source-root={}", source_root.display()))
        .args(settings.extra_codeql_args.iter().cloned())
        .arg("--overwrite")
}

fn database_create(settings: &Settings, root: &Path, database: &Path) -> ExternalCommand {
    ExternalCommand::new(&settings.codeql_program, root)
        .args(["database", "create"])
        .arg(database.to_string_lossy())
        .arg(format!("--language={}", settings.language))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            jobs: 8,
            ..Settings::default()
        }
    }

    #[test]
    fn test_traced_build_command_for_object() {
        let cmd = traced_build_command(
            &settings(),
            Path::new("/linux"),
            Path::new("/dbs/db_2025_38245"),
            &BuildTarget::Object("net/atm/mpoa.o".to_string()),
        );

        assert_eq!(cmd.program, "codeql");
        assert_eq!(
            cmd.args,
            vec![
                "database",
                "create",
                "/dbs/db_2025_38245",
                "--language=cpp",
                "--command=make -j8 net/atm/mpoa.o",
                "--overwrite",
            ]
        );
        assert_eq!(cmd.working_dir, Path::new("/linux"));
    }

    #[test]
    fn test_traced_build_command_for_module() {
        let cmd = traced_build_command(
            &Settings {
                jobs: 0,
                ..Settings::default()
            },
            Path::new("/linux"),
            Path::new("/dbs/db_x"),
            &BuildTarget::Module("drivers/net/".to_string()),
        );
        assert!(cmd.args.contains(&"--command=make M=drivers/net/".to_string()));
    }

    #[test]
    fn test_build_command_quotes_special_paths() {
        let words = build_invocation(
            &settings(),
            &BuildTarget::Object("odd dir/it's.o".to_string()),
        );
        assert_eq!(
            shell_join(&words),
            r"make -j8 'odd dir/it'\''s.o'"
        );
    }

    #[test]
    fn test_source_scan_command() {
        let cmd = source_scan_command(
            &settings(),
            Path::new("/linux"),
            Path::new("/dbs/db_2025_38245_none"),
            Path::new("/linux/net/atm"),
        );
        assert_eq!(
            cmd.args,
            vec![
                "database",
                "create",
                "/dbs/db_2025_38245_none",
                "--language=cpp",
                "--build-mode=none",
                "--source-root=/linux/net/atm",
                "--overwrite",
            ]
        );
    }

    #[test]
    fn test_extra_args_precede_overwrite() {
        let settings = Settings {
            extra_codeql_args: vec!["--threads=4".to_string()],
            ..settings()
        };
        let cmd = source_scan_command(
            &settings,
            Path::new("/linux"),
            Path::new("/dbs/db"),
            Path::new("/linux/net"),
        );
        let n = cmd.args.len();
        assert_eq!(cmd.args[n - 2], "--threads=4");
        assert_eq!(cmd.args[n - 1], "--overwrite");
    }
}
