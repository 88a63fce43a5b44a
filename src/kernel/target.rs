//! Build target classification for traced builds.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::BuildTarget;

// Kbuild derives `foo.o` from either `foo.c` or `foo.S`.
static SOURCE_EXTENSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[cS]$").expect("Invalid source extension regex"));

/// Classify a target path by its suffix.
///
/// - `x/y.c`, `x/y.S` → object `x/y.o`
/// - `x/y.o` → object `x/y.o`
/// - anything else → module directory `x/y/` (exactly one trailing slash)
pub fn classify_target(target_path: &str) -> BuildTarget {
    if SOURCE_EXTENSION_REGEX.is_match(target_path) {
        let object = SOURCE_EXTENSION_REGEX.replace(target_path, ".o");
        return BuildTarget::Object(object.into_owned());
    }

    if target_path.ends_with(".o") {
        return BuildTarget::Object(target_path.to_string());
    }

    BuildTarget::Module(normalize_module_dir(target_path))
}

fn normalize_module_dir(dir: &str) -> String {
    format!("{}/", dir.trim_end_matches('/'))
}
