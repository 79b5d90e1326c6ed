//! Resource directory path resolution.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the resource directory.
pub const RESOURCES_ENV_VAR: &str = "NOTICE_RESOURCES_DIR";

/// Get the resource root directory.
///
/// Resolution order:
/// 1. `NOTICE_RESOURCES_DIR` environment variable
/// 2. `resources/` directory relative to workspace root
pub fn resources_root() -> PathBuf {
    if let Ok(root) = std::env::var(RESOURCES_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../resources")
}

/// Directory holding `prune-<CODE>.json` tables.
pub fn prune_rules_dir(root: &Path) -> PathBuf {
    root.join("prune-rules")
}

/// Directory holding one sub-directory per SDK version.
pub fn sdk_dir(root: &Path) -> PathBuf {
    root.join("sdk")
}

pub(crate) fn fields_json(version_dir: &Path) -> PathBuf {
    version_dir.join("fields").join("fields.json")
}

pub(crate) fn notice_types_json(version_dir: &Path) -> PathBuf {
    version_dir.join("notice-types").join("notice-types.json")
}

pub(crate) fn translation_file(version_dir: &Path, asset: &str, lang: &str) -> PathBuf {
    version_dir
        .join("translations")
        .join(format!("{asset}_{lang}.xml"))
}
