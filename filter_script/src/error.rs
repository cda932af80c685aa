use std::path::PathBuf;

/// Errors raised by the translation layer.
///
/// Malformed script lines are never errors; they are skipped. What remains
/// are integration mistakes and settings-file problems.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("block group hierarchy builder used without an initialised root")]
    HierarchyNotInitialised,
    #[error("unable to read settings file '{}': {source}", .path.display())]
    SettingsIo { path: PathBuf, source: std::io::Error },
    #[error("invalid settings file '{}': {source}", .path.display())]
    SettingsToml { path: PathBuf, source: toml::de::Error },
}
