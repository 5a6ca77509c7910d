/// Centralized platform-specific path computation
///
/// Follows the XDG Base Directory specification on Unix-like systems.
use std::path::PathBuf;

/// Platform-agnostic path utilities
pub struct PlatformPaths;

impl PlatformPaths {
    fn env_path(var: &str) -> Option<PathBuf> {
        std::env::var(var).ok().map(PathBuf::from)
    }

    fn home_joined(suffix: &str) -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(suffix))
    }

    /// Get the appropriate data directory for the current platform
    ///
    /// - Windows: %LOCALAPPDATA%
    /// - macOS: ~/Library/Application Support
    /// - Linux/Unix: $XDG_DATA_HOME or ~/.local/share
    pub fn data_dir() -> PathBuf {
        let dir = if cfg!(target_os = "windows") {
            Self::env_path("LOCALAPPDATA")
        } else if cfg!(target_os = "macos") {
            Self::home_joined("Library/Application Support")
        } else {
            Self::env_path("XDG_DATA_HOME").or_else(|| Self::home_joined(".local/share"))
        };
        dir.unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the appropriate config directory for the current platform
    ///
    /// - Windows: %APPDATA%
    /// - macOS: ~/Library/Application Support
    /// - Linux/Unix: $XDG_CONFIG_HOME or ~/.config
    pub fn config_dir() -> PathBuf {
        let dir = if cfg!(target_os = "windows") {
            Self::env_path("APPDATA")
        } else if cfg!(target_os = "macos") {
            Self::home_joined("Library/Application Support")
        } else {
            Self::env_path("XDG_CONFIG_HOME").or_else(|| Self::home_joined(".config"))
        };
        dir.unwrap_or_else(|| PathBuf::from("."))
    }

    /// Default directory for this crate's durable data
    pub fn project_data_dir() -> PathBuf {
        Self::data_dir().join("commit-pulse")
    }

    /// Default path of the JSON commit store
    pub fn default_store_path() -> PathBuf {
        Self::project_data_dir().join("commits.json")
    }

    /// Default path of the TOML configuration file
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("commit-pulse").join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_path_under_data_dir() {
        let path = PlatformPaths::default_store_path();
        assert!(path.ends_with("commit-pulse/commits.json"));
    }

    #[test]
    fn test_config_path_filename() {
        let path = PlatformPaths::default_config_path();
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
