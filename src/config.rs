//! Viewer settings resolved from the environment.

use std::path::PathBuf;

use directories::ProjectDirs;

pub const DATA_DIR_ENV: &str = "TASKORBIT_DATA_DIR";
pub const TEXTURE_SIZE_ENV: &str = "TASKORBIT_TEXTURE_SIZE";

pub const DEFAULT_TEXTURE_SIZE: u32 = 128;
const MIN_TEXTURE_SIZE: u32 = 16;
const MAX_TEXTURE_SIZE: u32 = 1024;

/// Used when the platform reports no home directory.
const FALLBACK_DATA_DIR: &str = ".taskorbit";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub data_dir: PathBuf,
    pub texture_size: u32,
    pub window_size: [f32; 2],
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let texture_size = match lookup(TEXTURE_SIZE_ENV) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) => size.clamp(MIN_TEXTURE_SIZE, MAX_TEXTURE_SIZE),
                Err(e) => {
                    log::warn!("Ignoring {}={:?}: {}", TEXTURE_SIZE_ENV, raw, e);
                    DEFAULT_TEXTURE_SIZE
                }
            },
            None => DEFAULT_TEXTURE_SIZE,
        };

        Self {
            data_dir,
            texture_size,
            window_size: [1280.0, 800.0],
        }
    }
}

/// Platform data directory, e.g. `~/.local/share/taskorbit` on Linux.
fn default_data_dir() -> PathBuf {
    match ProjectDirs::from("dev", "taskorbit", "taskorbit") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => {
            log::warn!("No home directory; storing data in ./{}", FALLBACK_DATA_DIR);
            PathBuf::from(FALLBACK_DATA_DIR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ViewerConfig {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ViewerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.texture_size, DEFAULT_TEXTURE_SIZE);
        assert_eq!(cfg.window_size, [1280.0, 800.0]);
        assert!(!cfg.data_dir.as_os_str().is_empty());
    }

    #[test]
    fn data_dir_override() {
        let cfg = config(&[(DATA_DIR_ENV, "  /tmp/orbit  ")]);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/orbit"));
        let blank = config(&[(DATA_DIR_ENV, "   ")]);
        assert_ne!(blank.data_dir, PathBuf::from(""));
    }

    #[test]
    fn texture_size_is_clamped_or_defaulted() {
        assert_eq!(config(&[(TEXTURE_SIZE_ENV, "4")]).texture_size, 16);
        assert_eq!(config(&[(TEXTURE_SIZE_ENV, "4096")]).texture_size, 1024);
        assert_eq!(config(&[(TEXTURE_SIZE_ENV, "256")]).texture_size, 256);
        assert_eq!(config(&[(TEXTURE_SIZE_ENV, "big")]).texture_size, DEFAULT_TEXTURE_SIZE);
    }
}
