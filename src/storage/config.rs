use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde::Deserialize;


pub const APP_DIR: &str = "preset-rename-history";
pub const PRESET_USER_DIR: &str = "user";
pub const HISTORY_FILE: &str = "rename_history.json";
pub const DEFAULT_MAX_RESOLVE_DEPTH: usize = 32;


#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub max_resolve_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: history_path(default_data_dir().as_path()),
            max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
        }
    }
}

impl HistoryConfig {

    /// Config rooted at `data_dir`, keeping the usual `user/rename_history.json` layout.
    pub fn in_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: history_path(data_dir.as_ref()),
            ..Self::default()
        }
    }
}


pub fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn history_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PRESET_USER_DIR).join(HISTORY_FILE)
}


#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn data_dir_layout() {
        let cfg = HistoryConfig::in_data_dir("/tmp/slicer");
        assert_eq!(cfg.path, PathBuf::from("/tmp/slicer/user/rename_history.json"));
        assert_eq!(cfg.max_resolve_depth, 32);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: HistoryConfig = serde_json::from_str(r#"{ "max_resolve_depth": 4 }"#).unwrap();
        assert_eq!(cfg.max_resolve_depth, 4);
        assert!(cfg.path.ends_with("user/rename_history.json"));
    }
}
