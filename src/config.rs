use serde::Serialize;
use serde::Deserialize;

use crate::storage::config::HistoryConfig;


#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
}
