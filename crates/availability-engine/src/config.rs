//! Engine configuration, loadable from a JSON file.
//!
//! Every field is optional in the file; omitted fields take their defaults.
//!
//! ```json
//! {
//!   "resolve": { "defaultWindow": { "start": "08:00", "end": "18:00" } },
//!   "retry": { "maxAttempts": 3, "initialBackoffMs": 500 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolver::ResolveOptions;
use crate::retry::BackoffPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub resolve: ResolveOptions,
    pub retry: BackoffPolicy,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
