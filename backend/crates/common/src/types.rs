use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one migration run in logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub name: String,
    pub version: String,
    pub run_id: Uuid,
}

impl RunInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            run_id: Uuid::new_v4(),
        }
    }
}
