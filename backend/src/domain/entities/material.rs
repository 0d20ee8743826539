use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::EntityId;

/// Stock of one material on a site. Read-model only: quantities come from
/// seed or remote data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub available: u64,
    pub used: u64,
    pub last_updated: DateTime<Utc>,
}

impl Material {
    pub fn remaining(&self) -> u64 {
        self.available.saturating_sub(self.used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.available
    }
}
