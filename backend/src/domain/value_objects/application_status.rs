use serde::{Deserialize, Serialize};

/// Review state of a recruitment application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Still waiting on a final decision
    pub fn is_open(&self) -> bool {
        matches!(self, ApplicationStatus::Pending | ApplicationStatus::Reviewed)
    }
}
