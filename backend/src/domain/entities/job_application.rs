use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::*;

/// A recruitment submission from a prospective worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: EntityId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub years_of_experience: u32,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub message: String,
    pub status: ApplicationStatus,
    #[serde(default = "Utc::now")]
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJobApplication {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub years_of_experience: u32,
    pub certifications: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct JobApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub certifications: Option<Vec<String>>,
    pub message: Option<String>,
}

impl JobApplication {
    /// New submissions always start out pending
    pub fn submit(id: EntityId, new: NewJobApplication) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            years_of_experience: new.years_of_experience,
            certifications: new.certifications,
            message: new.message,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, patch: &JobApplicationPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(certifications) = &patch.certifications {
            self.certifications = certifications.clone();
        }
        if let Some(message) = &patch.message {
            self.message = message.clone();
        }
    }
}
