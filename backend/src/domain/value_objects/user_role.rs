use serde::{Deserialize, Serialize};

/// Persona a user signs in as; selects which dashboard view they get
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Bricklayer,
    ProjectManager,
    Recruiter,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Bricklayer => "bricklayer",
            UserRole::ProjectManager => "project_manager",
            UserRole::Recruiter => "recruiter",
        }
    }
}
