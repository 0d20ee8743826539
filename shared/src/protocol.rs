use serde::{Deserialize, Serialize};
use std::fmt;

/// Durable-store identifier for one entity type's serialized collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionKey {
    Projects,
    Users,
    Applications,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 3] = [
        CollectionKey::Projects,
        CollectionKey::Users,
        CollectionKey::Applications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::Projects => "projects",
            CollectionKey::Users => "users",
            CollectionKey::Applications => "applications",
        }
    }

    /// Topic announced after this collection changes
    pub fn topic(&self) -> Topic {
        match self {
            CollectionKey::Projects => Topic::ProjectsUpdated,
            CollectionKey::Users => Topic::UsersUpdated,
            CollectionKey::Applications => Topic::ApplicationsUpdated,
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-payload broadcast topics. Subscribers re-read the full collection
/// when one fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    ProjectsUpdated,
    UsersUpdated,
    ApplicationsUpdated,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ProjectsUpdated => "projects-updated",
            Topic::UsersUpdated => "users-updated",
            Topic::ApplicationsUpdated => "applications-updated",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
