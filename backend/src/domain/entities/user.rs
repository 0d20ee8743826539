use serde::{Deserialize, Serialize};

use crate::domain::value_objects::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: DisplayName,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub assigned_projects: Vec<EntityId>,
}

/// Registration data; the repository assigns the identifier
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: Email,
    pub phone: Option<String>,
    pub role: UserRole,
    pub assigned_projects: Vec<EntityId>,
}

impl NewUser {
    pub fn new(name: DisplayName, email: Email, role: UserRole) -> Self {
        Self {
            name,
            email,
            phone: None,
            role,
            assigned_projects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<DisplayName>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub assigned_projects: Option<Vec<EntityId>>,
}

impl User {
    pub fn new(id: EntityId, new: NewUser) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            role: new.role,
            assigned_projects: new.assigned_projects,
        }
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }

    pub fn is_assigned_to(&self, project_id: &EntityId) -> bool {
        self.assigned_projects.contains(project_id)
    }

    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(projects) = &patch.assigned_projects {
            self.assigned_projects = projects.clone();
        }
    }
}
