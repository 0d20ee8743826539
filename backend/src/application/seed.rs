//! Default data used when a collection has never been stored or cannot be
//! read back.

use serde::de::DeserializeOwned;
use tracing::error;

use crate::domain::{JobApplication, Project, User};

const PROJECTS: &str = include_str!("../../seed/projects.json");
const USERS: &str = include_str!("../../seed/users.json");
const APPLICATIONS: &str = include_str!("../../seed/applications.json");

pub fn projects() -> Vec<Project> {
    parse("projects", PROJECTS)
}

pub fn users() -> Vec<User> {
    parse("users", USERS)
}

pub fn applications() -> Vec<JobApplication> {
    parse("applications", APPLICATIONS)
}

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        error!(seed = name, error = %e, "bundled seed data is invalid");
        Vec::new()
    })
}
