pub mod user;
pub mod project;
pub mod material;
pub mod job_application;

pub use user::{NewUser, User, UserPatch};
pub use project::{NewProject, Project, ProjectPatch};
pub use material::Material;
pub use job_application::{JobApplication, JobApplicationPatch, NewJobApplication};
