pub mod entity_id;
pub mod email;
pub mod display_name;
pub mod user_role;
pub mod project_status;
pub mod phase_status;
pub mod application_status;

pub use entity_id::EntityId;
pub use email::Email;
pub use display_name::DisplayName;
pub use user_role::UserRole;
pub use project_status::ProjectStatus;
pub use phase_status::PhaseStatus;
pub use application_status::ApplicationStatus;
