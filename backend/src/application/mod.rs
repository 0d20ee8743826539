// Application layer - repositories, roadmap use cases and change propagation
// Orchestrates domain logic, depends on domain layer only

pub mod error;
pub mod ports;
pub mod store;
pub mod notification_bus;
pub mod repository;
pub mod projects;
pub mod users;
pub mod recruitment;
pub mod roadmap;
pub mod remote_sync;
pub mod views;
pub mod seed;
pub mod dashboard;

pub use dashboard::{Dashboard, DashboardOptions};
pub use error::StoreError;
pub use notification_bus::{ChangeEvent, NotificationBus, SubscriptionToken};
pub use repository::{EntityRepository, IdAllocation, Record};
pub use roadmap::RoadmapService;
pub use remote_sync::{RemoteSync, SyncHandle};
pub use store::CollectionStore;
