// Application ports - Driven ports (output ports implemented by infrastructure)

pub mod key_value_store;
pub mod remote_database;
pub mod persistence_backend;

pub use key_value_store::KeyValueStore;
pub use remote_database::RemoteDatabase;
pub use persistence_backend::{BackendMode, PersistenceBackend, RecordChange};
