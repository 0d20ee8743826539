mod schema;
pub mod file_store;
pub mod memory_store;
pub mod redis_store;
pub mod postgres_remote;
pub mod in_memory_remote;
pub mod local_backend;
pub mod remote_backend;

pub use file_store::FileKeyValueStore;
pub use memory_store::InMemoryKeyValueStore;
pub use redis_store::RedisKeyValueStore;
pub use postgres_remote::PostgresRemoteDatabase;
pub use in_memory_remote::InMemoryRemoteDatabase;
pub use local_backend::LocalBackend;
pub use remote_backend::RemoteBackend;
