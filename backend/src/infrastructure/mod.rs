// Infrastructure layer - external concerns (storage, remote database, configuration)
// Implements interfaces defined in application layer

pub mod bootstrap;
pub mod config;
pub mod driven;    // Output adapters (stores, remote database, persistence strategies)
