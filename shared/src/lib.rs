//! Names shared between the dashboard core and its consumers.

pub mod protocol;

pub use protocol::{CollectionKey, Topic};
