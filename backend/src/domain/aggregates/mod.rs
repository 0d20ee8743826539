pub mod roadmap;

pub use roadmap::{Roadmap, RoadmapStep, TransitionError, TransitionPolicy};
