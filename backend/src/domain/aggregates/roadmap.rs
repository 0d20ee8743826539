use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::value_objects::PhaseStatus;

/// One named construction phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub phase: String,
    pub status: PhaseStatus,
}

impl RoadmapStep {
    pub fn new(phase: impl Into<String>, status: PhaseStatus) -> Self {
        Self {
            phase: phase.into(),
            status,
        }
    }
}

/// How strictly [`Roadmap::transition`] checks the requested move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Only moves listed by [`PhaseStatus::allowed_next`]
    #[default]
    Enforced,
    /// Any target is accepted; the caller decides which moves to offer
    Permissive,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("no phase named '{0}' in roadmap")]
    UnknownPhase(String),
    #[error("phase '{phase}' cannot move from {from} to {to}")]
    NotAllowed {
        phase: String,
        from: PhaseStatus,
        to: PhaseStatus,
    },
}

/// Ordered phases of a project. Never empty: the first step is the
/// project's entry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RoadmapStep>", into = "Vec<RoadmapStep>")]
pub struct Roadmap {
    steps: Vec<RoadmapStep>,
}

impl Roadmap {
    pub const STANDARD_PHASES: [&'static str; 4] = ["Foundation", "Walls", "Roof", "Finishing"];

    /// Builds a roadmap from explicit steps, falling back to the standard
    /// phases when none are given. Phase names are the lookup key, so a
    /// repeated phase keeps only its first step.
    pub fn from_steps(steps: Vec<RoadmapStep>) -> Self {
        if steps.is_empty() {
            return Self::standard();
        }

        let mut unique: Vec<RoadmapStep> = Vec::with_capacity(steps.len());
        for step in steps {
            if unique.iter().any(|kept| kept.phase == step.phase) {
                warn!(phase = %step.phase, "duplicate roadmap phase dropped");
                continue;
            }
            unique.push(step);
        }
        Self { steps: unique }
    }

    pub fn standard() -> Self {
        Self {
            steps: Self::STANDARD_PHASES
                .iter()
                .map(|phase| RoadmapStep::new(*phase, PhaseStatus::Pending))
                .collect(),
        }
    }

    pub fn steps(&self) -> &[RoadmapStep] {
        &self.steps
    }

    pub fn step(&self, phase: &str) -> Option<&RoadmapStep> {
        self.steps.iter().find(|s| s.phase == phase)
    }

    /// First phase that is not completed yet
    pub fn current_step(&self) -> Option<&RoadmapStep> {
        self.steps.iter().find(|s| s.status != PhaseStatus::Completed)
    }

    pub fn is_complete(&self) -> bool {
        self.current_step().is_none()
    }

    /// Moves `phase` to `target`, returning the status it had before.
    pub fn transition(
        &mut self,
        phase: &str,
        target: PhaseStatus,
        policy: TransitionPolicy,
    ) -> Result<PhaseStatus, TransitionError> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.phase == phase)
            .ok_or_else(|| TransitionError::UnknownPhase(phase.to_string()))?;

        let from = step.status;
        if policy == TransitionPolicy::Enforced && !from.can_transition_to(target) {
            return Err(TransitionError::NotAllowed {
                phase: phase.to_string(),
                from,
                to: target,
            });
        }

        step.status = target;
        Ok(from)
    }

    /// Worker flags a phase as done; it waits for supervisor approval.
    pub fn mark_ready(
        &mut self,
        phase: &str,
        policy: TransitionPolicy,
    ) -> Result<PhaseStatus, TransitionError> {
        self.transition(phase, PhaseStatus::InReview, policy)
    }
}

impl Default for Roadmap {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<Vec<RoadmapStep>> for Roadmap {
    fn from(steps: Vec<RoadmapStep>) -> Self {
        Self::from_steps(steps)
    }
}

impl From<Roadmap> for Vec<RoadmapStep> {
    fn from(roadmap: Roadmap) -> Self {
        roadmap.steps
    }
}
