use std::sync::Arc;

use tracing::{debug, info};

use crate::application::projects::ProjectRepository;
use crate::domain::{EntityId, PhaseStatus, RoadmapStep, TransitionPolicy};

/// Phase transitions on a project's roadmap.
///
/// Every operation returns `false` for an unknown project, an unknown phase
/// or a move the policy rejects, and leaves the project untouched. A
/// successful move persists the project and announces `projects-updated`.
pub struct RoadmapService {
    projects: Arc<ProjectRepository>,
    policy: TransitionPolicy,
}

impl RoadmapService {
    pub fn new(projects: Arc<ProjectRepository>, policy: TransitionPolicy) -> Self {
        Self { projects, policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub async fn set_phase_status(&self, project_id: &EntityId, phase: &str, target: PhaseStatus) -> bool {
        let policy = self.policy;
        let result = self
            .projects
            .try_modify(project_id, |project| {
                project.roadmap.transition(phase, target, policy).map(|_| ())
            })
            .await;

        match result {
            Ok(Some(_)) => {
                info!(project = %project_id, phase, status = %target, "phase status changed");
                true
            }
            Ok(None) => {
                debug!(project = %project_id, phase, "phase transition on unknown project ignored");
                false
            }
            Err(e) => {
                debug!(project = %project_id, error = %e, "phase transition rejected");
                false
            }
        }
    }

    /// Worker reports the phase finished; it waits in review for approval.
    pub async fn mark_ready(&self, project_id: &EntityId, phase: &str) -> bool {
        self.set_phase_status(project_id, phase, PhaseStatus::InReview)
            .await
    }

    pub async fn approve_phase(&self, project_id: &EntityId, phase: &str) -> bool {
        self.set_phase_status(project_id, phase, PhaseStatus::Completed)
            .await
    }

    /// Sends a reviewed phase back to work
    pub async fn request_changes(&self, project_id: &EntityId, phase: &str) -> bool {
        self.set_phase_status(project_id, phase, PhaseStatus::Active)
            .await
    }

    pub fn current_phase(&self, project_id: &EntityId) -> Option<RoadmapStep> {
        self.projects
            .get(project_id)?
            .roadmap
            .current_step()
            .cloned()
    }
}
