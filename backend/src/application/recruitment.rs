use shared::CollectionKey;

use crate::application::repository::{EntityRepository, Record};
use crate::domain::{
    ApplicationStatus, EntityId, JobApplication, JobApplicationPatch, NewJobApplication,
};

pub type ApplicationRepository = EntityRepository<JobApplication>;

impl Record for JobApplication {
    type Draft = NewJobApplication;
    type Patch = JobApplicationPatch;

    const COLLECTION: CollectionKey = CollectionKey::Applications;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(id: EntityId, draft: NewJobApplication) -> Self {
        JobApplication::submit(id, draft)
    }

    fn apply_patch(&mut self, patch: &JobApplicationPatch) {
        self.apply(patch);
    }
}

impl EntityRepository<JobApplication> {
    /// Files a new application; it always starts out pending.
    pub async fn submit(&self, application: NewJobApplication) -> JobApplication {
        self.add(application).await
    }

    /// Reviewer decision. Any status may be set, including reopening.
    pub async fn review(&self, id: &EntityId, status: ApplicationStatus) -> Option<JobApplication> {
        self.modify(id, move |application| application.status = status)
            .await
    }

    /// Applications still awaiting a decision, oldest first
    pub fn open_applications(&self) -> Vec<JobApplication> {
        let mut open = self.filter(|a| a.status.is_open());
        open.sort_by_key(|a| a.submitted_at);
        open
    }
}
