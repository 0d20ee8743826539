use shared::CollectionKey;

use crate::application::repository::{EntityRepository, Record};
use crate::domain::{EntityId, NewProject, Project, ProjectPatch};
use tracing::warn;

pub type ProjectRepository = EntityRepository<Project>;

impl Record for Project {
    type Draft = NewProject;
    type Patch = ProjectPatch;

    const COLLECTION: CollectionKey = CollectionKey::Projects;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(id: EntityId, draft: NewProject) -> Self {
        let project = Project::new(id, draft);
        if project.schedule_is_inverted() {
            warn!(
                id = %project.id,
                start = %project.start_date,
                end = %project.end_date,
                "project ends before it starts"
            );
        }
        project
    }

    fn apply_patch(&mut self, patch: &ProjectPatch) {
        self.apply(patch);
    }
}

impl EntityRepository<Project> {
    /// Replaces the crew list of one project. Duplicates are kept as given.
    pub async fn set_assigned_bricklayers(&self, project_id: &EntityId, bricklayer_ids: Vec<EntityId>) -> Option<Project> {
        self.modify(project_id, move |project| {
            project.assigned_bricklayers = bricklayer_ids;
        })
        .await
    }

    pub fn managed_by(&self, manager_id: &EntityId) -> Vec<Project> {
        self.filter(|p| &p.manager_id == manager_id)
    }

    pub fn assigned_to(&self, bricklayer_id: &EntityId) -> Vec<Project> {
        self.filter(|p| p.is_assigned(bricklayer_id))
    }
}
