use shared::CollectionKey;

use crate::application::repository::{EntityRepository, Record};
use crate::domain::{EntityId, NewUser, User, UserPatch, UserRole};

pub type UserRepository = EntityRepository<User>;

impl Record for User {
    type Draft = NewUser;
    type Patch = UserPatch;

    const COLLECTION: CollectionKey = CollectionKey::Users;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn create(id: EntityId, draft: NewUser) -> Self {
        User::new(id, draft)
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        self.apply(patch);
    }
}

impl EntityRepository<User> {
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.filter(|u| u.email.matches(email)).into_iter().next()
    }

    pub fn with_role(&self, role: UserRole) -> Vec<User> {
        self.filter(|u| u.has_role(role))
    }

    pub async fn assign_role(&self, user_id: &EntityId, role: UserRole) -> Option<User> {
        self.modify(user_id, move |user| user.role = role).await
    }

    pub async fn assign_projects(&self, user_id: &EntityId, project_ids: Vec<EntityId>) -> Option<User> {
        self.modify(user_id, move |user| user.assigned_projects = project_ids)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::{seed, CollectionStore, IdAllocation, NotificationBus};
    use crate::infrastructure::driven::persistence::{InMemoryKeyValueStore, LocalBackend};

    async fn repo() -> UserRepository {
        let backend = Arc::new(LocalBackend::new(Arc::new(InMemoryKeyValueStore::new())));
        EntityRepository::load(
            Arc::new(CollectionStore::new(backend)),
            Arc::new(NotificationBus::new()),
            seed::users(),
            IdAllocation::Monotonic,
        )
        .await
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let users = repo().await;
        let found = users.find_by_email("MARTA.KOWALSKI@sitebook.dev").unwrap();
        assert_eq!(found.role, UserRole::ProjectManager);
        assert!(users.find_by_email("nobody@sitebook.dev").is_none());
    }

    #[tokio::test]
    async fn test_assign_role_and_projects() {
        let users = repo().await;
        let bricklayer = users.with_role(UserRole::Bricklayer).remove(0);

        let promoted = users
            .assign_role(&bricklayer.id, UserRole::ProjectManager)
            .await
            .unwrap();
        assert_eq!(promoted.role, UserRole::ProjectManager);

        let assigned = users
            .assign_projects(&bricklayer.id, vec![EntityId::from("2")])
            .await
            .unwrap();
        assert!(assigned.is_assigned_to(&EntityId::from("2")));
        assert_eq!(assigned.role, UserRole::ProjectManager);
    }
}
