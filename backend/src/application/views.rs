use std::sync::Arc;

use crate::application::projects::ProjectRepository;
use crate::application::recruitment::ApplicationRepository;
use crate::application::users::UserRepository;
use crate::domain::{EntityId, JobApplication, Project, User, UserRole};

/// What one persona sees when the dashboard renders
#[derive(Debug, Clone, PartialEq)]
pub enum RoleView {
    ProjectManager {
        projects: Vec<Project>,
        bricklayers: Vec<User>,
        totals: PortfolioTotals,
    },
    Bricklayer {
        projects: Vec<Project>,
    },
    Recruiter {
        applications: Vec<JobApplication>,
    },
}

/// Sums over a set of projects
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortfolioTotals {
    pub required_bricks: u64,
    pub used_bricks: u64,
    pub estimated_cost: f64,
    pub revenue: f64,
}

impl PortfolioTotals {
    pub fn of(projects: &[Project]) -> Self {
        projects.iter().fold(Self::default(), |acc, p| Self {
            required_bricks: acc.required_bricks.saturating_add(p.required_bricks),
            used_bricks: acc.used_bricks.saturating_add(p.used_bricks),
            estimated_cost: acc.estimated_cost + p.estimated_cost,
            revenue: acc.revenue + p.revenue,
        })
    }

    pub fn margin(&self) -> f64 {
        self.revenue - self.estimated_cost
    }
}

/// Read-only queries behind the role-based views. Every call works on a
/// fresh snapshot, so views rebuilt after a change notification are
/// always current.
#[derive(Clone)]
pub struct DashboardViews {
    projects: Arc<ProjectRepository>,
    users: Arc<UserRepository>,
    applications: Arc<ApplicationRepository>,
}

impl DashboardViews {
    pub fn new(
        projects: Arc<ProjectRepository>,
        users: Arc<UserRepository>,
        applications: Arc<ApplicationRepository>,
    ) -> Self {
        Self {
            projects,
            users,
            applications,
        }
    }

    pub fn manager_projects(&self, manager_id: &EntityId) -> Vec<Project> {
        self.projects.managed_by(manager_id)
    }

    /// Projects listing the bricklayer in their crew, plus any the user
    /// record points at
    pub fn bricklayer_projects(&self, user_id: &EntityId) -> Vec<Project> {
        let listed = self
            .users
            .get(user_id)
            .map(|u| u.assigned_projects)
            .unwrap_or_default();

        self.projects
            .filter(|p| p.is_assigned(user_id) || listed.contains(&p.id))
    }

    pub fn available_bricklayers(&self) -> Vec<User> {
        self.users.with_role(UserRole::Bricklayer)
    }

    pub fn recruiter_queue(&self) -> Vec<JobApplication> {
        self.applications.open_applications()
    }

    pub fn view_for(&self, user_id: &EntityId) -> Option<RoleView> {
        let user = self.users.get(user_id)?;
        Some(match user.role {
            UserRole::ProjectManager => {
                let projects = self.manager_projects(user_id);
                RoleView::ProjectManager {
                    totals: PortfolioTotals::of(&projects),
                    projects,
                    bricklayers: self.available_bricklayers(),
                }
            }
            UserRole::Bricklayer => RoleView::Bricklayer {
                projects: self.bricklayer_projects(user_id),
            },
            UserRole::Recruiter => RoleView::Recruiter {
                applications: self.recruiter_queue(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{seed, CollectionStore, EntityRepository, IdAllocation, NotificationBus};
    use crate::infrastructure::driven::persistence::{InMemoryKeyValueStore, LocalBackend};

    async fn views() -> DashboardViews {
        let backend = Arc::new(LocalBackend::new(Arc::new(InMemoryKeyValueStore::new())));
        let store = Arc::new(CollectionStore::new(backend));
        let bus = Arc::new(NotificationBus::new());
        let a = IdAllocation::Monotonic;

        DashboardViews::new(
            Arc::new(EntityRepository::load(store.clone(), bus.clone(), seed::projects(), a).await),
            Arc::new(EntityRepository::load(store.clone(), bus.clone(), seed::users(), a).await),
            Arc::new(EntityRepository::load(store, bus, seed::applications(), a).await),
        )
    }

    #[test]
    fn test_brick_totals_saturate() {
        let mut projects = seed::projects();
        projects[1].required_bricks = u64::MAX;
        projects[1].used_bricks = u64::MAX - 1;

        let totals = PortfolioTotals::of(&projects);
        assert_eq!(totals.required_bricks, u64::MAX);
        assert_eq!(totals.used_bricks, u64::MAX);
    }

    #[tokio::test]
    async fn test_manager_view_totals() {
        let views = views().await;
        let Some(RoleView::ProjectManager { projects, bricklayers, totals }) =
            views.view_for(&EntityId::from("1"))
        else {
            panic!("expected manager view");
        };

        assert_eq!(projects.len(), 2);
        assert_eq!(bricklayers.len(), 2);
        assert_eq!(totals, PortfolioTotals::of(&seed::projects()));
        assert!(totals.margin() > 0.0);
    }

    #[tokio::test]
    async fn test_bricklayer_sees_only_assigned_projects() {
        let views = views().await;
        let projects = views.bricklayer_projects(&EntityId::from("4"));

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, EntityId::from("2"));
    }

    #[tokio::test]
    async fn test_recruiter_view_lists_open_applications() {
        let views = views().await;
        match views.view_for(&EntityId::from("2")) {
            Some(RoleView::Recruiter { applications }) => assert_eq!(applications.len(), 2),
            other => panic!("unexpected view: {other:?}"),
        }
        assert!(views.view_for(&EntityId::from("404")).is_none());
    }
}
