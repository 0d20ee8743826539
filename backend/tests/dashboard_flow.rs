use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shared::{CollectionKey, Topic};
use sitebook::application::ports::{BackendMode, RemoteDatabase};
use sitebook::application::{Dashboard, DashboardOptions, IdAllocation};
use sitebook::domain::{EntityId, NewProject, PhaseStatus, ProjectPatch, RoadmapStep};
use sitebook::infrastructure::driven::persistence::{
    FileKeyValueStore, InMemoryKeyValueStore, InMemoryRemoteDatabase, LocalBackend, RemoteBackend,
};

fn count_events(dashboard: &Dashboard, topic: Topic) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    dashboard.bus().subscribe(topic, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    hits
}

async fn local_dashboard(kv: Arc<InMemoryKeyValueStore>) -> Dashboard {
    Dashboard::open(Arc::new(LocalBackend::new(kv)), DashboardOptions::default()).await
}

async fn wait_until(condition: impl Fn() -> bool) -> bool {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}

#[tokio::test]
async fn mark_ready_persists_and_notifies_once() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let dashboard = local_dashboard(kv.clone()).await;

    let project = dashboard
        .projects()
        .add(NewProject {
            name: "Canal Warehouse Conversion".to_string(),
            address: "12 Canal Street".to_string(),
            required_bricks: 40_000,
            start_date: "2026-03-01".to_string(),
            end_date: "2026-11-30".to_string(),
            manager_id: EntityId::from("1"),
            roadmap: vec![RoadmapStep::new("Foundation", PhaseStatus::Pending)],
            ..NewProject::default()
        })
        .await;

    let events = count_events(&dashboard, Topic::ProjectsUpdated);
    assert!(dashboard.roadmap().mark_ready(&project.id, "Foundation").await);

    let stored = dashboard.projects().get(&project.id).unwrap();
    assert_eq!(stored.roadmap.step("Foundation").unwrap().status, PhaseStatus::InReview);
    assert_eq!(events.load(Ordering::SeqCst), 1);

    let raw = kv.raw(CollectionKey::Projects.as_str()).unwrap();
    assert!(raw.contains("Canal Warehouse Conversion"));
    assert!(raw.contains("in_review"));
}

#[tokio::test]
async fn deleted_project_disappears_and_cannot_be_updated() {
    let dashboard = local_dashboard(Arc::new(InMemoryKeyValueStore::new())).await;
    let id = EntityId::from("2");

    assert!(dashboard.projects().delete(&id).await);
    assert!(dashboard.projects().list().iter().all(|p| p.id != id));

    let events = count_events(&dashboard, Topic::ProjectsUpdated);
    let patch = ProjectPatch {
        name: Some("Ghost".to_string()),
        ..ProjectPatch::default()
    };
    assert!(dashboard.projects().update(&id, &patch).await.is_none());
    assert!(!dashboard.projects().delete(&id).await);
    assert_eq!(events.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn state_survives_reopen_over_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileKeyValueStore::open(dir.path()).await.unwrap();
        let dashboard = Dashboard::open(Arc::new(LocalBackend::new(Arc::new(store))), DashboardOptions::default()).await;
        dashboard
            .projects()
            .set_assigned_bricklayers(&EntityId::from("2"), vec![EntityId::from("3"), EntityId::from("4")])
            .await
            .unwrap();
    }

    let store = FileKeyValueStore::open(dir.path()).await.unwrap();
    let dashboard = Dashboard::open(Arc::new(LocalBackend::new(Arc::new(store))), DashboardOptions::default()).await;

    let assigned = dashboard.views().bricklayer_projects(&EntityId::from("3"));
    let ids: Vec<_> = assigned.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn remote_changes_replace_local_snapshot() {
    let remote = Arc::new(InMemoryRemoteDatabase::new());
    let dashboard = Dashboard::open(Arc::new(RemoteBackend::new(remote.clone())), DashboardOptions::default()).await;

    assert_eq!(dashboard.mode(), BackendMode::Remote);
    assert!(dashboard.is_live());
    // Empty remote collections are seeded on first open.
    assert_eq!(remote.fetch_all(CollectionKey::Users).await.unwrap().len(), 4);

    let mut record = serde_json::to_value(dashboard.projects().get(&EntityId::from("1")).unwrap()).unwrap();
    record["id"] = serde_json::json!("9");
    record["name"] = serde_json::json!("Riverside Depot");
    remote
        .insert(CollectionKey::Projects, &EntityId::from("9"), &record)
        .await
        .unwrap();

    let projects = dashboard.projects().clone();
    assert!(wait_until(move || projects.get(&EntityId::from("9")).is_some()).await);
    assert_eq!(dashboard.projects().len(), 3);
}

#[tokio::test]
async fn remote_echo_of_local_write_is_not_renotified() {
    let remote = Arc::new(InMemoryRemoteDatabase::new());
    let dashboard = Dashboard::open(Arc::new(RemoteBackend::new(remote.clone())), DashboardOptions::default()).await;
    let events = count_events(&dashboard, Topic::ProjectsUpdated);

    assert!(dashboard.roadmap().mark_ready(&EntityId::from("2"), "Foundation").await);
    assert_eq!(events.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(events.load(Ordering::SeqCst), 1);

    // The feed is still live: a genuinely different snapshot gets through.
    remote
        .delete(CollectionKey::Projects, &EntityId::from("1"))
        .await
        .unwrap();
    let counter = events.clone();
    assert!(wait_until(move || counter.load(Ordering::SeqCst) == 2).await);
    assert_eq!(dashboard.projects().len(), 1);
}

#[tokio::test]
async fn reused_length_id_never_overwrites_remote_record() {
    let remote = Arc::new(InMemoryRemoteDatabase::new());
    let options = DashboardOptions {
        id_allocation: IdAllocation::Length,
        ..DashboardOptions::default()
    };
    let dashboard = Dashboard::open(Arc::new(RemoteBackend::new(remote.clone())), options).await;

    assert!(dashboard.projects().delete(&EntityId::from("1")).await);
    let added = dashboard
        .projects()
        .add(NewProject {
            name: "C".to_string(),
            ..NewProject::default()
        })
        .await;
    assert_eq!(added.id, EntityId::from("2"));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let stored = remote.fetch_all(CollectionKey::Projects).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["name"], "Oak Street School Extension");

    let local: Vec<_> = dashboard.projects().list().into_iter().map(|p| p.name).collect();
    assert!(local.iter().any(|name| name == "Oak Street School Extension"));
}

#[tokio::test]
async fn stopped_sync_ignores_remote_changes() {
    let remote = Arc::new(InMemoryRemoteDatabase::new());
    let mut dashboard =
        Dashboard::open(Arc::new(RemoteBackend::new(remote.clone())), DashboardOptions::default()).await;
    dashboard.stop_sync();
    assert!(!dashboard.is_live());

    remote
        .delete(CollectionKey::Applications, &EntityId::from("1"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(dashboard.applications().len(), 3);
}

#[tokio::test]
async fn live_sync_can_be_disabled() {
    let remote = Arc::new(InMemoryRemoteDatabase::new());
    let options = DashboardOptions {
        live_sync: false,
        ..DashboardOptions::default()
    };
    let dashboard = Dashboard::open(Arc::new(RemoteBackend::new(remote)), options).await;

    assert_eq!(dashboard.mode(), BackendMode::Remote);
    assert!(!dashboard.is_live());
}
