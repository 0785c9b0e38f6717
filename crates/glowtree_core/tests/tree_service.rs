use chrono::{Datelike, Utc};
use glowtree_core::service::tree_service::WEATHER_CYCLE_SECONDS;
use glowtree_core::{
    place, Camera, HeadlessScene, MemoryStorage, Message, MessageStore, MessageValidationError,
    ServiceError, SettingsStore, StorageError, StoreError, TreeService, Vec3, Viewport, Weather,
};

fn camera() -> Camera {
    Camera::new(
        Vec3::new(0.0, 3.0, 12.0),
        Vec3::new(0.0, 2.5, 0.0),
        Viewport {
            width: 1280.0,
            height: 720.0,
        },
    )
}

fn with_id(id: &str, author: &str, text: &str) -> Message {
    Message::with_id(id, author, text, Utc::now()).unwrap()
}

#[test]
fn submit_scenario_persists_and_creates_matching_node() {
    let storage = MemoryStorage::new();
    let scene = HeadlessScene::new();
    let mut service = TreeService::new(&storage, scene.clone(), camera());

    let stored = service
        .submit_message(with_id("m1", "Alice", "hi"))
        .unwrap();

    assert_eq!(service.messages().count(), 1);
    assert_eq!(service.messages().by_id("m1"), Some(stored));
    assert!(service.nodes().contains("m1"));
    assert_eq!(scene.live_nodes(), 1);
    assert_eq!(
        service.nodes().original_position_of("m1"),
        Some(place("Alice", "m1").position)
    );
}

#[test]
fn submit_generates_id_and_timestamp() {
    let storage = MemoryStorage::new();
    let mut service = TreeService::new(&storage, HeadlessScene::new(), camera());

    let message = service.submit("  Bob ", " hello tree ").unwrap();
    assert_eq!(message.author(), "Bob");
    assert_eq!(message.text(), "hello tree");
    assert!(!message.id().is_empty());
    assert!(service.nodes().contains(message.id()));
}

#[test]
fn validation_errors_never_reach_the_store() {
    let storage = MemoryStorage::new();
    let scene = HeadlessScene::new();
    let mut service = TreeService::new(&storage, scene.clone(), camera());

    let err = service.submit("", "hi").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(MessageValidationError::EmptyAuthor)
    ));
    let err = service.submit("Alice", "   ").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(MessageValidationError::EmptyText)
    ));
    let err = service.submit("Alice", &"x".repeat(201)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(MessageValidationError::TextTooLong { max: 200, actual: 201 })
    ));

    assert_eq!(service.messages().count(), 0);
    assert_eq!(storage.used_bytes(), 0);
    assert_eq!(scene.live_nodes(), 0);
}

#[test]
fn failed_append_creates_no_node() {
    let storage = MemoryStorage::with_quota(16);
    let scene = HeadlessScene::new();
    let mut service = TreeService::new(&storage, scene.clone(), camera());

    let err = service.submit("Alice", "hi").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::Storage(StorageError::QuotaExceeded { .. }))
    ));
    assert_eq!(service.messages().count(), 0);
    assert_eq!(scene.live_nodes(), 0);
}

#[test]
fn load_recreates_nodes_from_storage() {
    let storage = MemoryStorage::new();
    let store = MessageStore::new(&storage);
    for id in ["a", "b", "c"] {
        store.append(&with_id(id, "Alice", "hi")).unwrap();
    }

    let scene = HeadlessScene::new();
    let mut service = TreeService::new(&storage, scene.clone(), camera());
    assert_eq!(service.load(), 3);
    assert_eq!(service.load(), 0);
    assert_eq!(scene.live_nodes(), 3);
}

#[test]
fn search_highlights_and_flies_to_node() {
    let storage = MemoryStorage::new();
    let scene = HeadlessScene::new();
    let mut service = TreeService::new(&storage, scene.clone(), camera());
    service.submit_message(with_id("m1", "Alice", "hi")).unwrap();

    let position = service.search("  m1 ").unwrap();
    assert_eq!(scene.live_pulses(), 1);
    assert!(service.is_flying());

    service.update(2.0);
    assert!(!service.is_flying());
    assert_eq!(service.camera().target, position);
    assert_eq!(scene.live_pulses(), 0);
}

#[test]
fn search_unknown_id_is_not_found() {
    let storage = MemoryStorage::new();
    let mut service = TreeService::new(&storage, HeadlessScene::new(), camera());

    let err = service.search("missing").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref id) if id == "missing"));
    assert!(!service.is_flying());
}

#[test]
fn search_for_stored_but_unloaded_message_creates_its_node() {
    let storage = MemoryStorage::new();
    MessageStore::new(&storage)
        .append(&with_id("m9", "Carol", "late"))
        .unwrap();

    let mut service = TreeService::new(&storage, HeadlessScene::new(), camera());
    assert!(service.search("m9").is_ok());
    assert!(service.nodes().contains("m9"));
}

#[test]
fn overlapping_search_does_not_restart_fly_to() {
    let storage = MemoryStorage::new();
    let scene = HeadlessScene::new();
    let mut service = TreeService::new(&storage, scene.clone(), camera());
    service.submit_message(with_id("m1", "Alice", "hi")).unwrap();
    service.submit_message(with_id("m2", "Alice", "yo")).unwrap();

    let first = service.search("m1").unwrap();
    service.update(0.5);
    let second = service.search("m2").unwrap();
    assert_ne!(first, second);
    assert_eq!(scene.live_pulses(), 2);

    service.update(2.0);
    assert_eq!(service.camera().target, first);
}

#[test]
fn weather_settings_persist_and_auto_cycle() {
    let storage = MemoryStorage::new();
    let mut service = TreeService::new(&storage, HeadlessScene::new(), camera());
    assert_eq!(service.settings().weather, Weather::Clear);

    service.set_weather(Weather::Snow).unwrap();
    service.update(WEATHER_CYCLE_SECONDS * 2.0);
    assert_eq!(service.settings().weather, Weather::Snow);

    service.set_auto_cycle(true).unwrap();
    service.update(WEATHER_CYCLE_SECONDS - 1.0);
    assert_eq!(service.settings().weather, Weather::Snow);
    service.update(1.0);
    assert_eq!(service.settings().weather, Weather::Fog);

    let persisted = SettingsStore::new(&storage).load();
    assert_eq!(persisted.weather, Weather::Fog);
    assert!(persisted.auto_cycle);

    let reopened = TreeService::new(&storage, HeadlessScene::new(), camera());
    assert_eq!(reopened.settings(), persisted);
}

#[test]
fn tiers_count_current_year_and_total() {
    let storage = MemoryStorage::new();
    let mut service = TreeService::new(&storage, HeadlessScene::new(), camera());
    service.submit("Alice", "one").unwrap();
    service.submit("Bob", "two").unwrap();

    let year = Utc::now().year();
    assert_eq!(service.tier_for_year(year).name, "Red");
    assert_eq!(service.tier_for_year(year - 1).name, "Red");
    let progress = service.progress_for_year(year);
    assert_eq!(progress.remaining, 100_000 - 2);
    assert_eq!(service.total_tier().name, "Red");
}
