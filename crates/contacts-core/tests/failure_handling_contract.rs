//! Contract Test: Validation and Persistence Failures
//!
//! Constraints verified:
//! - invalid input never reaches the store
//! - name is checked before phone
//! - write failures surface as a message and commit nothing
//! - read failures degrade to an empty directory
//! - every failure still produces a consistent render model

mod common;

use common::*;
use contacts_core::config::DEFAULT_STORAGE_KEY;
use contacts_core::store::MemoryKvStore;
use contacts_core::{ContactRepository, DirectoryController, EditSession, ControllerConfig};
use std::sync::Arc;

#[tokio::test]
async fn empty_name_is_rejected() {
    let store = MockKvStore::new();
    let (mut controller, _rx) = controller_over(repository_over(&store));
    controller.load_and_render().await;

    let reads = store.get_call_count();
    let model = controller.submit("", "12345").await;

    assert_eq!(model.error_message.as_deref(), Some("name required"));
    assert!(model.contacts.is_empty());
    assert_eq!(store.set_call_count(), 0);
    assert_eq!(store.get_call_count(), reads, "repository must not be touched");
}

#[tokio::test]
async fn short_phone_is_rejected() {
    let store = MockKvStore::new();
    let (mut controller, _rx) = controller_over(repository_over(&store));

    controller.submit("Ann", "555-0101").await;
    let writes = store.set_call_count();

    let model = controller.submit("Ann", "1").await;
    assert_eq!(
        model.error_message.as_deref(),
        Some("phone must contain at least 3 digits")
    );
    assert_eq!(model.contacts.len(), 1);
    assert_eq!(store.set_call_count(), writes);
}

#[tokio::test]
async fn first_failure_wins() {
    let store = MockKvStore::new();
    let (mut controller, _rx) = controller_over(repository_over(&store));

    let model = controller.submit("   ", "x").await;
    assert_eq!(model.error_message.as_deref(), Some("name required"));
}

#[tokio::test]
async fn rejected_edit_keeps_session() {
    let store = MockKvStore::new();
    let (mut controller, _rx) = controller_over(repository_over(&store));

    let model = controller.submit("Ann", "555").await;
    let id = model.contacts[0].id.clone();
    controller.begin_edit(&id);

    let model = controller.submit("Ann", "12").await;
    assert_eq!(model.editing, EditSession::Editing(id));
    assert_eq!(store.stored_directory()[0].phone, "555");
}

#[tokio::test]
async fn write_failure_on_add_commits_nothing() {
    let store = MockKvStore::new();
    let (mut controller, _rx) = controller_over(repository_over(&store));
    controller.submit("Ann", "555").await;

    store.fail_writes(true);
    let model = controller.submit("Bo", "666").await;

    let message = model.error_message.clone().expect("error is shown");
    assert!(message.starts_with("save failed:"), "{}", message);
    assert_eq!(names(&model), vec!["Ann"]);
    assert_eq!(model.form.name, "Bo");
    assert_eq!(store.stored_directory().len(), 1);

    // Recovered provider: the user can resubmit
    store.fail_writes(false);
    let model = controller.submit("Bo", "666").await;
    assert_eq!(model.error_message, None);
    assert_eq!(names(&model), vec!["Ann", "Bo"]);
}

#[tokio::test]
async fn write_failure_on_update_keeps_session() {
    let store = MockKvStore::new();
    let (mut controller, _rx) = controller_over(repository_over(&store));

    let model = controller.submit("Ann", "555").await;
    let id = model.contacts[0].id.clone();
    controller.begin_edit(&id);

    store.fail_writes(true);
    let model = controller.submit("Ann B.", "555").await;

    assert!(model.error_message.is_some());
    assert_eq!(model.editing, EditSession::Editing(id));
    assert_eq!(model.form.name, "Ann B.");
    assert_eq!(store.stored_directory()[0].name, "Ann");
}

#[tokio::test]
async fn write_failure_on_delete_is_reported() {
    let store = MockKvStore::new();
    let (mut controller, _rx) = controller_over(repository_over(&store));

    let model = controller.submit("Ann", "555").await;
    let id = model.contacts[0].id.clone();

    store.fail_writes(true);
    let model = controller.request_delete(&id, true).await;

    let message = model.error_message.clone().expect("error is shown");
    assert!(message.starts_with("delete failed:"), "{}", message);
    assert_eq!(model.contacts.len(), 1);
    assert_eq!(store.stored_directory().len(), 1);
}

#[tokio::test]
async fn read_failure_degrades_to_empty() {
    let store = MockKvStore::new();
    let repository = repository_over(&store);
    repository.add("Ann", "555").await.unwrap();

    store.fail_reads(true);
    assert!(repository.list().await.is_empty());
    assert!(repository.try_list().await.is_err());

    let (mut controller, _rx) = controller_over(repository);
    let model = controller.load_and_render().await;
    assert!(model.contacts.is_empty());
    assert_eq!(model.error_message, None);
}

#[tokio::test]
async fn read_failure_never_overwrites_stored_data() {
    let store = MockKvStore::new();
    let repository = repository_over(&store);
    repository.add("Ann", "555").await.unwrap();

    store.fail_reads(true);
    assert!(repository.add("Bo", "666").await.is_err());
    assert!(repository.remove(&store.stored_directory()[0].id).await.is_err());

    store.fail_reads(false);
    assert_eq!(repository.list().await.len(), 1);
}

#[tokio::test]
async fn malformed_store_is_treated_as_empty() {
    let store = MockKvStore::new();
    store.put_raw(DEFAULT_STORAGE_KEY, "not json at all");
    let (mut controller, _rx) = controller_over(repository_over(&store));

    let model = controller.load_and_render().await;
    assert!(model.contacts.is_empty());
    assert_eq!(model.error_message, None);

    // Next write replaces the malformed value with a valid directory
    let model = controller.submit("Ann", "555").await;
    assert_eq!(model.contacts.len(), 1);
    assert_eq!(store.stored_directory().len(), 1);
}

#[tokio::test]
async fn quota_exceeded_is_surfaced() {
    let repository = Arc::new(ContactRepository::new(Arc::new(MemoryKvStore::with_quota(120))));
    let (mut controller, _rx) =
        DirectoryController::new(repository, &ControllerConfig::default()).unwrap();

    let model = controller.submit("Ann", "555-0101").await;
    assert_eq!(model.error_message, None);

    let model = controller
        .submit("A name long enough to blow through the quota", "555-0102")
        .await;
    let message = model.error_message.clone().expect("error is shown");
    assert!(message.contains("quota exceeded"), "{}", message);
    assert_eq!(model.contacts.len(), 1);
}
