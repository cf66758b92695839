/// Service-level behaviour: validation, uniqueness, not-found handling and
/// the full create/read/update/delete walkthrough.
use std::sync::Arc;

use memusers::{DomainError, ErrorKind, InMemoryUserRepository, User, UserRepository, UserService};
use tokio_test::{assert_err, assert_ok};


use log_capture::CapturedLogs;

fn service() -> (UserService, Arc<InMemoryUserRepository>) {
    let repository = Arc::new(InMemoryUserRepository::new());
    (UserService::new(repository.clone()), repository)
}

#[tokio::test]
async fn create_assigns_increasing_ids_and_round_trips() {
    let (service, _) = service();

    let mut last_id = 0;
    for (name, age) in [("alice", 30), ("bob", 25), ("carol", 0), ("dave", 150)] {
        let created = assert_ok!(service.create_user(User::new(name, age)).await);
        assert!(created.is_persisted());
        assert!(created.id > last_id, "{} should exceed {}", created.id, last_id);
        last_id = created.id;

        let fetched = assert_ok!(service.get_user(created.id).await);
        assert_eq!(fetched, Some(created));
    }
}

#[tokio::test]
async fn duplicate_name_is_a_conflict_and_first_record_survives() {
    let (service, repository) = service();

    let first = assert_ok!(service.create_user(User::new("alice", 30)).await);
    let err = assert_err!(service.create_user(User::new("alice", 99)).await);

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(repository.len().await, 1);
    assert_eq!(assert_ok!(repository.get_by_name("alice").await), Some(first));
}

#[tokio::test]
async fn out_of_range_age_is_rejected_without_touching_the_store() {
    let (service, repository) = service();
    let alice = assert_ok!(service.create_user(User::new("alice", 30)).await);

    for age in [-1, 151, i32::MIN, i32::MAX] {
        let err = assert_err!(service.create_user(User::new("zed", age)).await);
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = assert_err!(service.update_user(User::new("alice", age).with_id(alice.id)).await);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert_eq!(repository.len().await, 1);
    assert_eq!(assert_ok!(service.get_user(alice.id).await), Some(alice));
}

#[tokio::test]
async fn invalid_names_are_validation_errors() {
    let (service, _) = service();

    let err = assert_err!(service.create_user(User::new("", 30)).await);
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.message().contains("name is required"));

    let err = assert_err!(service.create_user(User::new("n".repeat(101), 30)).await);
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn missing_user_lookup_is_absent_and_side_effect_free() {
    let (service, repository) = service();

    assert_eq!(assert_ok!(service.get_user(404).await), None);
    assert_eq!(assert_ok!(service.get_user(404).await), None);
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn update_and_delete_of_missing_user_are_not_found() {
    let (service, repository) = service();
    assert_ok!(service.create_user(User::new("alice", 30)).await);

    let err = assert_err!(service.update_user(User::new("ghost", 20).with_id(7)).await);
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = assert_err!(service.delete_user(7).await);
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().starts_with("failed to delete user"));

    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn missing_user_is_reported_before_validation_on_update() {
    let (service, _) = service();

    let err = assert_err!(service.update_user(User::new("", 999).with_id(3)).await);
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn rename_onto_another_users_name_is_a_conflict() {
    let (service, _) = service();
    let alice = assert_ok!(service.create_user(User::new("alice", 30)).await);
    let bob = assert_ok!(service.create_user(User::new("bob", 25)).await);

    let err = assert_err!(service.update_user(User::new("alice", 26).with_id(bob.id)).await);
    assert_eq!(err, DomainError::conflict("user with name alice already exists"));

    // Keeping one's own name is fine.
    let same = assert_ok!(service.update_user(User::new("alice", 31).with_id(alice.id)).await);
    assert_eq!(same.age, 31);
}

#[tokio::test]
async fn list_pages_through_users() {
    let (service, _) = service();
    for name in ["a", "b", "c", "d"] {
        assert_ok!(service.create_user(User::new(name, 1)).await);
    }

    let page = assert_ok!(service.list_users(2, 1).await);
    let names: Vec<_> = page.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["b", "c"]);

    assert!(assert_ok!(service.list_users(0, 0).await).is_empty());
    assert_eq!(assert_ok!(service.list_users(100, 0).await).len(), 4);
}

#[tokio::test]
async fn end_to_end_walkthrough() {
    let (service, _) = service();

    let alice = assert_ok!(service.create_user(User::new("alice", 30)).await);
    assert_eq!(alice, User::new("alice", 30).with_id(1));

    let bob = assert_ok!(service.create_user(User::new("bob", 25)).await);
    assert_eq!(bob, User::new("bob", 25).with_id(2));

    assert_eq!(assert_ok!(service.get_user(1).await), Some(alice));

    let older = assert_ok!(service.update_user(User::new("alice", 31).with_id(1)).await);
    assert_eq!(older, User::new("alice", 31).with_id(1));

    let err = assert_err!(service.create_user(User::new("alice", 40)).await);
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(assert_ok!(service.get_user(1).await), Some(older));

    assert_ok!(service.delete_user(2).await);
    assert_eq!(assert_ok!(service.get_user(2).await), None);
}

#[tokio::test]
async fn lookups_log_whether_the_user_was_found() {
    let (service, _) = service();
    let alice = assert_ok!(service.create_user(User::new("alice", 30)).await);

    let (logs, _guard) = CapturedLogs::install();
    assert_ok!(service.get_user(alice.id).await);
    assert_ok!(service.get_user(404).await);

    let fetched = logs.lines_with("user fetched");
    assert_eq!(fetched.len(), 2, "{}", logs.contents());
    assert!(fetched[0].contains(&format!("uid={}", alice.id)));
    assert!(fetched[0].contains("found=true"));
    assert!(fetched[1].contains("uid=404"));
    assert!(fetched[1].contains("found=false"));
}
