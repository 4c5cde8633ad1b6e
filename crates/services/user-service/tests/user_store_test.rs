//! Store semantics tests.
//!
//! These drive the real in-memory store through the service layer, the
//! same path the HTTP surface uses.

use std::sync::Arc;

use common::AppError;
use domain::UpdateUser;
use user_service::{UserManager, UserService, UserStore};

fn service() -> UserManager {
    UserManager::new(Arc::new(UserStore::new()))
}

async fn create(service: &UserManager, name: &str, email: &str) -> domain::User {
    service
        .create_user(name.to_string(), email.to_string())
        .await
        .unwrap()
}

#[tokio::test]
async fn created_user_has_expected_defaults() {
    let service = service();
    let user = create(&service, "John Doe", "john@example.com").await;

    assert_eq!(user.id, 1);
    assert_eq!(user.name, "John Doe");
    assert_eq!(user.email, "john@example.com");
    assert!(user.is_active);
}

#[tokio::test]
async fn duplicate_email_fails_with_conflict() {
    let service = service();
    create(&service, "John Doe", "john@example.com").await;

    let result = service
        .create_user("Jane Doe".to_string(), "john@example.com".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));

    // The first user is untouched and still the only one stored.
    let users = service.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "John Doe");
}

#[tokio::test]
async fn email_match_is_case_sensitive() {
    let service = service();
    create(&service, "John Doe", "john@example.com").await;

    // A different casing is a different email.
    let user = service
        .create_user("Jane Doe".to_string(), "John@example.com".to_string())
        .await
        .unwrap();
    assert_eq!(user.id, 2);

    let found = service.find_user_by_email("JOHN@EXAMPLE.COM").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn ids_increase_and_are_never_reused() {
    let service = service();
    let a = create(&service, "A", "a@example.com").await;
    let b = create(&service, "B", "b@example.com").await;
    assert!(b.id > a.id);

    service.delete_user(b.id).await.unwrap();

    let c = create(&service, "C", "c@example.com").await;
    assert!(c.id > b.id, "a deleted id must not be reassigned");
}

#[tokio::test]
async fn failed_create_does_not_consume_an_id() {
    let service = service();
    create(&service, "John Doe", "john@example.com").await;

    let _ = service
        .create_user("Jane Doe".to_string(), "john@example.com".to_string())
        .await;
    let _ = service
        .create_user(String::new(), "jane@example.com".to_string())
        .await;

    let jane = create(&service, "Jane Doe", "jane@example.com").await;
    assert_eq!(jane.id, 2);
}

#[tokio::test]
async fn get_by_id_round_trips_the_created_user() {
    let service = service();
    let created = create(&service, "John Doe", "john@example.com").await;

    let fetched = service.get_user(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_unknown_id_fails_with_not_found() {
    let service = service();
    let result = service.get_user(999).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn find_by_email_returns_none_when_absent() {
    let service = service();
    create(&service, "John Doe", "john@example.com").await;

    let found = service
        .find_user_by_email("john@example.com")
        .await
        .unwrap();
    assert_eq!(found.unwrap().name, "John Doe");

    let absent = service
        .find_user_by_email("notfound@example.com")
        .await
        .unwrap();
    assert!(absent.is_none());
}

#[tokio::test]
async fn list_returns_users_in_insertion_order() {
    let service = service();
    create(&service, "A", "a@example.com").await;
    create(&service, "B", "b@example.com").await;
    create(&service, "C", "c@example.com").await;

    service.delete_user(2).await.unwrap();
    create(&service, "D", "d@example.com").await;

    let ids: Vec<i64> = service
        .list_users()
        .await
        .unwrap()
        .iter()
        .map(|user| user.id)
        .collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[tokio::test]
async fn list_returns_snapshots_not_live_handles() {
    let service = service();
    create(&service, "John Doe", "john@example.com").await;

    let mut users = service.list_users().await.unwrap();
    users[0].name = "Hacked".to_string();
    users.clear();

    let stored = service.get_user(1).await.unwrap();
    assert_eq!(stored.name, "John Doe");
    assert_eq!(service.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn partial_update_leaves_other_fields_unchanged() {
    let service = service();
    let user = create(&service, "A", "a@x.com").await;

    let updated = service
        .update_user(
            user.id,
            UpdateUser {
                name: Some("B".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "B");
    assert_eq!(updated.email, "a@x.com");
    assert!(updated.is_active);
    assert_eq!(updated.created_at, user.created_at);
}

#[tokio::test]
async fn update_unknown_id_fails_with_not_found() {
    let service = service();
    let result = service
        .update_user(
            999,
            UpdateUser {
                name: Some("B".to_string()),
                ..UpdateUser::default()
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

// Baseline behavior kept on purpose: the update path trusts the caller
// and skips the uniqueness check, so two stored users can end up sharing
// an email. Creation is the only place the constraint is enforced.
#[tokio::test]
async fn update_email_is_not_checked_for_uniqueness() {
    let service = service();
    create(&service, "John Doe", "john@example.com").await;
    let jane = create(&service, "Jane Doe", "jane@example.com").await;

    let updated = service
        .update_user(
            jane.id,
            UpdateUser {
                email: Some("john@example.com".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.email, "john@example.com");

    let duplicates = service
        .list_users()
        .await
        .unwrap()
        .iter()
        .filter(|user| user.email == "john@example.com")
        .count();
    assert_eq!(duplicates, 2);
}

#[tokio::test]
async fn active_count_tracks_deactivation() {
    let service = service();
    let john = create(&service, "John Doe", "john@example.com").await;
    create(&service, "Jane Doe", "jane@example.com").await;

    assert_eq!(service.count_active_users().await.unwrap(), 2);

    let deactivated = service.deactivate_user(john.id).await.unwrap();
    assert!(!deactivated.is_active);
    assert_eq!(service.count_active_users().await.unwrap(), 1);

    // Deactivation is freely reversible.
    service
        .update_user(
            john.id,
            UpdateUser {
                is_active: Some(true),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(service.count_active_users().await.unwrap(), 2);
}

#[tokio::test]
async fn deactivate_unknown_id_fails_with_not_found() {
    let service = service();
    let result = service.deactivate_user(999).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn delete_removes_the_user_everywhere() {
    let service = service();
    let user = create(&service, "John Doe", "john@example.com").await;

    let removed = service.delete_user(user.id).await.unwrap();
    assert_eq!(removed, user);

    assert!(matches!(
        service.get_user(user.id).await.unwrap_err(),
        AppError::NotFound
    ));
    assert!(service.list_users().await.unwrap().is_empty());
    assert!(service
        .find_user_by_email("john@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn delete_unknown_id_fails_with_not_found() {
    let service = service();
    let result = service.delete_user(999).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn deleting_frees_the_email_for_reuse() {
    let service = service();
    let user = create(&service, "John Doe", "john@example.com").await;
    service.delete_user(user.id).await.unwrap();

    // Uniqueness only covers currently stored users.
    let again = create(&service, "John Doe", "john@example.com").await;
    assert!(again.id > user.id);
}

#[tokio::test]
async fn end_to_end_scenario() {
    let service = service();

    let john = create(&service, "John Doe", "john@example.com").await;
    assert_eq!(john.id, 1);
    assert!(john.is_active);

    let conflict = service
        .create_user("Jane Doe".to_string(), "john@example.com".to_string())
        .await;
    assert!(matches!(conflict.unwrap_err(), AppError::Conflict(_)));

    assert!(matches!(
        service.get_user(999).await.unwrap_err(),
        AppError::NotFound
    ));

    let jane = create(&service, "Jane Doe", "jane@example.com").await;
    service.deactivate_user(jane.id).await.unwrap();
    assert_eq!(service.count_active_users().await.unwrap(), 1);
}
