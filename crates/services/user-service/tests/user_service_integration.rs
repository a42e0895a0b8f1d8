//! Integration tests for the user service.
//!
//! Run the real service, repositories and migrations against an in-memory
//! SQLite database.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tokio_test::{assert_err, assert_ok};
use tower::ServiceExt;

use common::DatabaseConfig;
use domain::{NewCredential, RoleBasedAuthority, UserPatch};
use user_service_lib::api::create_router;
use user_service_lib::build_state;
use user_service_lib::dto::UserDto;
use user_service_lib::infra::{Database, Persistence, UnitOfWork};
use user_service_lib::service::{UserManager, UserService};

struct TestContext {
    database: Database,
    uow: Arc<Persistence>,
    service: UserManager<Persistence>,
}

async fn setup() -> TestContext {
    let database = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    let uow = Arc::new(Persistence::new(database.get_connection()));
    let service = UserManager::new(uow.clone());

    TestContext {
        database,
        uow,
        service,
    }
}

fn new_user(first_name: &str) -> UserDto {
    UserDto {
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        phone: "1234567890".to_string(),
        ..Default::default()
    }
}

impl TestContext {
    /// Save a user and link a fresh credential to it.
    async fn provisioned_user(&self, first_name: &str, username: &str) -> (i32, i32) {
        let saved = self.service.save(new_user(first_name)).await.unwrap();
        let user_id = saved.user_id.unwrap();

        let credential = self
            .uow
            .credentials()
            .save(NewCredential::active(
                username,
                "password123",
                RoleBasedAuthority::RoleUser,
                user_id,
            ))
            .await
            .unwrap();

        (user_id, credential.credential_id)
    }
}

#[tokio::test]
async fn find_all_lists_only_provisioned_users() {
    let ctx = setup().await;
    let (first, _) = ctx.provisioned_user("John", "testuser").await;
    let bare = ctx.service.save(new_user("Bare")).await.unwrap();
    let (second, _) = ctx.provisioned_user("Jane", "janedoe").await;

    let users = assert_ok!(ctx.service.find_all().await);

    let ids: Vec<_> = users.iter().filter_map(|dto| dto.user_id).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(!ids.contains(&bare.user_id.unwrap()));
}

#[tokio::test]
async fn find_by_id_returns_user_with_credential() {
    let ctx = setup().await;
    let (user_id, credential_id) = ctx.provisioned_user("John", "testuser").await;

    let dto = assert_ok!(ctx.service.find_by_id(user_id).await);

    assert_eq!(dto.user_id, Some(user_id));
    let credential = dto.credential_dto.unwrap();
    assert_eq!(credential.credential_id, Some(credential_id));
    assert_eq!(credential.username, "testuser");
}

#[tokio::test]
async fn find_by_id_hides_user_without_credential() {
    let ctx = setup().await;
    let bare = ctx.service.save(new_user("Bare")).await.unwrap();
    let user_id = bare.user_id.unwrap();

    let err = assert_err!(ctx.service.find_by_id(user_id).await);

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), format!("User with id: {} not found", user_id));
}

#[tokio::test]
async fn find_by_id_unknown_is_not_found() {
    let ctx = setup().await;

    let err = assert_err!(ctx.service.find_by_id(999).await);

    assert_eq!(err.to_string(), "User with id: 999 not found");
}

#[tokio::test]
async fn find_by_username_follows_credential() {
    let ctx = setup().await;
    let (user_id, _) = ctx.provisioned_user("John", "testuser").await;

    let dto = assert_ok!(ctx.service.find_by_username("testuser").await);
    assert_eq!(dto.user_id, Some(user_id));

    let err = assert_err!(ctx.service.find_by_username("nonexistent").await);
    assert_eq!(err.to_string(), "User with username: nonexistent not found");
}

#[tokio::test]
async fn save_assigns_fresh_ids_and_echoes_fields() {
    let ctx = setup().await;

    let mut dto = new_user("John");
    dto.user_id = Some(500);
    let first = assert_ok!(ctx.service.save(dto).await);
    let second = assert_ok!(ctx.service.save(new_user("Jane")).await);

    assert_ne!(first.user_id, Some(500));
    assert_ne!(first.user_id, second.user_id);
    assert_eq!(first.first_name, "John");
    assert_eq!(first.email, "john@example.com");
    assert!(first.credential_dto.is_none());
}

#[tokio::test]
async fn save_then_find_round_trips_scalars() {
    let ctx = setup().await;
    let mut dto = new_user("John");
    dto.image_url = Some("https://example.com/john.png".to_string());
    let saved = ctx.service.save(dto.clone()).await.unwrap();
    let user_id = saved.user_id.unwrap();

    ctx.uow
        .credentials()
        .save(NewCredential::active(
            "testuser",
            "password123",
            RoleBasedAuthority::RoleUser,
            user_id,
        ))
        .await
        .unwrap();

    let found = assert_ok!(ctx.service.find_by_id(user_id).await);
    assert_eq!(found.first_name, dto.first_name);
    assert_eq!(found.last_name, dto.last_name);
    assert_eq!(found.email, dto.email);
    assert_eq!(found.phone, dto.phone);
    assert_eq!(found.image_url, dto.image_url);
}

#[tokio::test]
async fn update_replaces_scalars_and_keeps_credential() {
    let ctx = setup().await;
    let (user_id, credential_id) = ctx.provisioned_user("John", "testuser").await;

    let mut dto = new_user("Updated");
    dto.user_id = Some(user_id);
    let updated = assert_ok!(ctx.service.update(dto).await);

    assert_eq!(updated.first_name, "Updated");
    assert_eq!(updated.email, "updated@example.com");
    assert_eq!(
        updated.credential_dto.and_then(|c| c.credential_id),
        Some(credential_id)
    );
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let ctx = setup().await;

    let mut dto = new_user("Ghost");
    dto.user_id = Some(404);
    let err = assert_err!(ctx.service.update(dto).await);

    assert!(err.is_not_found());
}

#[tokio::test]
async fn update_by_id_patches_user_without_credential() {
    let ctx = setup().await;
    let bare = ctx.service.save(new_user("Bare")).await.unwrap();
    let user_id = bare.user_id.unwrap();

    let patch = UserPatch {
        phone: Some("5550000".to_string()),
        ..Default::default()
    };
    let updated = assert_ok!(ctx.service.update_by_id(user_id, patch).await);

    assert_eq!(updated.phone, "5550000");
    assert_eq!(updated.first_name, "Bare");
    assert_eq!(updated.email, "bare@example.com");
}

#[tokio::test]
async fn delete_removes_credential_and_keeps_user_row() {
    let ctx = setup().await;
    let (user_id, credential_id) = ctx.provisioned_user("John", "testuser").await;

    assert_ok!(ctx.service.delete_by_id(user_id).await);

    assert!(ctx.uow.users().exists_by_id(user_id).await.unwrap());
    assert!(!ctx.uow.credentials().exists_by_id(credential_id).await.unwrap());

    let user = ctx.uow.users().find_by_id(user_id).await.unwrap().unwrap();
    assert!(!user.has_credential());

    let err = assert_err!(ctx.service.find_by_id(user_id).await);
    assert!(err.is_not_found());

    // A second delete finds nothing to remove
    let err = assert_err!(ctx.service.delete_by_id(user_id).await);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_user_without_credential_is_not_found() {
    let ctx = setup().await;
    let bare = ctx.service.save(new_user("Bare")).await.unwrap();

    let err = assert_err!(ctx.service.delete_by_id(bare.user_id.unwrap()).await);

    assert!(err.is_not_found());
}

#[tokio::test]
async fn failed_transaction_rolls_back_earlier_writes() {
    let ctx = setup().await;
    let (user_id, credential_id) = ctx.provisioned_user("John", "testuser").await;

    let result: common::AppResult<()> = user_service_lib::with_transaction!(ctx.uow, |tx| {
        tx.credentials().unlink(credential_id).await?;
        tx.credentials().delete_by_credential_id(credential_id + 100).await
    });
    assert_err!(result);

    let user = ctx.uow.users().find_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(user.credential_id(), Some(credential_id));
}

#[tokio::test]
async fn duplicate_username_surfaces_as_generic_database_error() {
    let ctx = setup().await;
    ctx.provisioned_user("John", "testuser").await;
    let other = ctx.service.save(new_user("Jane")).await.unwrap();

    let err = assert_err!(
        ctx.uow
            .credentials()
            .save(NewCredential::active(
                "testuser",
                "password456",
                RoleBasedAuthority::RoleUser,
                other.user_id.unwrap(),
            ))
            .await
    );

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code(), "DATABASE_ERROR");
    assert_eq!(err.user_message(), "A database error occurred");
}

#[tokio::test]
async fn health_reports_database_status() {
    let ctx = setup().await;
    let app = create_router(build_state(ctx.database.clone()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn router_serves_users_end_to_end() {
    let ctx = setup().await;
    let (user_id, _) = ctx.provisioned_user("John", "testuser").await;
    let app = create_router(build_state(ctx.database.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users/username/testuser")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["userId"], user_id);
    assert_eq!(body["credential"]["username"], "testuser");
}
