//! Integration tests for users, roles, `has_role` and sessions.

use chrono::{Duration, Utc};
use clinica_core::roles::{ROLE_ADMIN, ROLE_USER};
use clinica_db::models::session::CreateSession;
use clinica_db::models::user::{CreateUser, User};
use clinica_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use sqlx::PgPool;

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        display_name: None,
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

async fn create(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create_with_role(pool, &new_user(email), role)
        .await
        .unwrap()
        .expect("role is seeded")
}

async fn revoke(pool: &PgPool, user_id: i64, role: &str) {
    sqlx::query(
        "DELETE FROM user_roles WHERE user_id = $1 \
         AND role_id = (SELECT id FROM roles WHERE name = $2)",
    )
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_has_role_follows_grants(pool: PgPool) {
    let plain = create(&pool, "ana@clinica.test", ROLE_USER).await;
    assert!(!RoleRepo::has_role(&pool, plain.id, ROLE_ADMIN).await.unwrap());
    assert!(RoleRepo::has_role(&pool, plain.id, ROLE_USER).await.unwrap());

    let admin = create(&pool, "bia@clinica.test", ROLE_ADMIN).await;
    assert!(RoleRepo::has_role(&pool, admin.id, ROLE_ADMIN).await.unwrap());

    revoke(&pool, admin.id, ROLE_ADMIN).await;
    assert!(!RoleRepo::has_role(&pool, admin.id, ROLE_ADMIN).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_has_role_false_for_inactive_or_unknown(pool: PgPool) {
    let user = create(&pool, "beto@clinica.test", ROLE_ADMIN).await;

    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    assert!(!RoleRepo::has_role(&pool, user.id, ROLE_ADMIN).await.unwrap());

    assert!(!RoleRepo::has_role(&pool, 999_999, ROLE_ADMIN).await.unwrap());
    assert!(!RoleRepo::has_role(&pool, user.id, "superuser").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_by_role_and_delete_cascade(pool: PgPool) {
    let admin = create(&pool, "admin@clinica.test", ROLE_ADMIN).await;
    create(&pool, "plain@clinica.test", ROLE_USER).await;

    let admins = UserRepo::list_by_role(&pool, ROLE_ADMIN).await.unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].email, "admin@clinica.test");

    assert!(UserRepo::delete(&pool, admin.id).await.unwrap());
    assert!(UserRepo::list_by_role(&pool, ROLE_ADMIN).await.unwrap().is_empty());
    assert!(!UserRepo::delete(&pool, admin.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_email_lookup_is_case_insensitive(pool: PgPool) {
    create(&pool, "Carla@Clinica.test", ROLE_USER).await;
    let found = UserRepo::find_by_email(&pool, "carla@clinica.TEST").await.unwrap();
    assert!(found.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_lifecycle(pool: PgPool) {
    let user = create(&pool, "dani@clinica.test", ROLE_USER).await;

    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "hash-1".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            user_agent: None,
            ip_address: None,
        },
    )
    .await
    .unwrap();

    let consumed = SessionRepo::consume_active_by_hash(&pool, "hash-1").await.unwrap();
    assert_eq!(consumed.map(|s| s.id), Some(session.id));

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_purge_stale_sessions(pool: PgPool) {
    let user = create(&pool, "eva@clinica.test", ROLE_USER).await;

    for (hash, expires_at) in [
        ("expired", Utc::now() - Duration::hours(1)),
        ("live", Utc::now() + Duration::days(1)),
    ] {
        SessionRepo::create(
            &pool,
            &CreateSession {
                user_id: user.id,
                refresh_token_hash: hash.to_string(),
                expires_at,
                user_agent: None,
                ip_address: None,
            },
        )
        .await
        .unwrap();
    }

    let removed = SessionRepo::purge_stale(&pool, Utc::now() - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(left, 1);

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_hash_is_consumed_once(pool: PgPool) {
    let user = create(&pool, "fabi@clinica.test", ROLE_USER).await;
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "once".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            user_agent: Some("test".to_string()),
            ip_address: Some("203.0.113.7".to_string()),
        },
    )
    .await
    .unwrap();

    let consumed = SessionRepo::consume_active_by_hash(&pool, "once").await.unwrap();
    assert!(consumed.is_some_and(|s| s.is_revoked && s.user_id == user.id));
    assert!(SessionRepo::consume_active_by_hash(&pool, "once")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_logins_lock_at_threshold(pool: PgPool) {
    let user = create(&pool, "gil@clinica.test", ROLE_USER).await;

    for expected in 1..=2 {
        let count = UserRepo::record_failed_login(&pool, user.id, 3, 15).await.unwrap();
        assert_eq!(count, expected);
    }
    let unlocked = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(unlocked.locked_until.is_none());

    assert_eq!(UserRepo::record_failed_login(&pool, user.id, 3, 15).await.unwrap(), 3);
    let locked = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(locked.locked_until.is_some_and(|until| until > Utc::now()));

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let reset = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reset.failed_login_count, 0);
    assert!(reset.locked_until.is_none() && reset.last_login_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_role_is_atomic(pool: PgPool) {
    let admin = UserRepo::create_with_role(&pool, &new_user("hugo@clinica.test"), ROLE_ADMIN)
        .await
        .unwrap()
        .expect("admin role is seeded");
    assert!(RoleRepo::has_role(&pool, admin.id, ROLE_ADMIN).await.unwrap());

    let missing = UserRepo::create_with_role(&pool, &new_user("iris@clinica.test"), "superuser")
        .await
        .unwrap();
    assert!(missing.is_none());
    assert!(UserRepo::find_by_email(&pool, "iris@clinica.test")
        .await
        .unwrap()
        .is_none());
}
