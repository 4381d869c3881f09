#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gymtrack::db::{create_memory_pool, DbPool};
use gymtrack::handlers::{equipment, progress, users, workout_exercises, workouts};
use gymtrack::middleware::Authenticator;
use gymtrack::migrations::run_migrations_for_tests;
use gymtrack::models::User;
use gymtrack::repositories::{
    EquipmentRepository, ExerciseRepository, UserRepository, WorkoutRepository,
};
use gymtrack::routes::{create_router, AppStates};
use gymtrack::token::TokenKeys;

pub const TEST_SECRET: &str = "gymtrack-test-secret";

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn count_rows(pool: &DbPool, table: &str) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

pub fn test_keys() -> TokenKeys {
    TokenKeys::new(TEST_SECRET, 7)
}

pub fn create_test_app(pool: DbPool) -> Router {
    let user_repo = UserRepository::new(pool.clone());
    let equipment_repo = EquipmentRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());

    let states = AppStates {
        users: users::UsersState {
            user_repo: user_repo.clone(),
            token_keys: test_keys(),
        },
        equipment: equipment::EquipmentState {
            equipment_repo: equipment_repo.clone(),
        },
        workouts: workouts::WorkoutsState {
            workout_repo: workout_repo.clone(),
        },
        workout_exercises: workout_exercises::WorkoutExercisesState {
            exercise_repo: exercise_repo.clone(),
            equipment_repo: equipment_repo.clone(),
            workout_repo,
        },
        progress: progress::ProgressState {
            equipment_repo,
            exercise_repo,
        },
    };

    create_router(states, Authenticator::new(test_keys(), user_repo), None)
}

pub async fn create_test_user(pool: &DbPool, email: &str) -> User {
    UserRepository::new(pool.clone())
        .create(email, email.split('@').next().unwrap(), "password123")
        .await
        .unwrap()
}

/// Create a user and return it with a valid bearer token.
pub async fn create_authed_user(pool: &DbPool, email: &str) -> (User, String) {
    let user = create_test_user(pool, email).await;
    let token = test_keys().issue(&user).unwrap();
    (user, token)
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request through the router and decode the JSON response body.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, json)
}

pub async fn create_equipment(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/v1/equipments",
            Some(token),
            Some(serde_json::json!({
                "name": name,
                "type": "strength",
                "muscles": ["chest"],
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().unwrap()
}

pub async fn create_session(app: &Router, token: &str, date: &str) -> i64 {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/v1/workouts",
            Some(token),
            Some(serde_json::json!({ "date": date })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().unwrap()
}

pub async fn log_exercise(
    app: &Router,
    token: &str,
    equipment_id: i64,
    session_id: i64,
    sets: Value,
) -> (StatusCode, Value) {
    send(
        app,
        request(
            Method::POST,
            "/api/v1/workout/exercises",
            Some(token),
            Some(serde_json::json!({
                "equipmentId": equipment_id,
                "workoutSessionId": session_id,
                "sets": sets,
            })),
        ),
    )
    .await
}
