use axum::{
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::handlers::{equipment, health, progress, users, workout_exercises, workouts};
use crate::middleware::Authenticator;

pub struct AppStates {
    pub users: users::UsersState,
    pub equipment: equipment::EquipmentState,
    pub workouts: workouts::WorkoutsState,
    pub workout_exercises: workout_exercises::WorkoutExercisesState,
    pub progress: progress::ProgressState,
}

pub fn create_router(
    states: AppStates,
    authenticator: Authenticator,
    frontend_url: Option<&str>,
) -> Router {
    let users_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/me", get(users::me).delete(users::delete_me))
        .with_state(states.users);

    let equipment_routes = Router::new()
        .route("/", get(equipment::list).post(equipment::create))
        .route(
            "/{id}",
            get(equipment::show)
                .put(equipment::update)
                .delete(equipment::delete),
        )
        .with_state(states.equipment);

    let workout_routes = Router::new()
        .route("/", get(workouts::list).post(workouts::create))
        .route("/{id}", get(workouts::show).delete(workouts::delete))
        .route("/{id}/end", patch(workouts::end))
        .with_state(states.workouts);

    let workout_exercise_routes = Router::new()
        .route("/", post(workout_exercises::create))
        .route(
            "/{id}",
            get(workout_exercises::show).delete(workout_exercises::delete),
        )
        .with_state(states.workout_exercises);

    let progress_routes = Router::new()
        .route("/{id}", get(progress::show))
        .with_state(states.progress);

    let api = Router::new()
        .route("/health", get(health::health_check))
        .nest("/users", users_routes)
        .nest("/equipments", equipment_routes)
        .nest("/workouts", workout_routes)
        .nest("/workout/exercises", workout_exercise_routes)
        .nest("/progress", progress_routes);

    Router::new()
        .route("/", get(health::root))
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(Extension(authenticator))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer(frontend_url))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin).allow_credentials(true),
        Some(Err(_)) => {
            tracing::warn!("FRONTEND_URL is not a valid origin, allowing any origin");
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Route not found",
            "message": format!("Cannot {} {}", method, uri.path()),
        })),
    )
}
