use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymtrack::config::Config;
use gymtrack::handlers::{equipment, progress, users, workout_exercises, workouts};
use gymtrack::middleware::Authenticator;
use gymtrack::repositories::{
    EquipmentRepository, ExerciseRepository, UserRepository, WorkoutRepository,
};
use gymtrack::routes::{self, AppStates};
use gymtrack::token::TokenKeys;
use gymtrack::version::GIT_VERSION;
use gymtrack::{db, migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymtrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        version = GIT_VERSION,
        environment = %config.app_env,
        "Starting gymtrack"
    );
    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;
    migrations::run_migrations(&pool)?;

    // Create repositories
    let user_repo = UserRepository::new(pool.clone());
    let equipment_repo = EquipmentRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());

    let token_keys = TokenKeys::new(&config.jwt_secret, config.jwt_ttl_days);
    let authenticator = Authenticator::new(token_keys.clone(), user_repo.clone());

    // Create handler states
    let states = AppStates {
        users: users::UsersState {
            user_repo: user_repo.clone(),
            token_keys,
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
            workout_repo: workout_repo.clone(),
        },
        progress: progress::ProgressState {
            equipment_repo,
            exercise_repo,
        },
    };

    let app = routes::create_router(states, authenticator, config.frontend_url.as_deref());

    let addr = config.server_addr();
    tracing::info!("API URL: http://{}/api/v1", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received, shutting down gracefully"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully"),
    }
}
