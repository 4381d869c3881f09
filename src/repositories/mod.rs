pub mod equipment_repo;
pub mod exercise_repo;
pub mod user_repo;
pub mod workout_repo;

pub use equipment_repo::EquipmentRepository;
pub use exercise_repo::ExerciseRepository;
pub use user_repo::UserRepository;
pub use workout_repo::WorkoutRepository;
