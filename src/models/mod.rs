pub mod equipment;
pub mod from_row;
pub mod progress;
pub mod response;
pub mod user;
pub mod workout_exercise;
pub mod workout_session;

pub use equipment::{
    Equipment, EquipmentForm, EquipmentType, EquipmentWithMuscles, TargetMuscle, ValidEquipment,
};
pub use from_row::{query_all, query_optional, FromSqliteRow};
pub use progress::Progress;
pub use response::ApiResponse;
pub use user::{LoginCredentials, RegisterUser, User};
pub use workout_exercise::{
    CreateWorkoutExercise, ExerciseWithEquipment, ExerciseWithSession, NewSet, WorkoutExercise,
    WorkoutExerciseWithSets, WorkoutSet,
};
pub use workout_session::{
    CreateWorkoutSession, EndWorkoutSession, WorkoutSession, WorkoutSessionDetail,
};
