// Domain layer: entities, grading rules and the aggregate that owns them.
// No I/O here; persistence goes through the `ports` traits.

pub mod grading;
pub mod manager;
pub mod model;
pub mod ports;
pub mod report;

pub use grading::{GradeCategory, LetterGrade};
pub use manager::GradeManager;
pub use model::{Course, Student};
