pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::JsonFileRepository;
pub use app::{Console, GradebookService};
pub use config::AppConfig;
pub use domain::{Course, GradeCategory, GradeManager, LetterGrade, Student};
pub use utils::error::{GradebookError, Result};
