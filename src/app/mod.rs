pub mod console;
pub mod service;

pub use console::Console;
pub use service::GradebookService;
