pub mod config;
pub mod library;
pub mod material;
pub mod note;
pub mod study_task;

pub use config::*;
pub use library::*;
pub use material::*;
pub use note::*;
pub use study_task::*;
