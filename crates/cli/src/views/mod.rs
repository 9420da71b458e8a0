pub mod dashboard;
pub mod format;
pub mod orders;
pub mod settings;
