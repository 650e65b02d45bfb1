pub mod academics;
pub mod batch;
pub mod identity;
pub mod mentor;
pub mod student;
