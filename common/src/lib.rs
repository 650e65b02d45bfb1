//! Data model shared between the HTTP handlers and their tests.

pub mod model;
pub mod reports;
pub mod requests;
