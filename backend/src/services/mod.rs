//! HTTP route groups. Each sub-module exposes `configure_routes()` returning
//! the `Scope` mounted by [`crate::configure`].

mod access;

pub mod auth;
pub mod dashboard;
pub mod marks;
pub mod mentors;
pub mod projects;
pub mod students;
pub mod subjects;
pub mod uploads;
