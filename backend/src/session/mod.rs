//! Bearer-token sessions handed out at login.

pub mod state;

pub use state::{Session, SessionsState};
