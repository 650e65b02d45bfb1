//! In-memory session store.
//!
//! `SessionsState` is cloned into the Actix application state in `main.rs`.
//! Tokens live until logout, until their identity is deleted, or until the
//! process exits; there is no persistence.

use common::model::identity::Role;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Who a token belongs to and which login door they came through.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub identity_id: i64,
    pub username: String,
    pub role: Role,
}

#[derive(Clone, Default)]
pub struct SessionsState {
    /// Token to session. Reads come from every guarded request, writes only
    /// from login, logout and account deletion.
    pub sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionsState {
    /// Stores the session under a fresh token and returns the token.
    pub async fn open(&self, session: Session) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn close(&self, token: &str) -> Option<Session> {
        self.sessions.write().await.remove(token)
    }

    /// Drops every session held by one of `identity_ids`. Returns how many
    /// were dropped.
    pub async fn revoke_identities(&self, identity_ids: &[i64]) -> usize {
        if identity_ids.is_empty() {
            return 0;
        }
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !identity_ids.contains(&session.identity_id));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(identity_id: i64) -> Session {
        Session {
            identity_id,
            username: format!("user{}", identity_id),
            role: Role::Student,
        }
    }

    #[actix_web::test]
    async fn open_get_close() {
        let state = SessionsState::default();
        let token = state.open(session(1)).await;

        assert_eq!(state.get(&token).await, Some(session(1)));
        assert_eq!(state.close(&token).await, Some(session(1)));
        assert_eq!(state.get(&token).await, None);
    }

    #[actix_web::test]
    async fn revocation_only_hits_listed_identities() {
        let state = SessionsState::default();
        let a = state.open(session(1)).await;
        let b = state.open(session(1)).await;
        let c = state.open(session(2)).await;

        assert_ne!(a, b);
        assert_eq!(state.revoke_identities(&[1]).await, 2);
        assert!(state.get(&a).await.is_none());
        assert!(state.get(&c).await.is_some());
    }
}
