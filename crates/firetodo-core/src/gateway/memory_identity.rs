//! In-Memory Identity Provider
//!
//! Email/password accounts kept in a map. Error codes and messages follow the
//! Firebase Auth wording so the UI behaves the same against either backend.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use async_trait::async_trait;

use super::traits::{IdentityProvider, SessionCallback, Subscription};
use crate::domain::{AuthError, AuthResult, OwnerId, Session};

/// Minimum password length accepted by the provider itself
const PROVIDER_MIN_PASSWORD_LEN: usize = 6;

struct Account {
    password: String,
    session: Session,
}

#[derive(Default)]
struct IdentityState {
    accounts: HashMap<String, Account>,
    current: Option<Session>,
    listeners: Vec<(u64, Rc<dyn Fn(Option<Session>)>)>,
    next_listener: u64,
    next_uid: u64,
    sign_out_failure: Option<AuthError>,
    credential_calls: usize,
}

#[derive(Clone, Default)]
pub struct MemoryIdentity {
    state: Rc<RefCell<IdentityState>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account without signing it in
    pub fn with_account(&self, email: &str, password: &str) -> Session {
        let mut state = self.state.borrow_mut();
        let session = Self::new_session(&mut state, email);
        state.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                session: session.clone(),
            },
        );
        session
    }

    /// Switch the current session, as an external sign-in or expiry would
    pub fn set_current(&self, session: Option<Session>) {
        self.state.borrow_mut().current = session;
        self.notify();
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().current.clone()
    }

    pub fn fail_sign_out(&self, err: AuthError) {
        self.state.borrow_mut().sign_out_failure = Some(err);
    }

    /// Number of register / sign-in calls made so far
    pub fn credential_calls(&self) -> usize {
        self.state.borrow().credential_calls
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn new_session(state: &mut IdentityState, email: &str) -> Session {
        state.next_uid += 1;
        let id = OwnerId::parse(format!("uid-{}", state.next_uid)).expect("generated uid is never empty");
        Session::new(id, Some(email.to_string()))
    }

    fn notify(&self) {
        let (listeners, current) = {
            let state = self.state.borrow();
            let listeners: Vec<_> = state.listeners.iter().map(|(_, cb)| cb.clone()).collect();
            (listeners, state.current.clone())
        };
        for callback in listeners {
            callback(current.clone());
        }
    }

    fn sign_in_as(&self, session: Session) -> Session {
        self.set_current(Some(session.clone()));
        session
    }

    fn remove_listener(state: &Weak<RefCell<IdentityState>>, id: u64) {
        if let Some(state) = state.upgrade() {
            state.borrow_mut().listeners.retain(|(listener, _)| *listener != id);
        }
    }
}

fn auth_error(code: &str) -> AuthError {
    AuthError::new(code, format!("Firebase: Error ({code})."))
}

#[async_trait(?Send)]
impl IdentityProvider for MemoryIdentity {
    async fn register_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let session = {
            let mut state = self.state.borrow_mut();
            state.credential_calls += 1;
            if !email.contains('@') {
                return Err(auth_error("auth/invalid-email"));
            }
            if password.chars().count() < PROVIDER_MIN_PASSWORD_LEN {
                return Err(AuthError::new(
                    "auth/weak-password",
                    "Firebase: Password should be at least 6 characters (auth/weak-password).",
                ));
            }
            if state.accounts.contains_key(email) {
                return Err(auth_error("auth/email-already-in-use"));
            }
            let session = Self::new_session(&mut state, email);
            state.accounts.insert(
                email.to_string(),
                Account {
                    password: password.to_string(),
                    session: session.clone(),
                },
            );
            session
        };
        Ok(self.sign_in_as(session))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let session = {
            let mut state = self.state.borrow_mut();
            state.credential_calls += 1;
            match state.accounts.get(email) {
                Some(account) if account.password == password => account.session.clone(),
                _ => return Err(auth_error("auth/invalid-credential")),
            }
        };
        Ok(self.sign_in_as(session))
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if let Some(err) = self.state.borrow_mut().sign_out_failure.take() {
            return Err(err);
        }
        self.set_current(None);
        Ok(())
    }

    fn on_session_change(&self, callback: SessionCallback) -> Subscription {
        let callback: Rc<dyn Fn(Option<Session>)> = Rc::from(callback);
        let (id, current) = {
            let mut state = self.state.borrow_mut();
            state.next_listener += 1;
            let id = state.next_listener;
            state.listeners.push((id, callback.clone()));
            (id, state.current.clone())
        };
        callback(current);

        let state = Rc::downgrade(&self.state);
        Subscription::new(move || Self::remove_listener(&state, id))
    }
}
