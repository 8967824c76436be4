//! Session Gate
//!
//! Guards the todo page: without a session the user is sent to the sign-in
//! page, with one the page is revealed and exactly one `ListSynchronizer` runs
//! for that session.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{error, info, warn};

use crate::domain::{AuthResult, Session};
use crate::gateway::{IdentityProvider, Subscription};
use crate::sync::ListSynchronizer;

/// Documents the application can send the browser to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    SignIn,
    Todos,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::SignIn => "login.html",
            Page::Todos => "index.html",
        }
    }

    /// Pick the page for a document path; anything but the sign-in document is
    /// the todo page. Clean URLs (`/login`, `/login/`) count as sign-in too.
    pub fn from_path(path: &str) -> Self {
        let file = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if file == "login" || file == Page::SignIn.path() {
            Page::SignIn
        } else {
            Page::Todos
        }
    }
}

pub trait Navigator {
    fn navigate(&self, page: Page);
}

impl<F> Navigator for F
where
    F: Fn(Page),
{
    fn navigate(&self, page: Page) {
        self(page)
    }
}

struct Active {
    session: Session,
    list: ListSynchronizer,
}

struct GateShared {
    identity: Rc<dyn IdentityProvider>,
    navigator: Rc<dyn Navigator>,
    reveal: Box<dyn Fn(&Session) -> ListSynchronizer>,
    active: RefCell<Option<Active>>,
    auth_subscription: RefCell<Option<Subscription>>,
}

impl GateShared {
    fn handle(&self, session: Option<Session>) {
        match session {
            None => {
                self.release();
                info!("no session, redirecting to {}", Page::SignIn.path());
                self.navigator.navigate(Page::SignIn);
            }
            Some(session) => {
                let same = self
                    .active
                    .borrow()
                    .as_ref()
                    .is_some_and(|active| active.session.id == session.id);
                if same {
                    return;
                }
                self.release();
                info!("session {} ready", session.id);
                let list = (self.reveal)(&session);
                *self.active.borrow_mut() = Some(Active { session, list });
            }
        }
    }

    fn release(&self) {
        let previous = self.active.borrow_mut().take();
        if let Some(active) = previous {
            active.list.stop();
        }
    }
}

pub struct SessionGate {
    shared: Rc<GateShared>,
}

impl SessionGate {
    /// Start watching the session. `reveal` shows the page for a session and
    /// returns its list; it runs at most once per distinct session.
    pub fn open(
        identity: Rc<dyn IdentityProvider>,
        navigator: Rc<dyn Navigator>,
        reveal: impl Fn(&Session) -> ListSynchronizer + 'static,
    ) -> Self {
        let shared = Rc::new(GateShared {
            identity,
            navigator,
            reveal: Box::new(reveal),
            active: RefCell::new(None),
            auth_subscription: RefCell::new(None),
        });

        let gate = Self { shared };
        gate.reopen();
        gate
    }

    /// Listen for sessions again after `close`, e.g. when the page comes
    /// back from the back/forward cache. Does nothing while open.
    pub fn reopen(&self) {
        if self.shared.auth_subscription.borrow().is_some() {
            return;
        }
        let weak: Weak<GateShared> = Rc::downgrade(&self.shared);
        let subscription = self.shared.identity.on_session_change(Box::new(move |session: Option<Session>| {
            if let Some(shared) = weak.upgrade() {
                shared.handle(session);
            }
        }));
        *self.shared.auth_subscription.borrow_mut() = Some(subscription);
    }

    pub fn session(&self) -> Option<Session> {
        self.shared.active.borrow().as_ref().map(|a| a.session.clone())
    }

    pub fn list(&self) -> Option<ListSynchronizer> {
        self.shared.active.borrow().as_ref().map(|a| a.list.clone())
    }

    /// Stop listening and release the list. Safe to call more than once.
    pub fn close(&self) {
        let subscription = self.shared.auth_subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        self.shared.release();
    }

    /// Sign out and go to the sign-in page. Failures are only logged.
    pub async fn sign_out(&self) -> AuthResult<()> {
        match self.shared.identity.sign_out().await {
            Ok(()) => {
                self.shared.navigator.navigate(Page::SignIn);
                Ok(())
            }
            Err(err) => {
                error!("error signing out: {err}");
                Err(err)
            }
        }
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        if self.shared.active.borrow().is_some() {
            warn!("session gate dropped without close");
        }
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthError;
    use crate::gateway::{MemoryIdentity, MemoryStore};
    use std::cell::RefCell;

    struct Fixture {
        identity: MemoryIdentity,
        store: MemoryStore,
        visits: Rc<RefCell<Vec<Page>>>,
        revealed: Rc<RefCell<Vec<String>>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                identity: MemoryIdentity::new(),
                store: MemoryStore::new(),
                visits: Rc::default(),
                revealed: Rc::default(),
            }
        }

        fn open(&self) -> SessionGate {
            let visits = self.visits.clone();
            let revealed = self.revealed.clone();
            let store = self.store.clone();
            SessionGate::open(
                Rc::new(self.identity.clone()),
                Rc::new(move |page: Page| visits.borrow_mut().push(page)),
                move |session: &Session| {
                    revealed.borrow_mut().push(session.display_name().to_string());
                    ListSynchronizer::start(
                        session.id.clone(),
                        Rc::new(store.clone()),
                        Rc::new(|_: &str| true),
                        |_: &crate::sync::ListView| {},
                    )
                },
            )
        }
    }

    #[test]
    fn test_page_from_path() {
        assert_eq!(Page::from_path("/app/login.html"), Page::SignIn);
        assert_eq!(Page::from_path("/app/index.html"), Page::Todos);
        assert_eq!(Page::from_path("/"), Page::Todos);
        assert_eq!(Page::from_path(""), Page::Todos);
    }

    #[test]
    fn test_page_from_clean_url() {
        assert_eq!(Page::from_path("/login"), Page::SignIn);
        assert_eq!(Page::from_path("/app/login/"), Page::SignIn);
        assert_eq!(Page::from_path("/LOGIN.HTML"), Page::SignIn);
        assert_eq!(Page::from_path("/login-help"), Page::Todos);
        assert_eq!(Page::from_path("/index"), Page::Todos);
    }

    #[test]
    fn test_absent_session_redirects_without_revealing() {
        let fx = Fixture::new();
        let gate = fx.open();

        assert_eq!(*fx.visits.borrow(), vec![Page::SignIn]);
        assert!(fx.revealed.borrow().is_empty());
        assert!(gate.list().is_none());
        assert_eq!(fx.store.listener_count(), 0);
        gate.close();
    }

    #[test]
    fn test_present_session_starts_one_list() {
        let fx = Fixture::new();
        let session = fx.identity.with_account("ann@example.com", "secret1");
        fx.identity.set_current(Some(session.clone()));

        let gate = fx.open();
        fx.identity.set_current(Some(session.clone()));

        assert!(fx.visits.borrow().is_empty());
        assert_eq!(*fx.revealed.borrow(), vec!["ann@example.com"]);
        assert_eq!(gate.session(), Some(session));
        assert_eq!(fx.store.listener_count(), 1);
        gate.close();
    }

    #[test]
    fn test_new_session_replaces_previous_list() {
        let fx = Fixture::new();
        let ann = fx.identity.with_account("ann@example.com", "secret1");
        let bob = fx.identity.with_account("bob@example.com", "secret2");
        fx.identity.set_current(Some(ann));
        let gate = fx.open();
        let first = gate.list().unwrap();

        fx.identity.set_current(Some(bob.clone()));
        assert!(!first.is_running());
        assert_eq!(gate.list().unwrap().owner(), &bob.id);
        assert_eq!(fx.store.listener_count(), 1);
        gate.close();
    }

    #[test]
    fn test_expiry_stops_list_and_redirects() {
        let fx = Fixture::new();
        let session = fx.identity.with_account("ann@example.com", "secret1");
        fx.identity.set_current(Some(session));
        let gate = fx.open();
        let list = gate.list().unwrap();

        fx.identity.set_current(None);
        assert!(!list.is_running());
        assert_eq!(*fx.visits.borrow(), vec![Page::SignIn]);
        assert_eq!(fx.store.listener_count(), 0);
        gate.close();
    }

    #[test]
    fn test_close_releases_everything_twice_safely() {
        let fx = Fixture::new();
        let session = fx.identity.with_account("ann@example.com", "secret1");
        fx.identity.set_current(Some(session));
        let gate = fx.open();

        gate.close();
        gate.close();
        assert_eq!(fx.identity.listener_count(), 0);
        assert_eq!(fx.store.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_reopen_after_close_restores_a_running_list() {
        let fx = Fixture::new();
        let session = fx.identity.with_account("ann@example.com", "secret1");
        fx.identity.set_current(Some(session.clone()));
        let gate = fx.open();
        let before = gate.list().unwrap();

        gate.close();
        assert!(gate.list().is_none());
        assert!(!before.is_running());

        gate.reopen();
        gate.reopen();
        let after = gate.list().unwrap();
        assert!(after.is_running());
        assert_eq!(after.owner(), &session.id);
        assert_eq!(fx.identity.listener_count(), 1);
        assert_eq!(fx.store.listener_count(), 1);
        assert_eq!(fx.revealed.borrow().len(), 2);

        assert!(matches!(after.create("x").await, crate::sync::CreateOutcome::Created(_)));
        assert_eq!(fx.store.todos().len(), 1);

        fx.identity.set_current(None);
        assert_eq!(*fx.visits.borrow(), vec![Page::SignIn]);
        gate.close();
    }

    #[tokio::test]
    async fn test_sign_out_navigates_to_sign_in() {
        let fx = Fixture::new();
        let session = fx.identity.with_account("ann@example.com", "secret1");
        fx.identity.set_current(Some(session));
        let gate = fx.open();

        gate.sign_out().await.unwrap();
        assert_eq!(fx.identity.current(), None);
        assert!(fx.visits.borrow().iter().all(|p| *p == Page::SignIn));
        assert!(!fx.visits.borrow().is_empty());
        gate.close();
    }

    #[tokio::test]
    async fn test_sign_out_failure_stays_put() {
        let fx = Fixture::new();
        let session = fx.identity.with_account("ann@example.com", "secret1");
        fx.identity.set_current(Some(session));
        let gate = fx.open();
        fx.identity.fail_sign_out(AuthError::new("auth/network-request-failed", "network"));

        assert!(gate.sign_out().await.is_err());
        assert!(fx.visits.borrow().is_empty());
        assert!(gate.list().unwrap().is_running());
        gate.close();
    }
}
