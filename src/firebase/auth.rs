//! Firebase Auth gateway

use async_trait::async_trait;
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use firetodo_core::domain::AuthResult;
use firetodo_core::gateway::SessionCallback;
use firetodo_core::{AuthError, IdentityProvider, OwnerId, Session, Subscription};

use super::{auth_error, release};

#[wasm_bindgen]
extern "C" {
    type Auth;

    #[wasm_bindgen(js_namespace = firebase, js_name = auth)]
    fn auth() -> Auth;

    #[wasm_bindgen(method, catch, js_name = createUserWithEmailAndPassword)]
    async fn create_user_with_email_and_password(
        this: &Auth,
        email: &str,
        password: &str,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = signInWithEmailAndPassword)]
    async fn sign_in_with_email_and_password(
        this: &Auth,
        email: &str,
        password: &str,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = signOut)]
    async fn sign_out(this: &Auth) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = onAuthStateChanged)]
    fn on_auth_state_changed(this: &Auth, observer: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;

    type User;

    #[wasm_bindgen(method, getter)]
    fn uid(this: &User) -> String;

    #[wasm_bindgen(method, getter)]
    fn email(this: &User) -> Option<String>;
}

/// `IdentityProvider` backed by `firebase.auth()`
pub struct FirebaseIdentity {
    auth: Auth,
}

impl FirebaseIdentity {
    pub fn new() -> Self {
        Self { auth: auth() }
    }
}

fn session_from_user(user: &JsValue) -> Option<Session> {
    if user.is_null() || user.is_undefined() {
        return None;
    }
    let user: &User = user.unchecked_ref();
    match OwnerId::parse(user.uid()) {
        Ok(id) => Some(Session::new(id, user.email())),
        Err(err) => {
            log::warn!("ignoring user without id: {err}");
            None
        }
    }
}

/// Session of the `user` on a resolved `UserCredential`
fn session_from_credential(credential: &JsValue) -> AuthResult<Session> {
    let user = Reflect::get(credential, &JsValue::from_str("user")).map_err(auth_error)?;
    session_from_user(&user).ok_or_else(|| AuthError::new("auth/no-user", "No user was returned."))
}

#[async_trait(?Send)]
impl IdentityProvider for FirebaseIdentity {
    async fn register_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let credential = self
            .auth
            .create_user_with_email_and_password(email, password)
            .await
            .map_err(auth_error)?;
        session_from_credential(&credential)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let credential = self
            .auth
            .sign_in_with_email_and_password(email, password)
            .await
            .map_err(auth_error)?;
        session_from_credential(&credential)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.auth.sign_out().await.map_err(auth_error)?;
        Ok(())
    }

    fn on_session_change(&self, callback: SessionCallback) -> Subscription {
        let observer = Closure::<dyn FnMut(JsValue)>::new(move |user: JsValue| {
            callback(session_from_user(&user));
        });
        let unsubscribe = self.auth.on_auth_state_changed(&observer);
        Subscription::new(move || {
            release(&unsubscribe, "auth observer");
            drop(observer);
        })
    }
}
