//! Credential Form Handler
//!
//! Login / register logic behind the sign-in page.

use std::rc::Rc;
use std::time::Duration;

use log::{info, warn};

use crate::domain::{AuthError, Session, ValidationError};
use crate::gate::{Navigator, Page};
use crate::gateway::{IdentityProvider, Subscription};

/// Shortest password accepted when registering
pub const MIN_PASSWORD_LEN: usize = 6;
/// How long a form message stays visible
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);
/// Pause between a successful registration and the redirect
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub const REGISTERED_MESSAGE: &str = "Account created successfully! Redirecting...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    /// Form title and idle submit label
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    /// Submit label while the request is in flight
    pub fn busy_label(&self) -> &'static str {
        match self {
            AuthMode::Login => "Logging in...",
            AuthMode::Register => "Creating Account...",
        }
    }

    /// Prompt and link text for switching to the other mode
    pub fn switch_prompt(&self) -> (&'static str, &'static str) {
        match self {
            AuthMode::Login => ("Don't have an account?", "Register"),
            AuthMode::Register => ("Already have an account?", "Login"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Success,
}

impl Tone {
    pub fn class(&self) -> &'static str {
        match self {
            Tone::Error => "error-message",
            Tone::Success => "success-message",
        }
    }
}

/// Message shown under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub text: String,
    pub tone: Tone,
}

impl FormMessage {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed, nothing was sent
    Rejected(ValidationError),
    Failed(AuthError),
    /// Already redirected to the todo page
    SignedIn(Session),
    /// Caller shows the success message, then calls `finish_registration`
    Registered(Session),
}

impl SubmitOutcome {
    /// Message to show for this outcome, if any
    pub fn message(&self) -> Option<FormMessage> {
        match self {
            SubmitOutcome::Rejected(err) => Some(FormMessage::error(err.to_string())),
            SubmitOutcome::Failed(err) => Some(FormMessage::error(err.to_string())),
            SubmitOutcome::SignedIn(_) => None,
            SubmitOutcome::Registered(_) => Some(FormMessage::success(REGISTERED_MESSAGE)),
        }
    }

    /// The form should accept another attempt
    pub fn allows_retry(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_) | SubmitOutcome::Failed(_))
    }
}

/// Length is counted in UTF-16 units, the way the browser counts it
pub fn validate_password(mode: AuthMode, password: &str) -> Result<(), ValidationError> {
    if mode == AuthMode::Register && password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    Ok(())
}

#[derive(Clone)]
pub struct CredentialForm {
    identity: Rc<dyn IdentityProvider>,
    navigator: Rc<dyn Navigator>,
}

impl CredentialForm {
    pub fn new(identity: Rc<dyn IdentityProvider>, navigator: Rc<dyn Navigator>) -> Self {
        Self { identity, navigator }
    }

    pub async fn submit(&self, mode: AuthMode, email: &str, password: &str) -> SubmitOutcome {
        if let Err(err) = validate_password(mode, password) {
            return SubmitOutcome::Rejected(err);
        }

        let result = match mode {
            AuthMode::Login => self.identity.sign_in_with_password(email, password).await,
            AuthMode::Register => self.identity.register_with_password(email, password).await,
        };

        match (mode, result) {
            (_, Err(err)) => {
                warn!("{} failed: {} ({})", mode.title().to_lowercase(), err.message, err.code);
                SubmitOutcome::Failed(err)
            }
            (AuthMode::Login, Ok(session)) => {
                info!("signed in as {}", session.display_name());
                self.navigator.navigate(Page::Todos);
                SubmitOutcome::SignedIn(session)
            }
            (AuthMode::Register, Ok(session)) => {
                info!("registered {}", session.display_name());
                SubmitOutcome::Registered(session)
            }
        }
    }

    /// Redirect after the registration message has been shown
    pub fn finish_registration(&self) {
        self.navigator.navigate(Page::Todos);
    }

    /// Send already signed-in users straight to the todo page
    pub fn watch_session(&self) -> Subscription {
        let navigator = self.navigator.clone();
        self.identity.on_session_change(Box::new(move |session: Option<Session>| {
            if session.is_some() {
                navigator.navigate(Page::Todos);
            }
        }))
    }
}
