// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session controller: identity events in, session state out.
//!
//! ```text
//! Unauthenticated --SignedIn--> Resolving --profile found--> Authenticated
//!                                   |
//!                                   +--profile missing--> ErrorNoProfile --forced sign-out--> Unauthenticated
//! Authenticated --SignedOut--> Unauthenticated
//! ```

use crate::db::UserRepository;
use crate::error::{AppError, INVALID_CREDENTIALS_MESSAGE};
use crate::models::Session;
use crate::services::identity::{Identity, IdentityEvent, IdentityProvider};
use crate::services::users::UsersService;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const SUBMIT_LABEL: &str = "Войти";
const SUBMITTING_LABEL: &str = "Вход...";

/// Current position in the session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    Resolving { uid: String },
    Authenticated(Session),
    ErrorNoProfile { uid: String },
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Resolving { .. } => "resolving",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::ErrorNoProfile { .. } => "error_no_profile",
        }
    }
}

/// Sign-in form state as the client should display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SignInForm {
    pub submit_enabled: bool,
    pub submit_label: String,
    pub error: Option<String>,
}

impl Default for SignInForm {
    fn default() -> Self {
        Self {
            submit_enabled: true,
            submit_label: SUBMIT_LABEL.to_string(),
            error: None,
        }
    }
}

impl SignInForm {
    /// Clear the previous error and disable the submit control.
    pub fn begin_submit(&mut self) {
        self.error = None;
        self.submit_enabled = false;
        self.submit_label = SUBMITTING_LABEL.to_string();
    }

    /// Re-enable the submit control and show the generic failure message.
    pub fn fail(&mut self) {
        self.error = Some(INVALID_CREDENTIALS_MESSAGE.to_string());
        self.submit_enabled = true;
        self.submit_label = SUBMIT_LABEL.to_string();
    }
}

/// Drives [`SessionState`] from identity events.
///
/// The process holds one controller whose [`spawn_listener`] follows the
/// provider's event stream for the lifetime of the server. Request handlers
/// create short-lived controllers and call [`handle_event`] directly.
///
/// Leaving a session (sign-out or a missing profile) drops the user's
/// admin snapshot when a [`UsersService`] is attached.
///
/// [`handle_event`]: SessionController::handle_event
/// [`spawn_listener`]: SessionController::spawn_listener
pub struct SessionController {
    store: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityProvider>,
    users: Option<Arc<UsersService>>,
    state: watch::Sender<SessionState>,
}

impl SessionController {
    pub fn new(store: Arc<dyn UserRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            store,
            identity,
            users: None,
            state,
        }
    }

    pub fn with_users_service(mut self, users: Arc<UsersService>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch state transitions.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn forget_user(&self, uid: &str) {
        if let Some(users) = &self.users {
            users.cache().clear(uid);
        }
    }

    fn transition(&self, next: SessionState) {
        tracing::debug!(state = next.name(), "Session state transition");
        self.state.send_replace(next);
    }

    /// Apply one identity event.
    ///
    /// Returns the session when the event leaves the controller authenticated.
    pub async fn handle_event(&self, event: IdentityEvent) -> Result<Option<Session>, AppError> {
        match event {
            IdentityEvent::SignedIn(identity) => self.resolve(identity).await.map(Some),
            IdentityEvent::SignedOut { uid } => {
                if self.state().session().is_some() {
                    tracing::info!(uid = %uid, "User signed out");
                }
                self.forget_user(&uid);
                self.transition(SessionState::Unauthenticated);
                Ok(None)
            }
        }
    }

    async fn resolve(&self, identity: Identity) -> Result<Session, AppError> {
        self.transition(SessionState::Resolving {
            uid: identity.uid.clone(),
        });

        let profile = match self.store.get_user(&identity.uid).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(uid = %identity.uid, error = %e, "Profile lookup failed");
                self.transition(SessionState::Unauthenticated);
                return Err(e);
            }
        };

        match profile {
            Some(profile) => {
                let session = Session::compose(&identity, &profile);
                tracing::info!(
                    uid = %session.uid,
                    role = session.role.as_str(),
                    "User signed in"
                );
                self.transition(SessionState::Authenticated(session.clone()));
                Ok(session)
            }
            None => {
                tracing::error!(uid = %identity.uid, "No profile record for identity, forcing sign-out");
                self.transition(SessionState::ErrorNoProfile {
                    uid: identity.uid.clone(),
                });
                self.forget_user(&identity.uid);
                self.identity.sign_out(&identity.uid).await;
                self.transition(SessionState::Unauthenticated);
                Err(AppError::ProfileMissing(identity.uid))
            }
        }
    }

    /// Sign in from a form submission.
    ///
    /// On credential failure the form is re-enabled with the generic message
    /// and the state stays `Unauthenticated`.
    pub async fn sign_in(
        &self,
        form: &mut SignInForm,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        form.begin_submit();

        let identity = match self.identity.sign_in(email, password).await {
            Ok(identity) => identity,
            Err(e) => {
                form.fail();
                return Err(e);
            }
        };

        self.resolve(identity).await.inspect_err(|_| {
            // Back on the sign-in screen with a usable form.
            *form = SignInForm::default();
        })
    }

    /// Sign out after the user confirmed.
    pub async fn sign_out(&self, confirmed: bool, uid: &str) -> Result<(), AppError> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired);
        }
        self.identity.sign_out(uid).await;
        self.handle_event(IdentityEvent::SignedOut {
            uid: uid.to_string(),
        })
        .await?;
        Ok(())
    }

    /// Follow the provider's event stream for the lifetime of the controller.
    pub fn spawn_listener(self: Arc<Self>) -> JoinHandle<()> {
        let mut events = self.identity.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if let Err(e) = self.handle_event(event).await {
                            tracing::warn!(error = %e, "Identity event did not produce a session");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Identity event listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, UserRepository};
    use crate::models::{Role, UserProfile};
    use crate::services::identity::MemoryIdentityProvider;
    use std::time::Duration;

    fn admin_profile() -> UserProfile {
        UserProfile {
            id: "uid-ivan".to_string(),
            name: "Иван".to_string(),
            email: "ivan@company.com".to_string(),
            role: Role::Admin,
            blocked: false,
            created_at: None,
        }
    }

    fn setup(profiles: Vec<UserProfile>) -> (SessionController, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_users(profiles));
        let identity = Arc::new(MemoryIdentityProvider::new());
        identity.add_account("uid-ivan", "ivan@company.com", "correct-horse");
        let controller = SessionController::new(store.clone(), identity);
        (controller, store)
    }

    #[tokio::test]
    async fn test_sign_in_with_profile_authenticates() {
        let (controller, _) = setup(vec![admin_profile()]);
        let mut form = SignInForm::default();

        let session = controller
            .sign_in(&mut form, "ivan@company.com", "correct-horse")
            .await
            .unwrap();

        assert_eq!(session.role, Role::Admin);
        assert_eq!(controller.state(), SessionState::Authenticated(session));
        assert!(!form.submit_enabled);
        assert!(form.error.is_none());
    }

    #[tokio::test]
    async fn test_invalid_credentials_reenable_form() {
        let (controller, _) = setup(vec![admin_profile()]);
        let mut form = SignInForm::default();

        let err = controller
            .sign_in(&mut form, "ivan@company.com", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AuthenticationFailed));
        assert_eq!(controller.state(), SessionState::Unauthenticated);
        assert!(form.submit_enabled);
        assert_eq!(form.submit_label, "Войти");
        assert_eq!(form.error.as_deref(), Some("Неверный email или пароль."));
    }

    #[tokio::test]
    async fn test_missing_profile_forces_sign_out() {
        let (controller, _) = setup(vec![]);
        let mut states = controller.watch();
        let mut form = SignInForm::default();

        let err = controller
            .sign_in(&mut form, "ivan@company.com", "correct-horse")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ProfileMissing(uid) if uid == "uid-ivan"));
        assert_eq!(controller.state(), SessionState::Unauthenticated);
        assert_eq!(form, SignInForm::default());
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_store_failure_during_resolution_is_surfaced() {
        let (controller, store) = setup(vec![admin_profile()]);
        store.set_offline(true);

        let result = controller
            .handle_event(IdentityEvent::SignedIn(Identity {
                uid: "uid-ivan".to_string(),
                email: "ivan@company.com".to_string(),
            }))
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(controller.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_sign_out_requires_confirmation() {
        let (controller, _) = setup(vec![admin_profile()]);
        let mut form = SignInForm::default();
        controller
            .sign_in(&mut form, "ivan@company.com", "correct-horse")
            .await
            .unwrap();

        let err = controller.sign_out(false, "uid-ivan").await.unwrap_err();
        assert!(matches!(err, AppError::ConfirmationRequired));
        assert!(controller.state().session().is_some());

        controller.sign_out(true, "uid-ivan").await.unwrap();
        assert_eq!(controller.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_listener_follows_provider_events() {
        let store = Arc::new(MemoryStore::with_users([admin_profile()]));
        let identity = Arc::new(MemoryIdentityProvider::new());
        identity.add_account("uid-ivan", "ivan@company.com", "correct-horse");
        let controller = Arc::new(SessionController::new(store, identity.clone()));
        let mut states = controller.watch();
        let handle = controller.clone().spawn_listener();

        identity
            .sign_in("ivan@company.com", "correct-horse")
            .await
            .unwrap();
        let authenticated = tokio::time::timeout(
            Duration::from_secs(1),
            states.wait_for(|s| matches!(s, SessionState::Authenticated(_))),
        )
        .await
        .map(|seen| seen.is_ok());
        assert!(matches!(authenticated, Ok(true)));

        identity.sign_out("uid-ivan").await;
        let signed_out = tokio::time::timeout(
            Duration::from_secs(1),
            states.wait_for(|s| *s == SessionState::Unauthenticated),
        )
        .await
        .map(|seen| seen.is_ok());
        assert!(matches!(signed_out, Ok(true)));

        handle.abort();
    }

    #[tokio::test]
    async fn test_leaving_a_session_drops_admin_snapshot() {
        let store = Arc::new(MemoryStore::with_users([admin_profile()]));
        let identity = Arc::new(MemoryIdentityProvider::new());
        let users = Arc::new(UsersService::new(store.clone()));
        let controller = Arc::new(
            SessionController::new(store.clone(), identity.clone())
                .with_users_service(users.clone()),
        );
        let handle = controller.clone().spawn_listener();

        users.load_users_tab("uid-ivan").await.unwrap();
        assert!(users.cache().snapshot("uid-ivan").is_some());

        // Sign-out published by the provider reaches the listener.
        identity.sign_out("uid-ivan").await;
        let mut cleared = false;
        for _ in 0..100 {
            if users.cache().snapshot("uid-ivan").is_none() {
                cleared = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(cleared);
        handle.abort();

        // Forced sign-out after the profile disappears.
        users.load_users_tab("uid-ivan").await.unwrap();
        store.delete_user("uid-ivan").await.unwrap();
        let err = controller
            .handle_event(IdentityEvent::SignedIn(Identity {
                uid: "uid-ivan".to_string(),
                email: "ivan@company.com".to_string(),
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProfileMissing(_)));
        assert!(users.cache().snapshot("uid-ivan").is_none());
    }
}
