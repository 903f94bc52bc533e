//! Auth store - local sign-up/sign-in against a persisted user list
//!
//! There is no security here: passwords are kept in plaintext next to the
//! user records and the trust boundary is the local device.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{ProfileUpdate, StoredUser, User};
use crate::ports::KeyValueStore;
use crate::services::persist::{
    load_document, load_state, save_document, save_state, simulate_latency, LoadingGuard,
};

/// Storage key of the persisted session
pub const AUTH_KEY: &str = "auth-storage";

/// Storage key of the user list (bare JSON array, passwords included)
pub const USERS_KEY: &str = "users";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    is_authenticated: bool,
}

impl Session {
    fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }
}

/// Session holder plus credential checks
pub struct AuthStore {
    storage: Arc<dyn KeyValueStore>,
    session: RwLock<Session>,
    loading: AtomicUsize,
    /// Held while the session or user list is read, changed and written back
    mutation: Mutex<()>,
    latency: Duration,
}

impl AuthStore {
    /// Hydrate the session from storage
    pub async fn load(storage: Arc<dyn KeyValueStore>, latency: Duration) -> Result<Self> {
        let session: Session = load_state(storage.as_ref(), AUTH_KEY).await?;
        Ok(Self {
            storage,
            session: RwLock::new(session),
            loading: AtomicUsize::new(0),
            mutation: Mutex::new(()),
            latency,
        })
    }

    /// True while sign-up or sign-in is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let session = self.read();
        session.is_authenticated && session.user.is_some()
    }

    /// The signed-in user, or an auth error
    pub fn require_user(&self) -> Result<User> {
        self.current_user()
            .ok_or_else(|| Error::auth("No user logged in"))
    }

    /// Create an account and sign it in
    pub async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<User> {
        let _loading = LoadingGuard::raise(&self.loading);
        simulate_latency(self.latency).await;

        if email.trim().is_empty() || password.is_empty() || full_name.trim().is_empty() {
            return Err(Error::validation("Please fill in all fields"));
        }

        let _mutation = self.mutation.lock().await;
        let mut users: Vec<StoredUser> = load_document(self.storage.as_ref(), USERS_KEY).await?;
        if users.iter().any(|u| u.user.email == email) {
            return Err(Error::auth("User already exists"));
        }

        let user = User::new(
            format!("user_{}", Uuid::new_v4().simple()),
            email,
            full_name,
        );
        users.push(StoredUser {
            user: user.clone(),
            password: password.to_string(),
        });
        save_document(self.storage.as_ref(), USERS_KEY, &users).await?;

        self.set_session(Session::signed_in(user.clone())).await?;
        Ok(user)
    }

    /// Check credentials against the user list and start a session
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let _loading = LoadingGuard::raise(&self.loading);
        simulate_latency(self.latency).await;

        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("Please fill in all fields"));
        }

        let _mutation = self.mutation.lock().await;
        let users: Vec<StoredUser> = load_document(self.storage.as_ref(), USERS_KEY).await?;
        let user = users
            .into_iter()
            .find(|u| u.user.email == email && u.password == password)
            .map(|u| u.user)
            .ok_or_else(|| Error::auth("Invalid email or password"))?;

        self.set_session(Session::signed_in(user.clone())).await?;
        Ok(user)
    }

    /// End the session; the persisted session document is removed
    pub async fn sign_out(&self) -> Result<()> {
        let _mutation = self.mutation.lock().await;
        self.storage.remove_item(AUTH_KEY).await?;
        self.replace_session(Session::default())
    }

    /// Merge profile changes into the session and the stored user record
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let _mutation = self.mutation.lock().await;
        let mut user = self.require_user()?;
        user.apply(&update);
        self.set_session(Session::signed_in(user.clone())).await?;

        let mut users: Vec<StoredUser> = load_document(self.storage.as_ref(), USERS_KEY).await?;
        if let Some(stored) = users.iter_mut().find(|u| u.user.id == user.id) {
            stored.user.apply(&update);
            save_document(self.storage.as_ref(), USERS_KEY, &users).await?;
        }

        Ok(user)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    async fn set_session(&self, session: Session) -> Result<()> {
        save_state(self.storage.as_ref(), AUTH_KEY, &session).await?;
        self.replace_session(session)
    }

    fn replace_session(&self, session: Session) -> Result<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        *guard = session;
        Ok(())
    }
}
