//! Single-slot auth failure notification
//!
//! Exactly one handler is registered at a time; registering again replaces
//! it. The notifier is a cloneable handle, so the session controller keeps
//! one clone for registration and the `AuthClient` keeps another. Clones
//! share the slot; separately constructed notifiers do not.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error};

/// Callback run when a stored credential is rejected.
pub type AuthFailHandler = Arc<dyn Fn() + Send + Sync>;

/// One-slot registry for the auth failure handler.
#[derive(Clone, Default)]
pub struct AuthFailureNotifier {
    slot: Arc<RwLock<Option<AuthFailHandler>>>,
}

impl AuthFailureNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registered handler. `None` clears it. Last write wins.
    pub fn set_on_auth_fail(&self, handler: Option<AuthFailHandler>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = handler;
    }

    /// Register a closure as the handler.
    pub fn on_auth_fail<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.set_on_auth_fail(Some(Arc::new(handler)));
    }

    pub fn is_registered(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Run the current handler once, synchronously.
    ///
    /// The handler is cloned out of the slot before it runs, so it may
    /// re-register itself. A panicking handler is caught and logged.
    /// Returns whether a handler was registered.
    pub(crate) fn notify(&self) -> bool {
        let handler = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(handler) = handler else {
            debug!("no auth failure handler registered");
            return false;
        };

        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler())) {
            error!(
                panic = panic_message(payload.as_ref()),
                "auth failure handler panicked"
            );
        }
        true
    }
}

impl fmt::Debug for AuthFailureNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthFailureNotifier")
            .field("registered", &self.is_registered())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
