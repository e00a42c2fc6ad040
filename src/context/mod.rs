use std::cell::RefCell;
use std::future::Future;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ContextError;

tokio::task_local! {
    static CREDENTIAL: RefCell<Option<Credential>>;
}

/// Opaque bearer token forwarded on internal service calls.
///
/// Wipes its backing storage on drop and never prints token material.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Unit-of-work-scoped holder for the caller's credential.
///
/// Each unit of work (one inbound request, or one explicitly started
/// background operation) runs inside a scope installed with [`scope`] or
/// [`scope_with`]. The slot lives in task-local storage, so concurrent
/// units of work never observe each other's credential, and the slot is
/// released on every exit path (normal return, error, panic, or task
/// cancellation) before the worker can pick up unrelated work.
///
/// Spawning a task starts a new unit of work: the slot does not follow
/// implicitly across `tokio::spawn`. Carry the credential explicitly with
/// [`scope_with`] when handing work off.
///
/// [`scope`]: CredentialContext::scope
/// [`scope_with`]: CredentialContext::scope_with
pub struct CredentialContext;

impl CredentialContext {
    /// Run `fut` inside a fresh, empty credential scope.
    pub async fn scope<F>(fut: F) -> F::Output
    where
        F: Future,
    {
        CREDENTIAL.scope(RefCell::new(None), fut).await
    }

    /// Run `fut` inside a credential scope seeded with `credential`.
    pub async fn scope_with<F>(credential: Credential, fut: F) -> F::Output
    where
        F: Future,
    {
        CREDENTIAL.scope(RefCell::new(Some(credential)), fut).await
    }

    /// Install `credential` as current for this unit of work.
    ///
    /// Overwriting is allowed; a re-authentication mid-flow is reflected by
    /// every subsequent outbound call in the same unit of work.
    pub fn set(credential: Credential) -> Result<(), ContextError> {
        CREDENTIAL
            .try_with(|slot| {
                *slot.borrow_mut() = Some(credential);
            })
            .map_err(|_| ContextError::Unavailable)
    }

    /// Read the credential installed in this unit of work, if any.
    pub fn get() -> Result<Option<Credential>, ContextError> {
        CREDENTIAL
            .try_with(|slot| slot.borrow().clone())
            .map_err(|_| ContextError::Unavailable)
    }

    /// Remove the stored credential for this unit of work. Idempotent.
    pub fn clear() -> Result<(), ContextError> {
        CREDENTIAL
            .try_with(|slot| {
                slot.borrow_mut().take();
            })
            .map_err(|_| ContextError::Unavailable)
    }
}
