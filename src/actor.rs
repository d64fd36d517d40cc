//! Who is making the change.
//!
//! The revisions ledger stores a username per revision. The audit writer asks
//! the configured [`CurrentActorProvider`] at commit time, so the provider
//! can read request-scoped state.

use std::fmt;

/// Resolves the username recorded against a new revision.
pub trait CurrentActorProvider: Send + Sync {
    /// Username of the current actor, or an empty string when anonymous.
    fn current_username(&self) -> String;
}

/// Provider used when none is configured. Always anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousActor;

impl CurrentActorProvider for AnonymousActor {
    fn current_username(&self) -> String {
        String::new()
    }
}

/// Provider that always reports the same username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedActor(Option<String>);

impl FixedActor {
    /// Report `username` for every revision. `None` means anonymous.
    pub fn new(username: Option<String>) -> Self {
        Self(username)
    }
}

impl CurrentActorProvider for FixedActor {
    fn current_username(&self) -> String {
        self.0.clone().unwrap_or_default()
    }
}

/// Provider that reads the username from an environment variable on every
/// call. Unset or non-UTF-8 values are anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvActor {
    variable: String,
}

impl EnvActor {
    /// Read the username from `variable`.
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl CurrentActorProvider for EnvActor {
    fn current_username(&self) -> String {
        std::env::var(&self.variable).unwrap_or_default()
    }
}

/// Provider backed by a closure, evaluated on every call.
pub struct ActorFn<F>(pub F);

impl<F> CurrentActorProvider for ActorFn<F>
where
    F: Fn() -> String + Send + Sync,
{
    fn current_username(&self) -> String {
        (self.0)()
    }
}

/// Debug shim so configurations holding a boxed provider stay printable.
///
/// Never calls the provider.
pub(crate) struct ActorDebug<'a>(pub(crate) &'a dyn CurrentActorProvider);

impl fmt::Debug for ActorDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn CurrentActorProvider@{:p}", self.0)
    }
}
