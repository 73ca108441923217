//! Explicit session context.
//!
//! Every operation that acts on behalf of a user takes a [`Session`]
//! argument instead of looking the identity up from ambient state.

/// The authenticated user an operation runs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Owner identifier used for routines, history and meal plans.
    pub user_email: String,

    /// Bearer token issued by the hosted backend, if signed in remotely.
    pub access_token: Option<String>,
}

impl Session {
    /// A session without a backend token, as used with the local store.
    pub fn local(user_email: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Whether this session's user owns rows keyed by `owner`.
    pub fn owns(&self, owner: &str) -> bool {
        same_owner(&self.user_email, owner)
    }
}

/// Owner identifiers are e-mail addresses and compare without regard to
/// ASCII case. Stores filter rows with this same rule.
pub fn same_owner(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
