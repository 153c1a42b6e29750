use planboard_auth::Identity;

/// Session lifecycle state.
///
/// `Uninitialized → Loading → {Authenticated, Unauthenticated}`; afterwards
/// the session moves between the last two on every provider event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Loading,
    /// Signed in with resolved claims. The identity may still be unscoped.
    Authenticated(Identity),
    Unauthenticated,
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// True once the first provider event has been handled.
    pub fn is_settled(&self) -> bool {
        matches!(self, SessionState::Authenticated(_) | SessionState::Unauthenticated)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Loading => "loading",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::Unauthenticated => "unauthenticated",
        }
    }
}
