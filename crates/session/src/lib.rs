//! `planboard-session` — session lifecycle over an external identity provider.
//!
//! The session observes provider sign-in state, resolves claims into an
//! [`Identity`](planboard_auth::Identity) and publishes a [`SessionState`].

pub mod context;
pub mod error;
pub mod in_memory;
pub mod provider;
pub mod state;

pub use context::SessionContext;
pub use error::SessionError;
pub use in_memory::InMemoryIdentityProvider;
pub use provider::{IdentityAdmin, IdentityProvider, RawIdentity, UserRecord};
pub use state::SessionState;
