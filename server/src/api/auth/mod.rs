//! Authentication module
//!
//! Google sign-in issues an HS256 session cookie; `require_auth` turns the
//! cookie into an `AuthContext` for handlers.

mod context;
mod extractors;
pub mod jwt;
mod manager;
pub mod middleware;

pub use context::AuthContext;
pub use extractors::{Auth, AuthRejection};
pub use jwt::SessionClaims;
pub use manager::AuthManager;
pub use middleware::{AuthError, AuthState, require_auth};
