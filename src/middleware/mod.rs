pub mod auth;
pub mod propagation;

pub use auth::{require_authentication, AuthUser};
pub use propagation::{bearer_credential, propagate_credentials};
