pub mod identity;

pub use identity::{AuthError, Claims, IdentityProvider, JwtIdentityProvider, VerifiedIdentity};
