// Public API - what other modules can use
pub use generators::{DisplayNameGenerator, ViewerNameGenerator, MAX_DISPLAY_NAME_LEN};
pub use handlers::{current_user, sign_in, sign_out};
pub use models::{IdentityClaims, Principal, SignInMethod, ANONYMOUS_PROVIDER};
pub use service::{IdentityProvider, LocalIdentityProvider, SignedIn};
pub use token::TokenConfig;

// Internal modules
mod generators;
mod handlers;
mod models;
mod service;
mod token;
pub mod types;
