//! Auth-domain identifiers, client secrets, and bearer-token claims.

pub mod claims;
pub mod id;
pub mod secret;
pub mod token;

pub use claims::*;
pub use id::*;
pub use secret::*;
pub use token::*;
