//! Session model, redacted token secrets, and auth endpoint payloads.

pub mod payload;
pub mod secret;
pub mod session;

pub use payload::*;
pub use secret::*;
pub use session::*;
