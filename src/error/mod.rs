//! Error handling for the Mr. DJ client.
//!
//! Four kinds of failure reach this layer:
//!
//! | Kind | Example | Handling |
//! |------|---------|----------|
//! | Malformed frame | truncated JSON | logged, stream continues |
//! | `error` event | backend reports a failure | terminal, server text shown |
//! | Transport failure | 401, 5xx, connection reset | terminal, [`FailureCause`] text shown |
//! | Secondary fetch | playlist refresh fails | logged, dropped |
//!
//! [`DjError`] unifies the errors returned from library calls and
//! [`ErrorCategory`] classifies them.

mod category;
mod dj_error;
mod network;
mod result;

pub use category::ErrorCategory;
pub use dj_error::DjError;
pub use network::{classify_http_error, classify_status, FailureCause};
pub use result::DjResult;
