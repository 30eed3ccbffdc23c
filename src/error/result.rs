//! Result alias for library operations.

use super::dj_error::DjError;

/// Type alias for Results using [`DjError`].
///
/// ```ignore
/// use mrdj::error::DjResult;
///
/// fn parse_theme(raw: &str) -> DjResult<ThemePreference> {
///     raw.parse()
/// }
/// ```
pub type DjResult<T> = Result<T, DjError>;
