//! Typed Header Values
//!
//! Parses structured header field values into immutable typed values, and formats them back
//! to canonical wire text.
//!
//! ```
//! use headval::value::{CacheDirective, EntityTag};
//!
//! let directive = CacheDirective::parse("max-age=3600").unwrap();
//! assert_eq!(directive.delta_seconds(), Some(3600));
//!
//! let err = EntityTag::parse("\"abc").unwrap_err();
//! assert_eq!(err.position(), 4);
//! ```
#![warn(missing_debug_implementations)]

mod log;
mod matches;

mod error;
mod name;
mod param;

pub mod parser;
pub mod convert;
pub mod value;
pub mod field;

pub use error::{GrammarError, Reason};
pub use name::{Case, CookieName, HeaderName, Insensitive, Name, Sensitive};
pub use param::{ParameterDef, ParameterName, ParameterSet, Parameters};
pub use convert::{Converter, ParameterValue};
pub use value::{HeaderValue, ValueKind};
pub use field::HeaderField;

/// Maximum length in bytes of a header value.
///
/// Longer input is rejected with [`Reason::TooLong`] before it is scanned.
pub const MAX_VALUE_LEN: usize = 1 << 13;
