//! Header value parsing engine.
//!
//! A value grammar implements [`FieldValue`] by driving a [`Cursor`] through the primitives in
//! [`grammar`] and, after its primary value, the parameter-list parser [`parse_parameters`].
mod cursor;
pub mod grammar;
mod params;

pub use cursor::{Cursor, Mark};
pub use params::parse_parameters;

use crate::MAX_VALUE_LEN;
use crate::error::{GrammarError, Reason};
use crate::log::debug;

/// A header value grammar.
///
/// `parse_from` starts at the first character of the value, leading whitespace already
/// skipped, and must stop at the first character that does not belong to the value, which is
/// the end of text, whitespace, or a list separator.
pub trait FieldValue: Sized {
    /// Kind of value reported in [`GrammarError`].
    const KIND: &'static str;

    /// Parse one value at the cursor.
    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError>;

    /// Write the canonical text of this value.
    fn write_to(&self, out: &mut String);
}

/// Parse a whole header value as a single `T`.
pub fn parse_value<T: FieldValue>(text: &str) -> Result<T, GrammarError> {
    fn parse<T: FieldValue>(text: &str) -> Result<T, GrammarError> {
        let mut cursor = start(T::KIND, text)?;
        let value = T::parse_from(&mut cursor)?;
        cursor.finish()?;
        Ok(value)
    }

    let result = parse(text);
    if let Err(_err) = &result {
        debug!("rejected {:?}: {_err}", text);
    }
    result
}

/// Parse a comma separated list of `T`.
///
/// Empty list elements are skipped, a list without any element is an [`Reason::Empty`] error.
pub fn parse_list<T: FieldValue>(text: &str) -> Result<Vec<T>, GrammarError> {
    fn parse<T: FieldValue>(text: &str) -> Result<Vec<T>, GrammarError> {
        let mut cursor = start(T::KIND, text)?;
        let mut items = Vec::new();
        loop {
            cursor.skip_whitespace();
            if cursor.eat(',') {
                continue;
            }
            if cursor.is_end() {
                break;
            }
            items.push(T::parse_from(&mut cursor)?);
            cursor.skip_whitespace();
            if cursor.is_end() {
                break;
            }
            cursor.expect(',')?;
        }
        if items.is_empty() {
            return Err(cursor.error(Reason::Empty));
        }
        Ok(items)
    }

    let result = parse(text);
    if let Err(_err) = &result {
        debug!("rejected list {:?}: {_err}", text);
    }
    result
}

/// Format a value to its canonical text.
pub fn format_value<T: FieldValue>(value: &T) -> String {
    let mut out = String::new();
    value.write_to(&mut out);
    out
}

/// Format values as a comma separated list.
pub fn format_list<T: FieldValue>(values: &[T]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        value.write_to(&mut out);
    }
    out
}

/// Cursor over a whole header value, after the length check and leading whitespace.
pub(crate) fn start<'a>(kind: &'static str, text: &'a str) -> Result<Cursor<'a>, GrammarError> {
    if text.len() > MAX_VALUE_LEN {
        let (position, found) = text
            .char_indices()
            .enumerate()
            .find(|(_, (offset, _))| *offset >= MAX_VALUE_LEN)
            .map(|(position, (_, ch))| (position, Some(ch)))
            .unwrap_or((text.chars().count(), None));
        return Err(GrammarError::new(kind, Reason::TooLong, found, position));
    }
    let mut cursor = Cursor::new(kind, text);
    cursor.skip_whitespace();
    Ok(cursor)
}

/// Implements `parse`, `format`, [`FromStr`][std::str::FromStr] and [`Display`][std::fmt::Display]
/// for a [`FieldValue`].
macro_rules! field_value {
    ($ty:ty, list) => {
        $crate::parser::field_value!($ty);

        impl $ty {
            /// Parse a comma separated list of header values.
            ///
            /// # Errors
            ///
            /// Returns [`GrammarError`][crate::GrammarError] if any element violates the
            /// grammar, or if the list has no element.
            #[inline]
            pub fn parse_list(text: &str) -> Result<Vec<Self>, $crate::GrammarError> {
                $crate::parser::parse_list(text)
            }

            /// Format values as a comma separated list.
            #[inline]
            pub fn format_list(values: &[Self]) -> String {
                $crate::parser::format_list(values)
            }
        }
    };
    ($ty:ty) => {
        impl $ty {
            /// Parse a header value.
            ///
            /// # Errors
            ///
            /// Returns [`GrammarError`][crate::GrammarError] if `text` violates the grammar.
            #[inline]
            pub fn parse(text: &str) -> Result<Self, $crate::GrammarError> {
                $crate::parser::parse_value(text)
            }

            /// Format to canonical header value text.
            #[inline]
            pub fn format(&self) -> String {
                $crate::parser::format_value(self)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::GrammarError;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl std::fmt::Display for $ty {
            #[inline]
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.format())
            }
        }
    };
}

pub(crate) use field_value;
