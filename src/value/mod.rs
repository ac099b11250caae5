//! Header value types.
//!
//! Each type parses a header value with `parse`, formats it back with `format`, and
//! round-trips, `T::parse(&v.format()) == Ok(v)`. [`HeaderValue`] closes the set of
//! grammars into one sum type.
mod cache;
mod cookie;
mod disposition;
mod etag;
pub(crate) mod language;
mod link;
mod media;
mod token;

pub use cache::{Argument, CacheDirective};
pub use cookie::Cookie;
pub use disposition::{ContentDisposition, FILENAME, FILENAME_EXT, Filename, NAME};
pub use etag::{EntityTag, Validator};
pub use language::{LanguageTag, LanguageTagConverter};
pub use link::{
    ANCHOR, HREFLANG, Link, LinkRelation, MEDIA, REL, REV, RelationsConverter, TITLE, TITLE_EXT,
    TYPE,
};
pub use media::{CHARSET, MediaRange, MediaRangeConverter};
pub use token::Token;

use crate::convert::{Quality, QualityConverter};
use crate::error::GrammarError;
use crate::param::ParameterName;
use crate::parser::FieldValue;

/// `q` parameter, the quality factor of weighted lists.
pub static Q: ParameterName<Quality> = ParameterName::new("q", &QualityConverter);

/// A value ranked by its quality factor.
pub trait Weighted {
    /// Returns the quality factor, `1` if absent.
    fn quality(&self) -> Quality;
}

/// Sort by descending quality factor, equal factors keep their order.
///
/// ```
/// use headval::value::{LanguageTag, sort_by_quality};
///
/// let mut tags = LanguageTag::parse_list("en;q=0.5, fr;q=0.9, de;q=0.9").unwrap();
/// sort_by_quality(&mut tags);
/// assert_eq!(LanguageTag::format_list(&tags), "fr;q=0.9, de;q=0.9, en;q=0.5");
/// ```
pub fn sort_by_quality<T: Weighted>(values: &mut [T]) {
    values.sort_by(|a, b| b.quality().cmp(&a.quality()));
}

/// Grammar of a [`HeaderValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Directive,
    EntityTag,
    LanguageTag,
    LinkRelation,
    Cookie,
    Filename,
    Token,
}

impl ValueKind {
    /// Returns the kind reported in [`GrammarError`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Directive => CacheDirective::KIND,
            Self::EntityTag => EntityTag::KIND,
            Self::LanguageTag => LanguageTag::KIND,
            Self::LinkRelation => LinkRelation::KIND,
            Self::Cookie => Cookie::KIND,
            Self::Filename => Filename::KIND,
            Self::Token => Token::KIND,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed header value of any grammar.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeaderValue {
    Directive(CacheDirective),
    EntityTag(EntityTag),
    LanguageTag(LanguageTag),
    LinkRelation(LinkRelation),
    Cookie(Cookie),
    Filename(Filename),
    Token(Token),
}

impl HeaderValue {
    /// Parse `text` with the grammar of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError`] if `text` violates the grammar.
    pub fn parse(kind: ValueKind, text: &str) -> Result<Self, GrammarError> {
        Ok(match kind {
            ValueKind::Directive => Self::Directive(CacheDirective::parse(text)?),
            ValueKind::EntityTag => Self::EntityTag(EntityTag::parse(text)?),
            ValueKind::LanguageTag => Self::LanguageTag(LanguageTag::parse(text)?),
            ValueKind::LinkRelation => Self::LinkRelation(LinkRelation::parse(text)?),
            ValueKind::Cookie => Self::Cookie(Cookie::parse(text)?),
            ValueKind::Filename => Self::Filename(Filename::parse(text)?),
            ValueKind::Token => Self::Token(Token::parse(text)?),
        })
    }

    /// Returns the grammar of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Directive(_) => ValueKind::Directive,
            Self::EntityTag(_) => ValueKind::EntityTag,
            Self::LanguageTag(_) => ValueKind::LanguageTag,
            Self::LinkRelation(_) => ValueKind::LinkRelation,
            Self::Cookie(_) => ValueKind::Cookie,
            Self::Filename(_) => ValueKind::Filename,
            Self::Token(_) => ValueKind::Token,
        }
    }

    /// Format to canonical header value text.
    pub fn format(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Directive(v) => v.write_to(out),
            Self::EntityTag(v) => v.write_to(out),
            Self::LanguageTag(v) => v.write_to(out),
            Self::LinkRelation(v) => v.write_to(out),
            Self::Cookie(v) => v.write_to(out),
            Self::Filename(v) => v.write_to(out),
            Self::Token(v) => v.write_to(out),
        }
    }
}

impl std::fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

// ===== From =====

macro_rules! from_variant {
    ($($variant:ident($ty:ty),)*) => {
        $(
            impl From<$ty> for HeaderValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

from_variant! {
    Directive(CacheDirective),
    EntityTag(EntityTag),
    LanguageTag(LanguageTag),
    LinkRelation(LinkRelation),
    Cookie(Cookie),
    Filename(Filename),
    Token(Token),
}
