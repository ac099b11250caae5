//! Header name to converter bindings.
//!
//! A message model stores raw header text under a [`HeaderName`], a [`HeaderField`] tells it
//! how to turn that text into a typed value and back.
use std::marker::PhantomData;

use crate::convert::Converter;
use crate::error::GrammarError;
use crate::name::HeaderName;
use crate::parser::{self, FieldValue};
use crate::value::Cookie;

/// A header name bound to the converter of its whole field value.
///
/// ```
/// use headval::field::standard;
///
/// let tags = standard::IF_NONE_MATCH.parse("W/\"a\", \"b\"").unwrap();
/// assert_eq!(tags.len(), 2);
/// assert_eq!(standard::IF_NONE_MATCH.name(), "If-None-Match");
/// ```
pub struct HeaderField<T: 'static> {
    name: HeaderName,
    converter: &'static dyn Converter<Value = T>,
}

impl<T: 'static> HeaderField<T> {
    /// Bind `name` to `converter`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid token.
    pub const fn new(name: &'static str, converter: &'static dyn Converter<Value = T>) -> Self {
        Self { name: HeaderName::from_static(name), converter }
    }

    /// Returns the header name.
    #[inline]
    pub const fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Returns the converter of the field value.
    #[inline]
    pub fn converter(&self) -> &'static dyn Converter<Value = T> {
        self.converter
    }

    /// Parse the field value.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError`] if `text` violates the field grammar.
    #[inline]
    pub fn parse(&self, text: &str) -> Result<T, GrammarError> {
        self.converter.parse(text)
    }

    /// Format the field value.
    #[inline]
    pub fn format(&self, value: &T) -> String {
        self.converter.to_text(value)
    }
}

impl<T: 'static> std::fmt::Debug for HeaderField<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderField")
            .field("name", &self.name)
            .field("kind", &self.converter.kind())
            .finish()
    }
}

// ===== Converters =====

/// Field carrying exactly one `T`.
pub struct One<T>(PhantomData<fn() -> T>);

/// Field carrying a comma separated list of `T`.
pub struct List<T>(PhantomData<fn() -> T>);

macro_rules! marker {
    ($($name:ident),*) => {
        $(
            impl<T> $name<T> {
                /// Create the converter.
                #[inline]
                pub const fn new() -> Self {
                    Self(PhantomData)
                }
            }

            impl<T> Default for $name<T> {
                #[inline]
                fn default() -> Self {
                    Self::new()
                }
            }

            impl<T> Clone for $name<T> {
                #[inline]
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<T> Copy for $name<T> { }

            impl<T> std::fmt::Debug for $name<T> {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(stringify!($name))
                }
            }
        )*
    };
}

marker!(One, List);

impl<T: FieldValue> Converter for One<T> {
    type Value = T;

    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn parse(&self, text: &str) -> Result<T, GrammarError> {
        parser::parse_value(text)
    }

    fn format(&self, value: &T, out: &mut String) {
        value.write_to(out);
    }
}

impl<T: FieldValue> Converter for List<T> {
    type Value = Vec<T>;

    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn parse(&self, text: &str) -> Result<Vec<T>, GrammarError> {
        parser::parse_list(text)
    }

    fn format(&self, values: &Vec<T>, out: &mut String) {
        out.push_str(&parser::format_list(values));
    }
}

/// The `Cookie` field, pairs separated by `;`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CookieList;

impl CookieList {
    /// Create the converter.
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl Converter for CookieList {
    type Value = Vec<Cookie>;

    fn kind(&self) -> &'static str {
        Cookie::KIND
    }

    fn parse(&self, text: &str) -> Result<Vec<Cookie>, GrammarError> {
        Cookie::parse_list(text)
    }

    fn format(&self, cookies: &Vec<Cookie>, out: &mut String) {
        out.push_str(&Cookie::format_list(cookies));
    }
}

// ===== Standard =====

macro_rules! standard_field {
    (@CORE
        $(
            $(#[$doc:meta])*
            $vis:vis static $id:ident: $t:ty = $name:literal, $conv:ty;
        )*
    ) => {
        $(
            $(#[$doc])*
            $vis static $id: HeaderField<$t> = {
                static CONVERTER: $conv = <$conv>::new();
                HeaderField::new($name, &CONVERTER)
            };
        )*
    };

    (
        $(#[$mod_doc:meta])*
        mod $mod_name:ident;

        $($tt:tt)*
    ) => {
        $(#[$mod_doc])*
        pub mod $mod_name {
            use super::*;
            use crate::value::{CacheDirective, ContentDisposition, EntityTag, LanguageTag, Link, MediaRange};
            standard_field!(@CORE $($tt)*);
        }
    };
}

standard_field! {
    /// Bindings of the standard header fields with a value grammar in this crate.
    mod standard;

    /// `Cache-Control`, [RFC 9111 §5.2](https://www.rfc-editor.org/rfc/rfc9111#section-5.2).
    pub static CACHE_CONTROL: Vec<CacheDirective> = "Cache-Control", List<CacheDirective>;
    /// `ETag`, [RFC 9110 §8.8.3](https://www.rfc-editor.org/rfc/rfc9110#section-8.8.3).
    pub static ETAG: EntityTag = "ETag", One<EntityTag>;
    /// `If-Match`, `*` or a list of entity tags.
    pub static IF_MATCH: Vec<EntityTag> = "If-Match", List<EntityTag>;
    /// `If-None-Match`, `*` or a list of entity tags.
    pub static IF_NONE_MATCH: Vec<EntityTag> = "If-None-Match", List<EntityTag>;
    /// `Accept`, weighted media ranges.
    pub static ACCEPT: Vec<MediaRange> = "Accept", List<MediaRange>;
    /// `Accept-Language`, weighted language ranges.
    pub static ACCEPT_LANGUAGE: Vec<LanguageTag> = "Accept-Language", List<LanguageTag>;
    /// `Content-Language`, the languages of the intended audience.
    pub static CONTENT_LANGUAGE: Vec<LanguageTag> = "Content-Language", List<LanguageTag>;
    /// `Content-Disposition`, [RFC 6266](https://www.rfc-editor.org/rfc/rfc6266).
    pub static CONTENT_DISPOSITION: ContentDisposition = "Content-Disposition", One<ContentDisposition>;
    /// `Cookie`, [RFC 6265 §5.4](https://www.rfc-editor.org/rfc/rfc6265#section-5.4).
    pub static COOKIE: Vec<Cookie> = "Cookie", CookieList;
    /// `Link`, [RFC 8288](https://www.rfc-editor.org/rfc/rfc8288).
    pub static LINK: Vec<Link> = "Link", List<Link>;
}
