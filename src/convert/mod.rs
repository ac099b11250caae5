//! Bidirectional text and typed value converters.
//!
//! A [`Converter`] turns the raw wire text of one value into a typed value and back. Every
//! converter is a stateless unit struct, so one `'static` instance serves every parse.
//!
//! Converters see the raw extent of the value as it appears on the wire, quotes included, so
//! each converter decides which quoting it accepts and which it writes. For every value `v` a
//! converter can produce, `parse(format(v)) == v`.
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use crate::error::{GrammarError, Reason};
use crate::parser::grammar;
use crate::value::{LanguageTag, LinkRelation, MediaRange};

mod number;
mod text;
mod ext;

pub use number::{FloatConverter, IntegerConverter, Quality, QualityConverter};
pub use text::{Charset, CharsetConverter, TextConverter};
pub use ext::{ExtValue, ExtValueConverter};
pub use crate::value::{LanguageTagConverter, MediaRangeConverter, RelationsConverter};

/// Text and typed value conversion of one value kind.
pub trait Converter: Send + Sync {
    /// The typed value.
    type Value;

    /// Kind of value reported in [`GrammarError`].
    fn kind(&self) -> &'static str;

    /// Parse the raw wire text of a value.
    ///
    /// Error positions are relative to the start of `text`.
    fn parse(&self, text: &str) -> Result<Self::Value, GrammarError>;

    /// Write the wire text of a value.
    fn format(&self, value: &Self::Value, out: &mut String);

    /// Returns the wire text of a value.
    fn to_text(&self, value: &Self::Value) -> String {
        let mut out = String::new();
        self.format(value, &mut out);
        out
    }
}

/// A converted parameter value, one variant per converter.
#[derive(Clone, Debug)]
pub enum ParameterValue {
    Integer(u64),
    Float(f64),
    Quality(Quality),
    Text(String),
    Charset(Charset),
    Ext(ExtValue),
    Media(MediaRange),
    Language(LanguageTag),
    Relations(Vec<LinkRelation>),
}

impl ParameterValue {
    /// Write the wire text of this value, through the converter of its variant.
    pub fn format(&self, out: &mut String) {
        match self {
            Self::Integer(value) => IntegerConverter.format(value, out),
            Self::Float(value) => FloatConverter.format(value, out),
            Self::Quality(value) => QualityConverter.format(value, out),
            Self::Text(value) => TextConverter.format(value, out),
            Self::Charset(value) => CharsetConverter.format(value, out),
            Self::Ext(value) => ExtValueConverter.format(value, out),
            Self::Media(value) => MediaRangeConverter.format(value, out),
            Self::Language(value) => LanguageTagConverter.format(value, out),
            Self::Relations(value) => RelationsConverter.format(value, out),
        }
    }
}

impl PartialEq for ParameterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Quality(a), Self::Quality(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Charset(a), Self::Charset(b)) => a == b,
            (Self::Ext(a), Self::Ext(b)) => a == b,
            (Self::Media(a), Self::Media(b)) => a == b,
            (Self::Language(a), Self::Language(b)) => a == b,
            (Self::Relations(a), Self::Relations(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ParameterValue {}

impl Hash for ParameterValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            Self::Integer(value) => value.hash(state),
            Self::Float(value) => value.to_bits().hash(state),
            Self::Quality(value) => value.hash(state),
            Self::Text(value) => value.hash(state),
            Self::Charset(value) => value.hash(state),
            Self::Ext(value) => value.hash(state),
            Self::Media(value) => value.hash(state),
            Self::Language(value) => value.hash(state),
            Self::Relations(value) => value.hash(state),
        }
    }
}

/// A type that can be stored as a [`ParameterValue`].
pub trait ParameterType: Sized + Send + Sync + 'static {
    /// Wrap into the matching variant.
    fn into_value(self) -> ParameterValue;

    /// Borrow from the matching variant.
    fn from_value(value: &ParameterValue) -> Option<&Self>;

    /// Check that a value built outside of a parse can be written and parsed back.
    fn validate(&self) -> Result<(), GrammarError> {
        Ok(())
    }
}

macro_rules! parameter_type {
    ($($ty:ty => $variant:ident;)*) => {$(
        impl ParameterType for $ty {
            #[inline]
            fn into_value(self) -> ParameterValue {
                ParameterValue::$variant(self)
            }

            #[inline]
            fn from_value(value: &ParameterValue) -> Option<&Self> {
                match value {
                    ParameterValue::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    )*};
}

parameter_type! {
    u64 => Integer;
    Quality => Quality;
    Charset => Charset;
    ExtValue => Ext;
    MediaRange => Media;
}

impl ParameterType for LanguageTag {
    #[inline]
    fn into_value(self) -> ParameterValue {
        ParameterValue::Language(self)
    }

    #[inline]
    fn from_value(value: &ParameterValue) -> Option<&Self> {
        match value {
            ParameterValue::Language(value) => Some(value),
            _ => None,
        }
    }

    /// A tag in parameter position is written without its own parameters.
    fn validate(&self) -> Result<(), GrammarError> {
        if self.params().is_empty() {
            Ok(())
        } else {
            let kind = LanguageTagConverter.kind();
            Err(GrammarError::new(kind, Reason::Unexpected, Some(';'), self.tag().len()))
        }
    }
}

impl ParameterType for f64 {
    #[inline]
    fn into_value(self) -> ParameterValue {
        ParameterValue::Float(self)
    }

    #[inline]
    fn from_value(value: &ParameterValue) -> Option<&Self> {
        match value {
            ParameterValue::Float(value) => Some(value),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), GrammarError> {
        if self.is_finite() && self.is_sign_positive() {
            Ok(())
        } else {
            Err(GrammarError::new(FloatConverter.kind(), Reason::OutOfRange, None, 0))
        }
    }
}

impl ParameterType for String {
    #[inline]
    fn into_value(self) -> ParameterValue {
        ParameterValue::Text(self)
    }

    #[inline]
    fn from_value(value: &ParameterValue) -> Option<&Self> {
        match value {
            ParameterValue::Text(value) => Some(value),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), GrammarError> {
        grammar::validate_text(TextConverter.kind(), self)
    }
}

impl ParameterType for Vec<LinkRelation> {
    #[inline]
    fn into_value(self) -> ParameterValue {
        ParameterValue::Relations(self)
    }

    #[inline]
    fn from_value(value: &ParameterValue) -> Option<&Self> {
        match value {
            ParameterValue::Relations(value) => Some(value),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), GrammarError> {
        if self.is_empty() {
            Err(GrammarError::new(RelationsConverter.kind(), Reason::Empty, None, 0))
        } else {
            Ok(())
        }
    }
}
