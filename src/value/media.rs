use super::{Q, Weighted};
use crate::convert::{Charset, CharsetConverter, Converter, ParameterType, Quality};
use crate::error::{GrammarError, Reason};
use crate::name::Name;
use crate::param::{ParameterName, ParameterSet, Parameters};
use crate::parser::{Cursor, FieldValue, field_value, grammar, parse_parameters, parse_value};

/// `charset` parameter.
pub static CHARSET: ParameterName<Charset> = ParameterName::new("charset", &CharsetConverter);

static PARAMS: ParameterSet = ParameterSet::with_extension(&[&Q, &CHARSET]);

/// Media range, e.g. `text/html;charset=utf-8` or `image/*;q=0.8`.
///
/// ```not_rust
/// media-range = ( "*/*" / ( type "/" "*" ) / ( type "/" subtype ) ) parameters
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaRange {
    ty: Name,
    subtype: Name,
    params: Parameters,
}

impl MediaRange {
    /// Create media range without parameters.
    ///
    /// # Errors
    ///
    /// Returns error if `ty` or `subtype` is not a token, or on `*/subtype`.
    pub fn new(ty: &str, subtype: &str) -> Result<Self, GrammarError> {
        let ty = Name::new(ty)?;
        let subtype = Name::new(subtype)?;
        if ty == "*" && subtype != "*" {
            let found = subtype.as_str().chars().next();
            return Err(GrammarError::new(Self::KIND, Reason::Unexpected, found, 2));
        }
        Ok(Self { ty, subtype, params: Parameters::new() })
    }

    /// Returns the top-level type.
    #[inline]
    pub fn ty(&self) -> &str {
        self.ty.as_str()
    }

    /// Returns the subtype.
    #[inline]
    pub fn subtype(&self) -> &str {
        self.subtype.as_str()
    }

    /// Returns the parameters.
    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Returns the quality factor, `1` if absent.
    pub fn quality(&self) -> Quality {
        self.params.get(&Q).copied().unwrap_or_default()
    }

    /// Returns the `charset` parameter.
    pub fn charset(&self) -> Option<&Charset> {
        self.params.get(&CHARSET)
    }

    /// Returns this range with quality factor `q`.
    pub fn with_quality(&self, q: Quality) -> Self {
        self.with(&Q, q)
    }

    /// Returns this range with `charset` parameter.
    pub fn with_charset(&self, charset: Charset) -> Self {
        self.with(&CHARSET, charset)
    }

    fn with<T: ParameterType>(&self, name: &ParameterName<T>, value: T) -> Self {
        Self {
            ty: self.ty.clone(),
            subtype: self.subtype.clone(),
            params: self.params.with_value(name.name().clone(), value.into_value()),
        }
    }

    /// Returns `true` if this range covers the media type `ty/subtype`.
    pub fn matches(&self, ty: &str, subtype: &str) -> bool {
        (self.ty == "*" || self.ty == ty) && (self.subtype == "*" || self.subtype == subtype)
    }
}

impl Weighted for MediaRange {
    #[inline]
    fn quality(&self) -> Quality {
        MediaRange::quality(self)
    }
}

impl FieldValue for MediaRange {
    const KIND: &'static str = "media range";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        let ty = grammar::token(cursor)?;
        cursor.expect('/')?;
        let subtype_mark = cursor.mark();
        let subtype = grammar::token(cursor)?;
        if ty == "*" && subtype != "*" {
            return Err(cursor.error_at(subtype_mark, Reason::Unexpected));
        }
        let params = parse_parameters(cursor, &PARAMS)?;
        Ok(Self {
            ty: Name::copy_from(ty),
            subtype: Name::copy_from(subtype),
            params,
        })
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(self.ty());
        out.push('/');
        out.push_str(self.subtype());
        self.params.write_to(out);
    }
}

field_value!(MediaRange, list);

/// Media range as a parameter value, always quoted, as in the `type` parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct MediaRangeConverter;

impl Converter for MediaRangeConverter {
    type Value = MediaRange;

    fn kind(&self) -> &'static str {
        MediaRange::KIND
    }

    fn parse(&self, text: &str) -> Result<MediaRange, GrammarError> {
        let mut cursor = Cursor::new(self.kind(), text);
        let content_mark = cursor.mark();
        let content = grammar::quoted_string(&mut cursor)?;
        cursor.expect_end()?;
        // positions inside are off by the escapes before them
        parse_value(&content).map_err(|err| err.rebase(self.kind(), content_mark.position() + 1))
    }

    fn format(&self, value: &MediaRange, out: &mut String) {
        grammar::write_quoted(out, &value.format());
    }
}
