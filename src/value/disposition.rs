use std::hash::{Hash, Hasher};

use crate::convert::{Converter, ExtValue, ExtValueConverter, ParameterType, TextConverter};
use crate::error::GrammarError;
use crate::name::Name;
use crate::param::{ParameterName, ParameterSet, Parameters};
use crate::parser::{Cursor, FieldValue, field_value, grammar, parse_parameters};

/// `filename` parameter.
pub static FILENAME: ParameterName<String> = ParameterName::new("filename", &TextConverter);

/// `filename*` parameter.
pub static FILENAME_EXT: ParameterName<ExtValue> =
    ParameterName::new("filename*", &ExtValueConverter);

/// `name` parameter, the form field of `form-data`.
pub static NAME: ParameterName<String> = ParameterName::new("name", &TextConverter);

static PARAMS: ParameterSet = ParameterSet::with_extension(&[&FILENAME, &FILENAME_EXT, &NAME]);

/// Content-Disposition filename, plain or RFC 8187 encoded.
///
/// ```not_rust
/// plain   = token / quoted-string
/// encoded = charset "'" [ language ] "'" value-chars
/// ```
///
/// The forms are told apart by the `'` delimited charset prefix. Equality and hash are on the
/// decoded filename, so `"a.txt"` equals `UTF-8''a.txt`.
#[derive(Clone, Debug)]
pub struct Filename {
    repr: Repr,
}

#[derive(Clone, Debug)]
enum Repr {
    /// contains no control characters
    Plain(String),
    Encoded(ExtValue),
}

impl Filename {
    /// Create plain filename.
    ///
    /// # Errors
    ///
    /// Returns error if `name` contains control characters.
    pub fn plain(name: &str) -> Result<Self, GrammarError> {
        grammar::validate_text(Self::KIND, name)?;
        Ok(Self::from_repr(Repr::Plain(name.to_owned())))
    }

    /// Create UTF-8 encoded filename.
    pub fn utf8(name: &str) -> Self {
        Self::encoded(ExtValue::utf8(name))
    }

    /// Create encoded filename in the charset and language of `ext`.
    pub fn encoded(ext: ExtValue) -> Self {
        Self::from_repr(Repr::Encoded(ext))
    }

    const fn from_repr(repr: Repr) -> Self {
        Self { repr }
    }

    /// Returns the decoded filename.
    pub fn name(&self) -> &str {
        match &self.repr {
            Repr::Plain(name) => name,
            Repr::Encoded(ext) => ext.value(),
        }
    }

    /// Returns `true` if the filename is RFC 8187 encoded.
    #[inline]
    pub fn is_encoded(&self) -> bool {
        matches!(self.repr, Repr::Encoded(_))
    }
}

impl PartialEq for Filename {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Filename {}

impl Hash for Filename {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

/// A token with two or more `'` is the encoded form.
fn is_encoded(token: &str) -> bool {
    token.bytes().filter(|b| *b == b'\'').count() >= 2
}

impl FieldValue for Filename {
    const KIND: &'static str = "filename";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        if cursor.peek() == Some('"') {
            return Ok(Self::from_repr(Repr::Plain(grammar::quoted_string(cursor)?)));
        }
        let mark = cursor.mark();
        let token = grammar::token(cursor)?;
        if is_encoded(token) {
            let ext = ExtValueConverter.parse(token).map_err(|err| cursor.rebase(mark, err))?;
            Ok(Self::encoded(ext))
        } else {
            Ok(Self::from_repr(Repr::Plain(token.to_owned())))
        }
    }

    fn write_to(&self, out: &mut String) {
        match &self.repr {
            Repr::Plain(name) if !is_encoded(name) => grammar::write_token_or_quoted(out, name),
            Repr::Plain(name) => grammar::write_quoted(out, name),
            Repr::Encoded(ext) => ExtValueConverter.format(ext, out),
        }
    }
}

field_value!(Filename);

/// Content-Disposition value, e.g. `attachment; filename="report.pdf"`.
///
/// ```not_rust
/// content-disposition = disposition-type *( OWS ";" OWS disposition-parm )
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentDisposition {
    disposition: Name,
    params: Parameters,
}

impl ContentDisposition {
    /// Create disposition of `disposition` type, without parameters.
    ///
    /// # Errors
    ///
    /// Returns error if `disposition` is not a token.
    pub fn new(disposition: &str) -> Result<Self, GrammarError> {
        Ok(Self {
            disposition: Name::new(disposition)?,
            params: Parameters::new(),
        })
    }

    /// `inline`
    pub fn inline() -> Self {
        Self {
            disposition: Name::from_static("inline"),
            params: Parameters::new(),
        }
    }

    /// `attachment`
    pub fn attachment() -> Self {
        Self {
            disposition: Name::from_static("attachment"),
            params: Parameters::new(),
        }
    }

    /// Returns the disposition type.
    #[inline]
    pub fn disposition(&self) -> &str {
        self.disposition.as_str()
    }

    /// Returns `true` for the `inline` type.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.disposition == "inline"
    }

    /// Returns `true` for the `attachment` type.
    #[inline]
    pub fn is_attachment(&self) -> bool {
        self.disposition == "attachment"
    }

    /// Returns the parameters.
    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Returns the filename, `filename*` is preferred over `filename`.
    pub fn filename(&self) -> Option<Filename> {
        if let Some(ext) = self.params.get(&FILENAME_EXT) {
            return Some(Filename::encoded(ext.clone()));
        }
        let name = self.params.get(&FILENAME)?;
        Some(Filename::from_repr(Repr::Plain(name.clone())))
    }

    /// Returns the `name` parameter.
    pub fn name(&self) -> Option<&str> {
        self.params.get(&NAME).map(String::as_str)
    }

    /// Returns this disposition with a filename.
    ///
    /// A plain filename sets `filename` and drops `filename*`. An encoded filename sets
    /// `filename*` and keeps `filename` as the fallback for recipients without RFC 8187
    /// support.
    pub fn with_filename(&self, filename: Filename) -> Self {
        let params = match filename.repr {
            Repr::Plain(name) => self
                .params
                .without(FILENAME_EXT.name().as_str())
                .with_value(FILENAME.name().clone(), name.into_value()),
            Repr::Encoded(ext) => {
                self.params.with_value(FILENAME_EXT.name().clone(), ext.into_value())
            }
        };
        Self { disposition: self.disposition.clone(), params }
    }

    /// Returns this disposition with `name` parameter.
    ///
    /// # Errors
    ///
    /// Returns error if `name` contains control characters.
    pub fn with_name(&self, name: &str) -> Result<Self, GrammarError> {
        Ok(Self {
            disposition: self.disposition.clone(),
            params: self.params.with(&NAME, name.to_owned())?,
        })
    }
}

impl FieldValue for ContentDisposition {
    const KIND: &'static str = "content disposition";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        let disposition = grammar::token(cursor)?;
        let params = parse_parameters(cursor, &PARAMS)?;
        Ok(Self { disposition: Name::copy_from(disposition), params })
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(self.disposition());
        self.params.write_spaced(out);
    }
}

field_value!(ContentDisposition);
