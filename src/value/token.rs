use crate::convert::{Converter, TextConverter};
use crate::error::GrammarError;
use crate::param::{ParameterSet, Parameters};
use crate::parser::{Cursor, FieldValue, field_value, grammar, parse_parameters};

static PARAMS: ParameterSet = ParameterSet::with_extension(&[]);

/// Quoted or unquoted text with parameters, e.g. `gzip` or `"a, b"; level=9`.
///
/// ```not_rust
/// token-value = ( token / quoted-string ) *( OWS ";" OWS parameter )
/// ```
///
/// Both spellings decode to the same text, the quoting is not remembered. Text compares
/// exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    text: String,
    params: Parameters,
}

impl Token {
    /// Create token without parameters.
    ///
    /// # Errors
    ///
    /// Returns error if `text` contains control characters.
    pub fn new(text: &str) -> Result<Self, GrammarError> {
        grammar::validate_text(Self::KIND, text)?;
        Ok(Self { text: text.to_owned(), params: Parameters::new() })
    }

    /// Returns the decoded text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the parameters.
    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Returns this token with text parameter `name` set to `value`.
    ///
    /// # Errors
    ///
    /// Returns error if `name` is not a token or `value` contains control characters.
    pub fn with_param(&self, name: &str, value: &str) -> Result<Self, GrammarError> {
        Ok(Self {
            text: self.text.clone(),
            params: self.params.with_text(name, value)?,
        })
    }
}

impl FieldValue for Token {
    const KIND: &'static str = "token";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        let text = if cursor.peek() == Some('"') {
            grammar::quoted_string(cursor)?
        } else {
            grammar::token(cursor)?.to_owned()
        };
        let params = parse_parameters(cursor, &PARAMS)?;
        Ok(Self { text, params })
    }

    fn write_to(&self, out: &mut String) {
        TextConverter.format(&self.text, out);
        self.params.write_to(out);
    }
}

field_value!(Token, list);
