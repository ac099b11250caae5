use super::Converter;
use crate::error::{GrammarError, Reason};
use crate::matches;
use crate::name::Name;
use crate::parser::{Cursor, grammar};

/// `token / quoted-string` as the decoded `String`.
///
/// Both forms of the same text convert to the same value. Formatting writes a token when
/// possible and a quoted string otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextConverter;

impl Converter for TextConverter {
    type Value = String;

    fn kind(&self) -> &'static str {
        "text"
    }

    fn parse(&self, text: &str) -> Result<String, GrammarError> {
        let mut cursor = Cursor::new(self.kind(), text);
        let value = if cursor.peek() == Some('"') {
            grammar::quoted_string(&mut cursor)?
        } else {
            grammar::token(&mut cursor)?.to_owned()
        };
        cursor.expect_end()?;
        Ok(value)
    }

    fn format(&self, value: &String, out: &mut String) {
        grammar::write_token_or_quoted(out, value);
    }
}

/// Character set name, compared case-insensitively.
///
/// ```not_rust
/// mime-charset = 1*mime-charsetc
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Charset(pub(crate) Name);

impl Charset {
    /// `UTF-8`
    pub const UTF_8: Self = Self(Name::from_static_unchecked("UTF-8"));

    /// `ISO-8859-1`
    pub const ISO_8859_1: Self = Self(Name::from_static_unchecked("ISO-8859-1"));

    /// Create charset from its name.
    ///
    /// # Errors
    ///
    /// Returns error if `name` is not a valid `mime-charset`.
    pub fn new(name: &str) -> Result<Self, GrammarError> {
        let mut cursor = Cursor::new(CharsetConverter.kind(), name);
        let name = scan_charset(&mut cursor)?;
        cursor.expect_end()?;
        Ok(Self(Name::copy_from(name)))
    }

    /// Returns the charset name as spelled.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Charset {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `mime-charset` as [`Charset`].
///
/// Names with `{` or `}`, which are not token characters, are written quoted.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharsetConverter;

impl Converter for CharsetConverter {
    type Value = Charset;

    fn kind(&self) -> &'static str {
        "charset"
    }

    fn parse(&self, text: &str) -> Result<Charset, GrammarError> {
        if !text.starts_with('"') {
            return Charset::new(text);
        }
        let mut cursor = Cursor::new(self.kind(), text);
        let name = grammar::quoted_string(&mut cursor)?;
        cursor.expect_end()?;
        // no escapes in a valid name, positions past the quote are exact
        Charset::new(&name).map_err(|err| err.rebase(self.kind(), 1))
    }

    fn format(&self, value: &Charset, out: &mut String) {
        grammar::write_token_or_quoted(out, value.as_str());
    }
}

/// 1*mime-charsetc
pub(crate) fn scan_charset<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, GrammarError> {
    let name = cursor.take_while(|ch| matches::ascii(ch, matches::is_charset));
    if name.is_empty() {
        return Err(cursor.error(Reason::Unexpected));
    }
    Ok(name)
}
