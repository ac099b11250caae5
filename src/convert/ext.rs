use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};

use super::text::scan_charset;
use super::{Charset, Converter};
use crate::error::{GrammarError, Reason};
use crate::matches;
use crate::name::Name;
use crate::parser::Cursor;
use crate::value::language::scan_tag;

/// Everything except `attr-char` is percent encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// RFC 8187 extended parameter value, decoded.
///
/// ```not_rust
/// ext-value     = charset  "'" [ language ] "'" value-chars
/// value-chars   = *( pct-encoded / attr-char )
/// ```
///
/// Only `UTF-8` and `ISO-8859-1` are supported.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtValue {
    charset: Charset,
    language: Option<Name>,
    value: String,
}

impl ExtValue {
    /// Create ext-value in the given charset.
    ///
    /// # Errors
    ///
    /// Returns error if the charset is not supported, `value` cannot be encoded in it, or
    /// `language` is not a language tag.
    pub fn new(
        charset: Charset,
        language: Option<&str>,
        value: impl Into<String>,
    ) -> Result<Self, GrammarError> {
        let kind = ExtValueConverter.kind();
        let value = value.into();

        if charset == Charset::ISO_8859_1 {
            if let Some((position, ch)) = value.chars().enumerate().find(|(_, ch)| *ch > '\u{ff}') {
                return Err(GrammarError::new(kind, Reason::Undecodable, Some(ch), position));
            }
        } else if charset != Charset::UTF_8 {
            let found = charset.as_str().chars().next();
            return Err(GrammarError::new(kind, Reason::Undecodable, found, 0));
        }

        let language = match language {
            Some(language) => {
                let mut cursor = Cursor::new(kind, language);
                let tag = scan_tag(&mut cursor)?;
                cursor.expect_end()?;
                Some(Name::copy_from(tag))
            }
            None => None,
        };

        Ok(Self { charset, language, value })
    }

    /// Create UTF-8 ext-value without language.
    pub fn utf8(value: impl Into<String>) -> Self {
        Self {
            charset: Charset::UTF_8,
            language: None,
            value: value.into(),
        }
    }

    /// Returns the charset the value is encoded in.
    #[inline]
    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    /// Returns the language of the value, if any.
    #[inline]
    pub fn language(&self) -> Option<&str> {
        self.language.as_ref().map(Name::as_str)
    }

    /// Returns the decoded value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// RFC 8187 `ext-value` as [`ExtValue`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtValueConverter;

impl Converter for ExtValueConverter {
    type Value = ExtValue;

    fn kind(&self) -> &'static str {
        "ext-value"
    }

    fn parse(&self, text: &str) -> Result<ExtValue, GrammarError> {
        let mut cursor = Cursor::new(self.kind(), text);

        let charset_mark = cursor.mark();
        let charset = Charset(Name::copy_from(scan_charset(&mut cursor)?));
        cursor.expect('\'')?;
        let language = match cursor.peek() {
            Some('\'') => None,
            _ => Some(Name::copy_from(scan_tag(&mut cursor)?)),
        };
        cursor.expect('\'')?;

        let value_mark = cursor.mark();
        while let Some(ch) = cursor.peek() {
            if ch == '%' {
                cursor.bump();
                for _ in 0..2 {
                    match cursor.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => cursor.bump(),
                        _ => return Err(cursor.error(Reason::Unexpected)),
                    };
                }
            } else if matches::ascii(ch, matches::is_attr_char) {
                cursor.bump();
            } else {
                break;
            }
        }
        let encoded = cursor.since(value_mark);
        cursor.expect_end()?;

        let value = if charset == Charset::UTF_8 {
            percent_decode_str(encoded)
                .decode_utf8()
                .map_err(|_| cursor.error_at(value_mark, Reason::Undecodable))?
                .into_owned()
        } else if charset == Charset::ISO_8859_1 {
            percent_decode_str(encoded).map(char::from).collect()
        } else {
            return Err(cursor.error_at(charset_mark, Reason::Undecodable));
        };

        Ok(ExtValue { charset, language, value })
    }

    fn format(&self, value: &ExtValue, out: &mut String) {
        out.push_str(value.charset.as_str());
        out.push('\'');
        if let Some(language) = &value.language {
            out.push_str(language.as_str());
        }
        out.push('\'');
        if value.charset == Charset::ISO_8859_1 {
            let bytes: Vec<u8> = value.value.chars().map(|ch| ch as u8).collect();
            out.extend(percent_encode(&bytes, ATTR_CHAR));
        } else {
            out.extend(percent_encode(value.value.as_bytes(), ATTR_CHAR));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_utf8() {
        let value = ExtValueConverter.parse("UTF-8''%e2%82%ac%20rates").unwrap();
        assert_eq!(value.charset(), &Charset::UTF_8);
        assert_eq!(value.language(), None);
        assert_eq!(value.value(), "€ rates");
        assert_eq!(ExtValueConverter.to_text(&value), "UTF-8''%E2%82%AC%20rates");
    }

    #[test]
    fn decode_latin1() {
        let value = ExtValueConverter.parse("iso-8859-1'en'%A3%20rates").unwrap();
        assert_eq!(value.language(), Some("en"));
        assert_eq!(value.value(), "£ rates");
        assert_eq!(ExtValueConverter.to_text(&value), "iso-8859-1'en'%A3%20rates");
    }

    #[test]
    fn rejects() {
        let err = ExtValueConverter.parse("UTF-8''%e2%82").unwrap_err();
        assert_eq!(err.reason(), Reason::Undecodable);
        assert_eq!(err.position(), 7);

        let err = ExtValueConverter.parse("koi8-r''abc").unwrap_err();
        assert_eq!(err.reason(), Reason::Undecodable);
        assert_eq!(err.position(), 0);

        let err = ExtValueConverter.parse("UTF-8''%zz").unwrap_err();
        assert_eq!(err.reason(), Reason::Unexpected);
        assert_eq!(err.position(), 8);

        let err = ExtValueConverter.parse("UTF-8'abc").unwrap_err();
        assert!(err.is_end_of_text());

        assert!(ExtValue::new(Charset::ISO_8859_1, None, "€").is_err());
        assert!(ExtValue::new(Charset::new("koi8-r").unwrap(), None, "a").is_err());
        assert!(ExtValue::new(Charset::UTF_8, Some("not a tag"), "a").is_err());
    }
}
