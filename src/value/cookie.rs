use crate::error::{GrammarError, Reason};
use crate::log::debug;
use crate::matches;
use crate::name::{CookieName, Name};
use crate::parser::{self, Cursor, FieldValue, field_value, grammar};

/// Cookie pair, e.g. `sid=31d4d96e407aad42`.
///
/// ```not_rust
/// cookie-pair  = cookie-name "=" cookie-value
/// cookie-name  = token
/// ```
///
/// The name is case-sensitive. The value accepts the historical grammar, any run of
/// characters but `;` and controls, surrounding whitespace trimmed. A value wrapped in
/// `DQUOTE`s is kept with its quotes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cookie {
    name: CookieName,
    value: String,
}

impl Cookie {
    /// Create cookie pair.
    ///
    /// # Errors
    ///
    /// Returns error if `name` is not a token, or if `value` contains `;`, controls, or
    /// surrounding whitespace.
    pub fn new(name: &str, value: &str) -> Result<Self, GrammarError> {
        let name = Name::new(name)?;
        validate_value(value)?;
        Ok(Self { name, value: value.to_owned() })
    }

    /// Returns the cookie name.
    #[inline]
    pub fn name(&self) -> &CookieName {
        &self.name
    }

    /// Returns the cookie value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns this cookie with another value.
    ///
    /// # Errors
    ///
    /// Returns error if `value` contains `;`, controls, or surrounding whitespace.
    pub fn with_value(&self, value: &str) -> Result<Self, GrammarError> {
        validate_value(value)?;
        Ok(Self { name: self.name.clone(), value: value.to_owned() })
    }

    /// Parse a `Cookie` header, pairs separated by `;`.
    ///
    /// # Errors
    ///
    /// Returns error if any pair violates the grammar, or if there is no pair.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, GrammarError> {
        fn parse(text: &str) -> Result<Vec<Cookie>, GrammarError> {
            let mut cursor = parser::start(Cookie::KIND, text)?;
            let mut cookies = Vec::new();
            loop {
                cursor.skip_whitespace();
                if cursor.eat(';') {
                    continue;
                }
                if cursor.is_end() {
                    break;
                }
                cookies.push(Cookie::parse_from(&mut cursor)?);
                cursor.skip_whitespace();
                if cursor.is_end() {
                    break;
                }
                cursor.expect(';')?;
            }
            if cookies.is_empty() {
                return Err(cursor.error(Reason::Empty));
            }
            Ok(cookies)
        }

        let result = parse(text);
        if let Err(_err) = &result {
            debug!("rejected cookies {:?}: {_err}", text);
        }
        result
    }

    /// Format a `Cookie` header, pairs separated by `; `.
    pub fn format_list(cookies: &[Self]) -> String {
        let mut out = String::new();
        for (i, cookie) in cookies.iter().enumerate() {
            if i != 0 {
                out.push_str("; ");
            }
            cookie.write_to(&mut out);
        }
        out
    }
}

fn is_value_char(ch: char) -> bool {
    matches::ascii_or_obs(ch, matches::is_cookie_value)
}

fn validate_value(value: &str) -> Result<(), GrammarError> {
    let trimmed = value.trim_matches(|ch| matches::ascii(ch, matches::is_whitespace));
    for (position, ch) in value.chars().enumerate() {
        if !is_value_char(ch) {
            return Err(GrammarError::new(Cookie::KIND, Reason::Unexpected, Some(ch), position));
        }
    }
    if trimmed.len() != value.len() {
        let found = value.chars().next();
        return Err(GrammarError::new(Cookie::KIND, Reason::Unexpected, found, 0));
    }
    Ok(())
}

impl FieldValue for Cookie {
    const KIND: &'static str = "cookie";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        let name = grammar::token(cursor)?;
        cursor.expect('=')?;
        let value = cursor.take_while(is_value_char);
        let value = value.trim_matches(|ch| matches::ascii(ch, matches::is_whitespace));
        Ok(Self {
            name: Name::copy_from(name),
            value: value.to_owned(),
        })
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(self.name.as_str());
        out.push('=');
        out.push_str(&self.value);
    }
}

field_value!(Cookie);
