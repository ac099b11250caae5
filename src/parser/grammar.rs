//! Shared recognizers: token, quoted-string, comment, and their formatting counterparts.
use super::Cursor;
use crate::error::{GrammarError, Reason};
use crate::matches;

/// token = 1*tchar
pub fn token<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, GrammarError> {
    let token = cursor.take_while(|ch| matches::ascii(ch, matches::is_token));
    if token.is_empty() {
        return Err(cursor.error(Reason::Unexpected));
    }
    Ok(token)
}

/// quoted-string = DQUOTE *( qdtext / quoted-pair ) DQUOTE
///
/// Returns the unescaped content.
pub fn quoted_string(cursor: &mut Cursor<'_>) -> Result<String, GrammarError> {
    cursor.expect('"')?;
    let mut value = String::new();
    loop {
        match cursor.peek() {
            None => return Err(cursor.error(Reason::UnterminatedQuote)),
            Some('"') => {
                cursor.bump();
                return Ok(value);
            }
            Some('\\') => {
                cursor.bump();
                value.push(quoted_pair(cursor, Reason::UnterminatedQuote)?);
            }
            Some(ch) if matches::ascii_or_obs(ch, matches::is_qdtext) => {
                cursor.bump();
                value.push(ch);
            }
            Some(_) => return Err(cursor.error(Reason::Unexpected)),
        }
    }
}

/// The character after a `\`.
fn quoted_pair(cursor: &mut Cursor<'_>, at_end: Reason) -> Result<char, GrammarError> {
    match cursor.peek() {
        None => Err(cursor.error(at_end)),
        Some(ch) if matches::ascii_or_obs(ch, matches::is_quoted_pair) => {
            cursor.bump();
            Ok(ch)
        }
        Some(_) => Err(cursor.error(Reason::Unexpected)),
    }
}

/// comment = "(" *( ctext / quoted-pair / comment ) ")"
///
/// Returns the raw content between the outermost parentheses.
pub fn comment<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, GrammarError> {
    cursor.expect('(')?;
    let start = cursor.mark();
    let mut depth = 1usize;
    loop {
        match cursor.peek() {
            None => return Err(cursor.error(Reason::UnbalancedComment)),
            Some('(') => {
                depth += 1;
                cursor.bump();
            }
            Some(')') => {
                depth -= 1;
                if depth == 0 {
                    let content = cursor.since(start);
                    cursor.bump();
                    return Ok(content);
                }
                cursor.bump();
            }
            Some('\\') => {
                cursor.bump();
                quoted_pair(cursor, Reason::UnbalancedComment)?;
            }
            Some(ch) if matches::ascii_or_obs(ch, matches::is_ctext) => {
                cursor.bump();
            }
            Some(_) => return Err(cursor.error(Reason::Unexpected)),
        }
    }
}

/// The wire extent of a `token / quoted-string` value, quotes included.
pub fn raw_value<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, GrammarError> {
    let mark = cursor.mark();
    if cursor.peek() == Some('"') {
        quoted_string(cursor)?;
        return Ok(cursor.since(mark));
    }
    let token = cursor.take_while(|ch| matches::ascii(ch, matches::is_token));
    if token.is_empty() {
        return Err(cursor.error(Reason::MissingValue));
    }
    Ok(token)
}

/// Returns `true` if `value` is a non-empty `token`.
pub fn is_token(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| matches::ascii(ch, matches::is_token))
}

/// Check that `value` can be written as a quoted string, i.e. contains no control character
/// other than HTAB.
pub fn validate_text(kind: &'static str, value: &str) -> Result<(), GrammarError> {
    for (position, ch) in value.chars().enumerate() {
        if !matches::ascii_or_obs(ch, matches::is_quoted_pair) {
            return Err(GrammarError::new(kind, Reason::Unexpected, Some(ch), position));
        }
    }
    Ok(())
}

/// Write `value` as a quoted string, escaping `"` and `\`.
pub fn write_quoted(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Write `value` bare if it is a token, quoted otherwise.
pub fn write_token_or_quoted(out: &mut String, value: &str) {
    if is_token(value) {
        out.push_str(value);
    } else {
        write_quoted(out, value);
    }
}
