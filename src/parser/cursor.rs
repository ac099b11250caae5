use crate::error::{GrammarError, Reason};
use crate::matches;

/// Character reader over one header value.
///
/// Scanning is left-to-right with one character of lookahead. Positions reported in errors are
/// zero-based character indices into the original text.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    kind: &'static str,
    /// byte offset into `text`
    offset: usize,
    /// character index into `text`
    position: usize,
}

/// A saved cursor location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    offset: usize,
    position: usize,
}

impl Mark {
    /// Returns the zero-based character position of this location.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Cursor<'a> {
    /// Create cursor at the beginning of `text`, reporting errors for the value `kind`.
    #[inline]
    pub const fn new(kind: &'static str, text: &'a str) -> Self {
        Self { text, kind, offset: 0, position: 0 }
    }

    /// Returns the kind of value being parsed.
    #[inline]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns the current character, `None` at the end of text.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    /// Consume and returns the current character.
    #[inline]
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        self.position += 1;
        Some(ch)
    }

    /// Returns the zero-based character position of the current character.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` if all text is consumed.
    #[inline]
    pub const fn is_end(&self) -> bool {
        self.offset == self.text.len()
    }

    /// Returns the text that is not consumed yet.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    /// Consume the current character if it is `ch`.
    #[inline]
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current character, failing unless it is `ch`.
    pub fn expect(&mut self, ch: char) -> Result<(), GrammarError> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.error(Reason::Unexpected))
        }
    }

    /// Consume characters while `pred` holds, returns the consumed text.
    pub fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let mark = self.mark();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
        self.since(mark)
    }

    /// Skip optional whitespace.
    #[inline]
    pub fn skip_whitespace(&mut self) {
        self.take_while(|ch| matches::ascii(ch, matches::is_whitespace));
    }

    /// Save the current location.
    #[inline]
    pub const fn mark(&self) -> Mark {
        Mark { offset: self.offset, position: self.position }
    }

    /// Returns the text consumed since `mark`.
    #[inline]
    pub fn since(&self, mark: Mark) -> &'a str {
        &self.text[mark.offset..self.offset]
    }

    /// Skip trailing whitespace and fail unless all text is consumed.
    pub fn finish(&mut self) -> Result<(), GrammarError> {
        self.skip_whitespace();
        self.expect_end()
    }

    /// Fail unless all text is consumed.
    #[inline]
    pub fn expect_end(&self) -> Result<(), GrammarError> {
        if self.is_end() {
            Ok(())
        } else {
            Err(self.error(Reason::Unexpected))
        }
    }

    /// Error at the current character.
    #[inline]
    pub fn error(&self, reason: Reason) -> GrammarError {
        GrammarError::new(self.kind, reason, self.peek(), self.position)
    }

    /// Error at a previously saved location.
    #[inline]
    pub fn error_at(&self, mark: Mark, reason: Reason) -> GrammarError {
        let found = self.text[mark.offset..].chars().next();
        GrammarError::new(self.kind, reason, found, mark.position)
    }

    /// Rebase an error raised on text consumed since `mark` into this cursor's coordinates.
    #[inline]
    pub fn rebase(&self, mark: Mark, err: GrammarError) -> GrammarError {
        err.rebase(self.kind, mark.position)
    }
}
