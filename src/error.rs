//! Error type of every parse in this crate.

/// A header value grammar violation.
///
/// Carries the kind of value being parsed, the [`Reason`] of the failure, the offending
/// character (`None` when the text ended prematurely) and its zero-based character position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarError {
    kind: &'static str,
    reason: Reason,
    found: Option<char>,
    position: usize,
}

/// Why a header value was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Reason {
    /// Character is not allowed at this point of the grammar.
    Unexpected,
    /// Quoted string is missing its closing `"`.
    UnterminatedQuote,
    /// Comment parentheses are not balanced.
    UnbalancedComment,
    /// Value is empty.
    Empty,
    /// Value exceeds [`MAX_VALUE_LEN`][crate::MAX_VALUE_LEN].
    TooLong,
    /// A required argument or parameter value is missing.
    MissingValue,
    /// Parameter name occurs more than once.
    DuplicateParameter,
    /// Parameter name has no registered converter.
    UnknownParameter,
    /// Numeric value is outside of its allowed range.
    OutOfRange,
    /// Encoded bytes cannot be decoded in the declared charset.
    Undecodable,
}

impl Reason {
    pub(crate) const fn message(&self) -> &'static str {
        match self {
            Self::Unexpected => "unexpected character",
            Self::UnterminatedQuote => "unterminated quoted string",
            Self::UnbalancedComment => "unbalanced comment",
            Self::Empty => "cannot be empty",
            Self::TooLong => "too long",
            Self::MissingValue => "missing value",
            Self::DuplicateParameter => "duplicate parameter",
            Self::UnknownParameter => "unknown parameter",
            Self::OutOfRange => "value out of range",
            Self::Undecodable => "cannot decode in declared charset",
        }
    }
}

impl GrammarError {
    pub(crate) const fn new(
        kind: &'static str,
        reason: Reason,
        found: Option<char>,
        position: usize,
    ) -> Self {
        Self { kind, reason, found, position }
    }

    /// Returns the kind of value that was being parsed.
    #[inline]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns why the value was rejected.
    #[inline]
    pub const fn reason(&self) -> Reason {
        self.reason
    }

    /// Returns the offending character, `None` if the text ended prematurely.
    #[inline]
    pub const fn found(&self) -> Option<char> {
        self.found
    }

    /// Returns the zero-based character position of the offending character.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` if the text ended before the value was complete.
    #[inline]
    pub const fn is_end_of_text(&self) -> bool {
        self.found.is_none()
    }

    /// Moves an error raised on a slice of a larger text into the coordinates of that text.
    pub(crate) const fn rebase(self, kind: &'static str, base: usize) -> Self {
        Self {
            kind,
            reason: self.reason,
            found: self.found,
            position: base + self.position,
        }
    }

    pub(crate) const fn panic_const(&self) -> ! {
        panic!("{}", self.reason.message())
    }
}

impl std::error::Error for GrammarError {}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.kind, self.reason.message())?;
        match self.found {
            Some(ch) => write!(f, ", found {ch:?} at position {}", self.position),
            None => write!(f, ", found end of text at position {}", self.position),
        }
    }
}
