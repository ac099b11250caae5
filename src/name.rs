//! Header, parameter and cookie names.
use std::marker::PhantomData;

use bytes::Bytes;

use crate::error::{GrammarError, Reason};
use crate::matches;

/// Case policy of a [`Name`] family.
///
/// The policy decides equality, hashing and ordering of names. It is sealed, the only policies
/// are [`Insensitive`] and [`Sensitive`].
pub trait Case: sealed::Sealed + Send + Sync + 'static {
    /// Whether names of this family compare case-sensitively.
    const SENSITIVE: bool;
}

/// ASCII case-insensitive names, e.g. header and parameter names.
#[derive(Debug)]
pub enum Insensitive {}

/// Case-sensitive names, e.g. cookie names.
#[derive(Debug)]
pub enum Sensitive {}

impl Case for Insensitive {
    const SENSITIVE: bool = false;
}

impl Case for Sensitive {
    const SENSITIVE: bool = true;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Insensitive {}
    impl Sealed for super::Sensitive {}
}

/// Header field name, compared ASCII case-insensitively.
pub type HeaderName = Name<Insensitive>;

/// Cookie name, compared case-sensitively.
pub type CookieName = Name<Sensitive>;

/// A validated `token`, compared according to its [`Case`] policy.
///
/// The original spelling is kept for display. With the [`Insensitive`] policy, `Accept`,
/// `accept` and `ACCEPT` are the same name and hash the same.
pub struct Name<C: Case = Insensitive> {
    /// is valid ASCII
    bytes: Bytes,
    case: PhantomData<C>,
}

impl<C: Case> Name<C> {
    /// Create name from static string.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid token.
    #[inline]
    pub const fn from_static(name: &'static str) -> Self {
        match validate_token(name.as_bytes()) {
            Ok(()) => Self::from_static_unchecked(name),
            Err(err) => err.panic_const(),
        }
    }

    /// Create name by copying from string.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not a valid token.
    pub fn new<S: AsRef<str>>(name: S) -> Result<Self, GrammarError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(GrammarError::new("name", Reason::Empty, None, 0));
        }
        for (position, ch) in name.chars().enumerate() {
            if !matches::ascii(ch, matches::is_token) {
                return Err(GrammarError::new("name", Reason::Unexpected, Some(ch), position));
            }
        }
        Ok(Self::copy_from(name))
    }

    /// `name` must be valid ASCII, already validated by the caller's grammar.
    pub(crate) const fn from_static_unchecked(name: &'static str) -> Self {
        Self {
            bytes: Bytes::from_static(name.as_bytes()),
            case: PhantomData,
        }
    }

    /// `name` must be valid ASCII, already validated by the caller's grammar.
    pub(crate) fn copy_from(name: &str) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(name.as_bytes()),
            case: PhantomData,
        }
    }

    /// Extracts a string slice of the name, in its original spelling.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: `bytes` is valid ASCII
        unsafe { std::str::from_utf8_unchecked(&self.bytes) }
    }

    /// Returns `true` if `other` spells this name under the family's case policy.
    #[inline]
    pub fn matches(&self, other: &str) -> bool {
        if C::SENSITIVE {
            self.as_str() == other
        } else {
            self.as_str().eq_ignore_ascii_case(other)
        }
    }
}

/// token = 1*tchar
const fn validate_token(bytes: &[u8]) -> Result<(), GrammarError> {
    if bytes.is_empty() {
        return Err(GrammarError::new("name", Reason::Empty, None, 0));
    }
    let mut i = 0;
    while i < bytes.len() {
        if !matches::is_token(bytes[i]) {
            return Err(GrammarError::new("name", Reason::Unexpected, Some(bytes[i] as char), i));
        }
        i += 1;
    }
    Ok(())
}

// ===== Traits =====

impl<C: Case> Clone for Name<C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
            case: PhantomData,
        }
    }
}

impl<C: Case> std::fmt::Display for Name<C> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<C: Case> std::fmt::Debug for Name<C> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Name").field(&self.as_str()).finish()
    }
}

impl<C: Case> std::str::FromStr for Name<C> {
    type Err = GrammarError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<C: Case> PartialEq for Name<C> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.matches(other.as_str())
    }
}

impl<C: Case> Eq for Name<C> {}

impl<C: Case> PartialEq<str> for Name<C> {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}

impl<C: Case> PartialEq<&str> for Name<C> {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}

impl<C: Case> std::hash::Hash for Name<C> {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if C::SENSITIVE {
            state.write(&self.bytes);
        } else {
            state.write_u64(matches::hash_to_lowercase(&self.bytes));
        }
    }
}

impl<C: Case> PartialOrd for Name<C> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Case> Ord for Name<C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if C::SENSITIVE {
            self.bytes.cmp(&other.bytes)
        } else {
            let lhs = self.bytes.iter().map(u8::to_ascii_lowercase);
            let rhs = other.bytes.iter().map(u8::to_ascii_lowercase);
            lhs.cmp(rhs)
        }
    }
}
