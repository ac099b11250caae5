use crate::error::{GrammarError, Reason};
use crate::matches;
use crate::parser::{Cursor, FieldValue, field_value};

/// Entity tag validator strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Validator {
    Strong,
    /// Written with the `W/` prefix.
    Weak,
}

/// Entity tag, e.g. `"xyzzy"`, `W/"xyzzy"` or `*`.
///
/// ```not_rust
/// entity-tag = [ "W/" ] DQUOTE *etagc DQUOTE
/// ```
///
/// The [`WILDCARD`][EntityTag::WILDCARD] `*` is its own case, it has no validator and is never
/// equal to a concrete tag, not even to `"*"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityTag {
    repr: Repr,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Repr {
    Wildcard,
    Tag {
        validator: Validator,
        /// contains only `etagc`
        opaque: Box<str>,
    },
}

impl EntityTag {
    /// `*`, matches any current representation.
    pub const WILDCARD: Self = Self { repr: Repr::Wildcard };

    /// Create entity tag.
    ///
    /// # Errors
    ///
    /// Returns error if `opaque` contains `"`, whitespace or control characters.
    pub fn new(validator: Validator, opaque: &str) -> Result<Self, GrammarError> {
        for (position, ch) in opaque.chars().enumerate() {
            if !matches::ascii_or_obs(ch, matches::is_etagc) {
                return Err(GrammarError::new(Self::KIND, Reason::Unexpected, Some(ch), position));
            }
        }
        Ok(Self {
            repr: Repr::Tag { validator, opaque: opaque.into() },
        })
    }

    /// Create strong entity tag.
    ///
    /// # Errors
    ///
    /// Returns error if `opaque` contains `"`, whitespace or control characters.
    #[inline]
    pub fn strong(opaque: &str) -> Result<Self, GrammarError> {
        Self::new(Validator::Strong, opaque)
    }

    /// Create weak entity tag.
    ///
    /// # Errors
    ///
    /// Returns error if `opaque` contains `"`, whitespace or control characters.
    #[inline]
    pub fn weak(opaque: &str) -> Result<Self, GrammarError> {
        Self::new(Validator::Weak, opaque)
    }

    /// Returns `true` if this is the `*` wildcard.
    #[inline]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self.repr, Repr::Wildcard)
    }

    /// Returns the validator, `None` for the wildcard.
    #[inline]
    pub const fn validator(&self) -> Option<Validator> {
        match &self.repr {
            Repr::Wildcard => None,
            Repr::Tag { validator, .. } => Some(*validator),
        }
    }

    /// Returns `true` if this is a weak tag.
    #[inline]
    pub const fn is_weak(&self) -> bool {
        matches!(self.validator(), Some(Validator::Weak))
    }

    /// Returns the opaque tag without quotes, `None` for the wildcard.
    #[inline]
    pub fn opaque(&self) -> Option<&str> {
        match &self.repr {
            Repr::Wildcard => None,
            Repr::Tag { opaque, .. } => Some(&**opaque),
        }
    }

    /// Returns this tag with another validator, the wildcard is returned as is.
    pub fn with_validator(&self, validator: Validator) -> Self {
        match &self.repr {
            Repr::Wildcard => Self::WILDCARD,
            Repr::Tag { opaque, .. } => Self {
                repr: Repr::Tag { validator, opaque: opaque.clone() },
            },
        }
    }

    /// Strong comparison, both tags are strong and their opaque tags are identical.
    pub fn strong_eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (
                Repr::Tag { validator: Validator::Strong, opaque: a },
                Repr::Tag { validator: Validator::Strong, opaque: b },
            ) => a == b,
            _ => false,
        }
    }

    /// Weak comparison, opaque tags are identical regardless of either validator.
    pub fn weak_eq(&self, other: &Self) -> bool {
        match (self.opaque(), other.opaque()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl FieldValue for EntityTag {
    const KIND: &'static str = "entity tag";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        if cursor.eat('*') {
            return Ok(Self::WILDCARD);
        }
        let validator = if cursor.eat('W') {
            cursor.expect('/')?;
            Validator::Weak
        } else {
            Validator::Strong
        };
        cursor.expect('"')?;
        let opaque = cursor.take_while(|ch| matches::ascii_or_obs(ch, matches::is_etagc));
        if cursor.is_end() {
            return Err(cursor.error(Reason::UnterminatedQuote));
        }
        cursor.expect('"')?;
        Ok(Self {
            repr: Repr::Tag { validator, opaque: opaque.into() },
        })
    }

    fn write_to(&self, out: &mut String) {
        match &self.repr {
            Repr::Wildcard => out.push('*'),
            Repr::Tag { validator, opaque } => {
                if let Validator::Weak = validator {
                    out.push_str("W/");
                }
                out.push('"');
                out.push_str(opaque);
                out.push('"');
            }
        }
    }
}

field_value!(EntityTag, list);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_tags() {
        let strong = EntityTag::parse("\"xyzzy\"").unwrap();
        assert_eq!(strong.validator(), Some(Validator::Strong));
        assert_eq!(strong.opaque(), Some("xyzzy"));
        assert_eq!(strong.format(), "\"xyzzy\"");

        let weak = EntityTag::parse("W/\"xyzzy\"").unwrap();
        assert!(weak.is_weak());
        assert_eq!(weak.format(), "W/\"xyzzy\"");
        assert_ne!(strong, weak);

        assert_eq!(EntityTag::parse("\"\"").unwrap().opaque(), Some(""));
    }

    #[test]
    fn wildcard_identity() {
        let wildcard = EntityTag::parse("*").unwrap();
        assert_eq!(wildcard, EntityTag::WILDCARD);
        assert!(wildcard.is_wildcard());
        assert_eq!(wildcard.validator(), None);
        assert_eq!(wildcard.format(), "*");

        let star = EntityTag::parse("\"*\"").unwrap();
        assert_ne!(star, EntityTag::WILDCARD);
        assert!(!EntityTag::WILDCARD.weak_eq(&star));
        assert!(!EntityTag::WILDCARD.weak_eq(&EntityTag::WILDCARD));
        assert_eq!(EntityTag::WILDCARD.with_validator(Validator::Weak), EntityTag::WILDCARD);
    }

    #[test]
    fn comparison() {
        let strong = EntityTag::strong("1").unwrap();
        let weak = EntityTag::weak("1").unwrap();
        let other = EntityTag::weak("2").unwrap();

        assert!(strong.strong_eq(&strong));
        assert!(!strong.strong_eq(&weak));
        assert!(!weak.strong_eq(&weak));
        assert!(strong.weak_eq(&weak));
        assert!(weak.weak_eq(&weak));
        assert!(!weak.weak_eq(&other));

        assert_eq!(weak.with_validator(Validator::Strong), strong);
    }

    #[test]
    fn rejects() {
        let err = EntityTag::parse("\"abc").unwrap_err();
        assert_eq!(err.reason(), Reason::UnterminatedQuote);
        assert_eq!(err.position(), 4);
        assert!(err.is_end_of_text());

        let err = EntityTag::parse("w/\"abc\"").unwrap_err();
        assert_eq!(err.found(), Some('w'));
        assert_eq!(err.position(), 0);

        let err = EntityTag::parse("\"a b\"").unwrap_err();
        assert_eq!(err.found(), Some(' '));
        assert_eq!(err.position(), 2);

        assert!(EntityTag::strong("a\"b").is_err());
    }

    #[test]
    fn list() {
        let tags = EntityTag::parse_list("\"a\", W/\"b\", ,\"c\"").unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(EntityTag::format_list(&tags), "\"a\", W/\"b\", \"c\"");
    }
}
