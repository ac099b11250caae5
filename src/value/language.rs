use super::{Q, Weighted};
use crate::convert::{Converter, ParameterType, Quality};
use crate::error::{GrammarError, Reason};
use crate::name::Name;
use crate::param::{ParameterSet, Parameters};
use crate::parser::{Cursor, FieldValue, field_value, parse_parameters};

static PARAMS: ParameterSet = ParameterSet::new(&[&Q]);

/// Language tag with its quality factor, e.g. `en-US;q=0.8`.
///
/// ```not_rust
/// language-range = ( 1*8ALPHA *( "-" 1*8alphanum ) ) / "*"
/// ```
///
/// Tags compare case-insensitively, `en-US` and `EN-us` are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LanguageTag {
    tag: Name,
    params: Parameters,
}

impl LanguageTag {
    /// Create language tag without parameters.
    ///
    /// # Errors
    ///
    /// Returns error if `tag` is not a language range.
    pub fn new(tag: &str) -> Result<Self, GrammarError> {
        LanguageTagConverter.parse(tag)
    }

    /// Returns the tag as spelled, e.g. `en-US`.
    #[inline]
    pub fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Returns the primary subtag, e.g. `en` of `en-US`.
    pub fn primary(&self) -> &str {
        self.subtags().next().unwrap_or_default()
    }

    /// Returns an iterator over subtags.
    pub fn subtags(&self) -> impl Iterator<Item = &str> {
        self.tag().split('-')
    }

    /// Returns `true` if this is the `*` range.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.tag() == "*"
    }

    /// Returns the parameters.
    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Returns the quality factor, `1` if absent.
    pub fn quality(&self) -> Quality {
        self.params.get(&Q).copied().unwrap_or_default()
    }

    /// Returns this tag with quality factor `q`.
    pub fn with_quality(&self, q: Quality) -> Self {
        Self {
            tag: self.tag.clone(),
            params: self.params.with_value(Q.name().clone(), q.into_value()),
        }
    }

    /// Returns this tag without parameters.
    pub fn without_params(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            params: Parameters::new(),
        }
    }

    /// Basic filtering, returns `true` if this range matches `tag`.
    ///
    /// `*` matches every tag, otherwise the range must equal the tag or be a prefix of it
    /// followed by `-`, ignoring case.
    pub fn matches(&self, tag: &LanguageTag) -> bool {
        if self.is_wildcard() {
            return true;
        }
        let range = self.tag();
        let tag = tag.tag();
        match tag.get(..range.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(range) => {
                tag.len() == range.len() || tag.as_bytes()[range.len()] == b'-'
            }
            _ => false,
        }
    }
}

impl Weighted for LanguageTag {
    #[inline]
    fn quality(&self) -> Quality {
        LanguageTag::quality(self)
    }
}

impl FieldValue for LanguageTag {
    const KIND: &'static str = "language tag";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        let tag = scan_range(cursor)?;
        let params = parse_parameters(cursor, &PARAMS)?;
        Ok(Self { tag: Name::copy_from(tag), params })
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(self.tag());
        self.params.write_to(out);
    }
}

field_value!(LanguageTag, list);

/// `*` or a language tag.
fn scan_range<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, GrammarError> {
    let mark = cursor.mark();
    if cursor.eat('*') {
        return Ok(cursor.since(mark));
    }
    scan_tag(cursor)
}

/// 1*8ALPHA *( "-" 1*8alphanum )
pub(crate) fn scan_tag<'a>(cursor: &mut Cursor<'a>) -> Result<&'a str, GrammarError> {
    let mark = cursor.mark();
    subtag(cursor, |ch| ch.is_ascii_alphabetic())?;
    while cursor.eat('-') {
        subtag(cursor, |ch| ch.is_ascii_alphanumeric())?;
    }
    Ok(cursor.since(mark))
}

fn subtag(cursor: &mut Cursor<'_>, class: fn(char) -> bool) -> Result<(), GrammarError> {
    let mut len = 0;
    while let Some(ch) = cursor.peek() {
        if !class(ch) {
            break;
        }
        if len == 8 {
            return Err(cursor.error(Reason::Unexpected));
        }
        cursor.bump();
        len += 1;
    }
    if len == 0 {
        return Err(cursor.error(Reason::Unexpected));
    }
    Ok(())
}

/// Language tag without parameters, as in the `hreflang` parameter.
#[derive(Clone, Copy, Debug, Default)]
pub struct LanguageTagConverter;

impl Converter for LanguageTagConverter {
    type Value = LanguageTag;

    fn kind(&self) -> &'static str {
        LanguageTag::KIND
    }

    fn parse(&self, text: &str) -> Result<LanguageTag, GrammarError> {
        let mut cursor = Cursor::new(self.kind(), text);
        let tag = scan_range(&mut cursor)?;
        cursor.expect_end()?;
        Ok(LanguageTag {
            tag: Name::copy_from(tag),
            params: Parameters::new(),
        })
    }

    fn format(&self, value: &LanguageTag, out: &mut String) {
        out.push_str(value.tag());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::sort_by_quality;

    #[test]
    fn parse_tag() {
        let tag = LanguageTag::parse("en-US;q=0.8").unwrap();
        assert_eq!(tag.tag(), "en-US");
        assert_eq!(tag.primary(), "en");
        assert_eq!(tag.quality().as_millis(), 800);
        assert_eq!(tag.format(), "en-US;q=0.8");

        assert_eq!(LanguageTag::parse("EN-us").unwrap(), LanguageTag::parse("en-US").unwrap());
        assert_eq!(LanguageTag::parse("*").unwrap().quality(), Quality::MAX);
        assert_eq!(LanguageTag::parse(" de ; q=1 ").unwrap().format(), "de;q=1");
    }

    #[test]
    fn rejects() {
        let err = LanguageTag::parse("en;q=1.5").unwrap_err();
        assert_eq!(err.reason(), Reason::OutOfRange);
        assert_eq!(err.position(), 5);

        let err = LanguageTag::parse("abcdefghi").unwrap_err();
        assert_eq!(err.found(), Some('i'));
        assert_eq!(err.position(), 8);

        let err = LanguageTag::parse("en;level=1").unwrap_err();
        assert_eq!(err.reason(), Reason::UnknownParameter);
        assert_eq!(err.position(), 3);

        let err = LanguageTag::parse("en-").unwrap_err();
        assert!(err.is_end_of_text());

        assert!(LanguageTag::parse("1en").is_err());
        assert!(LanguageTag::parse("").is_err());
    }

    #[test]
    fn quality_sort() {
        let mut tags = LanguageTag::parse_list("en;q=0.5, fr;q=0.9, de;q=0.9, it").unwrap();
        sort_by_quality(&mut tags);
        let tags: Vec<&str> = tags.iter().map(LanguageTag::tag).collect();
        assert_eq!(tags, ["it", "fr", "de", "en"]);
    }

    #[test]
    fn functional_update() {
        let tag = LanguageTag::new("fr").unwrap();
        let weighted = tag.with_quality(Quality::from_millis(300).unwrap());
        assert_eq!(tag.format(), "fr");
        assert_eq!(weighted.format(), "fr;q=0.3");
        assert_eq!(weighted.without_params(), tag);
        assert_ne!(weighted, tag);
    }

    #[test]
    fn basic_filtering() {
        let range = |s| LanguageTag::new(s).unwrap();
        assert!(range("en").matches(&range("en-US")));
        assert!(range("en-us").matches(&range("EN-US")));
        assert!(range("*").matches(&range("de")));
        assert!(!range("en").matches(&range("eng")));
        assert!(!range("en-US").matches(&range("en")));
    }
}
