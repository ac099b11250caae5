use super::{LanguageTag, MediaRange};
use crate::convert::{
    Converter, ExtValue, ExtValueConverter, LanguageTagConverter, MediaRangeConverter,
    ParameterType, TextConverter,
};
use crate::error::{GrammarError, Reason};
use crate::matches;
use crate::name::Name;
use crate::param::{ParameterName, ParameterSet, Parameters};
use crate::parser::{Cursor, FieldValue, field_value, grammar, parse_parameters};

/// Link relation type, a registered keyword or an absolute URI.
///
/// ```not_rust
/// relation-type  = reg-rel-type / ext-rel-type
/// reg-rel-type   = LOALPHA *( LOALPHA / DIGIT / "." / "-" )
/// ext-rel-type   = URI
/// ```
///
/// Keywords compare case-insensitively, URIs compare exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkRelation {
    repr: Repr,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Repr {
    /// `reg-rel-type`
    Keyword(Name),
    /// scheme checked, contains only URI characters
    Uri(String),
}

impl LinkRelation {
    /// `alternate`
    pub const ALTERNATE: Self = Self::keyword("alternate");
    /// `canonical`
    pub const CANONICAL: Self = Self::keyword("canonical");
    /// `next`
    pub const NEXT: Self = Self::keyword("next");
    /// `preload`
    pub const PRELOAD: Self = Self::keyword("preload");
    /// `prev`
    pub const PREV: Self = Self::keyword("prev");
    /// `self`
    pub const SELF: Self = Self::keyword("self");
    /// `stylesheet`
    pub const STYLESHEET: Self = Self::keyword("stylesheet");

    const fn keyword(name: &'static str) -> Self {
        Self { repr: Repr::Keyword(Name::from_static_unchecked(name)) }
    }

    /// Create relation type from a keyword or an absolute URI.
    ///
    /// # Errors
    ///
    /// Returns error if `relation` is neither a `reg-rel-type` nor a URI with a scheme.
    pub fn new(relation: &str) -> Result<Self, GrammarError> {
        Self::parse(relation)
    }

    /// Returns the relation as written.
    pub fn as_str(&self) -> &str {
        match &self.repr {
            Repr::Keyword(name) => name.as_str(),
            Repr::Uri(uri) => uri,
        }
    }

    /// Returns `true` for the URI form.
    #[inline]
    pub fn is_uri(&self) -> bool {
        matches!(self.repr, Repr::Uri(_))
    }
}

/// Scan one relation type, up to whitespace or one of `,;"\`.
fn scan_relation(cursor: &mut Cursor<'_>) -> Result<LinkRelation, GrammarError> {
    let kind = cursor.kind();
    let mark = cursor.mark();
    let text = cursor.take_while(|ch| {
        matches::ascii(ch, matches::is_uri) && !matches!(ch, ',' | ';' | '\\')
    });
    if text.is_empty() {
        return Err(cursor.error(Reason::Unexpected));
    }

    // `text` is ASCII, byte index is character index
    let reject = |index: usize| {
        let found = text[index..].chars().next();
        GrammarError::new(kind, Reason::Unexpected, found, mark.position() + index)
    };

    match text.find(':') {
        Some(colon) => {
            let scheme = &text.as_bytes()[..colon];
            if !scheme.first().is_some_and(u8::is_ascii_alphabetic) {
                return Err(reject(0));
            }
            if let Some(index) = scheme.iter().position(|b| !matches::is_scheme(*b)) {
                return Err(reject(index));
            }
            Ok(LinkRelation { repr: Repr::Uri(text.to_owned()) })
        }
        None => {
            let bytes = text.as_bytes();
            if !bytes[0].is_ascii_alphabetic() {
                return Err(reject(0));
            }
            let invalid = |b: &u8| !(b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-'));
            if let Some(index) = bytes.iter().position(invalid) {
                return Err(reject(index));
            }
            Ok(LinkRelation { repr: Repr::Keyword(Name::copy_from(text)) })
        }
    }
}

impl FieldValue for LinkRelation {
    const KIND: &'static str = "link relation";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        scan_relation(cursor)
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(self.as_str());
    }
}

field_value!(LinkRelation, list);

/// Space separated relation types, as in the `rel` parameter.
///
/// A single keyword is written bare, anything else is quoted.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelationsConverter;

impl Converter for RelationsConverter {
    type Value = Vec<LinkRelation>;

    fn kind(&self) -> &'static str {
        "link relations"
    }

    fn parse(&self, text: &str) -> Result<Vec<LinkRelation>, GrammarError> {
        let mut cursor = Cursor::new(self.kind(), text);
        if cursor.peek() != Some('"') {
            let relation = scan_relation(&mut cursor)?;
            cursor.expect_end()?;
            return Ok(vec![relation]);
        }

        let content = grammar::quoted_string(&mut cursor)?;
        cursor.expect_end()?;

        // positions inside are off by the escapes before them
        let mut inner = Cursor::new(self.kind(), &content);
        let mut relations = Vec::new();
        loop {
            inner.skip_whitespace();
            if inner.is_end() {
                break;
            }
            let relation = scan_relation(&mut inner).map_err(|err| err.rebase(self.kind(), 1))?;
            relations.push(relation);
        }
        if relations.is_empty() {
            return Err(GrammarError::new(self.kind(), Reason::Empty, Some('"'), 0));
        }
        Ok(relations)
    }

    fn format(&self, value: &Vec<LinkRelation>, out: &mut String) {
        if let [relation] = value.as_slice() {
            if !relation.is_uri() {
                out.push_str(relation.as_str());
                return;
            }
        }
        out.push('"');
        for (i, relation) in value.iter().enumerate() {
            if i != 0 {
                out.push(' ');
            }
            out.push_str(relation.as_str());
        }
        out.push('"');
    }
}

/// `rel` parameter.
pub static REL: ParameterName<Vec<LinkRelation>> = ParameterName::new("rel", &RelationsConverter);

/// `rev` parameter.
pub static REV: ParameterName<Vec<LinkRelation>> = ParameterName::new("rev", &RelationsConverter);

/// `anchor` parameter.
pub static ANCHOR: ParameterName<String> = ParameterName::new("anchor", &TextConverter);

/// `hreflang` parameter.
pub static HREFLANG: ParameterName<LanguageTag> =
    ParameterName::new("hreflang", &LanguageTagConverter);

/// `media` parameter.
pub static MEDIA: ParameterName<String> = ParameterName::new("media", &TextConverter);

/// `title` parameter.
pub static TITLE: ParameterName<String> = ParameterName::new("title", &TextConverter);

/// `title*` parameter.
pub static TITLE_EXT: ParameterName<ExtValue> = ParameterName::new("title*", &ExtValueConverter);

/// `type` parameter.
pub static TYPE: ParameterName<MediaRange> = ParameterName::new("type", &MediaRangeConverter);

static PARAMS: ParameterSet = ParameterSet::with_extension(&[
    &REL, &REV, &ANCHOR, &HREFLANG, &MEDIA, &TITLE, &TITLE_EXT, &TYPE,
]);

/// Link header value, e.g. `<https://example.com/2>; rel=next`.
///
/// ```not_rust
/// link-value = "<" URI-Reference ">" *( OWS ";" OWS link-param )
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    target: String,
    params: Parameters,
}

impl Link {
    /// Create link to `target` without parameters.
    ///
    /// # Errors
    ///
    /// Returns error if `target` contains characters outside of a URI reference.
    pub fn new(target: &str) -> Result<Self, GrammarError> {
        for (position, ch) in target.chars().enumerate() {
            if !matches::ascii(ch, matches::is_uri) {
                return Err(GrammarError::new(Self::KIND, Reason::Unexpected, Some(ch), position));
            }
        }
        Ok(Self { target: target.to_owned(), params: Parameters::new() })
    }

    /// Returns the link target.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the parameters.
    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Returns the relation types, empty without `rel`.
    pub fn rel(&self) -> &[LinkRelation] {
        self.params.get(&REL).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `relation` is one of the relation types.
    pub fn has_rel(&self, relation: &LinkRelation) -> bool {
        self.rel().contains(relation)
    }

    /// Returns the title, `title*` is preferred over `title`.
    pub fn title(&self) -> Option<&str> {
        match self.params.get(&TITLE_EXT) {
            Some(ext) => Some(ext.value()),
            None => self.params.get(&TITLE).map(String::as_str),
        }
    }

    /// Returns the `hreflang` parameter.
    pub fn hreflang(&self) -> Option<&LanguageTag> {
        self.params.get(&HREFLANG)
    }

    /// Returns the `type` parameter.
    pub fn media_type(&self) -> Option<&MediaRange> {
        self.params.get(&TYPE)
    }

    /// Returns this link with parameter `name` set to `value`.
    ///
    /// `name` must be one of the link parameters of this module, or a text parameter of
    /// another name.
    ///
    /// # Errors
    ///
    /// Returns error if `name` is registered with another type, or if `value` would not read
    /// back unchanged from the link text.
    pub fn with<T: ParameterType>(
        &self,
        name: &ParameterName<T>,
        value: T,
    ) -> Result<Self, GrammarError> {
        let (name, value) = PARAMS.admit(Self::KIND, name, value)?;
        Ok(Self {
            target: self.target.clone(),
            params: self.params.with_value(name, value),
        })
    }

    /// Returns this link with relation types `relations`.
    ///
    /// # Errors
    ///
    /// Returns error if `relations` is empty.
    pub fn with_rel(&self, relations: Vec<LinkRelation>) -> Result<Self, GrammarError> {
        self.with(&REL, relations)
    }
}

impl FieldValue for Link {
    const KIND: &'static str = "link";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        cursor.expect('<')?;
        let target = cursor.take_while(|ch| matches::ascii(ch, matches::is_uri));
        cursor.expect('>')?;
        let params = parse_parameters(cursor, &PARAMS)?;
        Ok(Self { target: target.to_owned(), params })
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.target);
        out.push('>');
        self.params.write_spaced(out);
    }
}

field_value!(Link, list);

#[cfg(test)]
mod test {
    use super::*;
    use crate::convert::{Charset, IntegerConverter, Quality};
    use crate::value::{CHARSET, Q};

    #[test]
    fn relation_forms() {
        let next = LinkRelation::parse("Next").unwrap();
        assert_eq!(next, LinkRelation::NEXT);
        assert!(!next.is_uri());

        let uri = LinkRelation::parse("http://example.com/Rel").unwrap();
        assert!(uri.is_uri());
        assert_ne!(uri, LinkRelation::parse("http://example.com/rel").unwrap());
        assert_eq!(uri.format(), "http://example.com/Rel");

        let err = LinkRelation::parse("ne_xt").unwrap_err();
        assert_eq!(err.found(), Some('_'));
        assert_eq!(err.position(), 2);

        let err = LinkRelation::parse("1http:x").unwrap_err();
        assert_eq!(err.position(), 0);

        assert_eq!(LinkRelation::new("next").unwrap(), LinkRelation::NEXT);
        assert_eq!(LinkRelation::new("ne_xt").unwrap_err().position(), 2);
        let err = LinkRelation::new("urn:a b").unwrap_err();
        assert_eq!(err.found(), Some('b'));
        assert_eq!(err.position(), 6);
    }

    #[test]
    fn relations_converter() {
        assert_eq!(RelationsConverter.parse("next").unwrap(), [LinkRelation::NEXT]);
        assert_eq!(
            RelationsConverter.parse("\" prev  next \"").unwrap(),
            [LinkRelation::PREV, LinkRelation::NEXT]
        );
        assert_eq!(RelationsConverter.to_text(&vec![LinkRelation::NEXT]), "next");
        assert_eq!(
            RelationsConverter.to_text(&vec![LinkRelation::PREV, LinkRelation::NEXT]),
            "\"prev next\""
        );

        let uri = vec![LinkRelation::parse("urn:x").unwrap()];
        assert_eq!(RelationsConverter.to_text(&uri), "\"urn:x\"");

        assert_eq!(RelationsConverter.parse("\" \"").unwrap_err().reason(), Reason::Empty);
        assert_eq!(RelationsConverter.parse("\"a b_\"").unwrap_err().position(), 4);
    }

    #[test]
    fn parse_link() {
        let link = Link::parse(
            "<https://example.com/2>; rel=\"next last\"; title*=UTF-8'de'n%c3%a4chstes; hreflang=de",
        )
        .unwrap();
        assert_eq!(link.target(), "https://example.com/2");
        assert!(link.has_rel(&LinkRelation::NEXT));
        assert_eq!(link.rel().len(), 2);
        assert_eq!(link.title(), Some("nächstes"));
        assert_eq!(link.hreflang().map(LanguageTag::tag), Some("de"));
        assert_eq!(
            link.format(),
            "<https://example.com/2>; rel=\"next last\"; title*=UTF-8'de'n%C3%A4chstes; hreflang=de"
        );

        let links = Link::parse_list("</a>; rel=prev, </b>; rel=next; type=\"text/html\"").unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].media_type().map(MediaRange::subtype), Some("html"));
    }

    #[test]
    fn build_link() {
        let link = Link::new("/style.css")
            .unwrap()
            .with_rel(vec![LinkRelation::STYLESHEET])
            .unwrap()
            .with(&TITLE, "Main style".to_owned())
            .unwrap();
        assert_eq!(link.format(), "</style.css>; rel=stylesheet; title=\"Main style\"");

        assert!(Link::new("/a b").is_err());
        assert!(link.with_rel(vec![]).is_err());
    }

    #[test]
    fn with_keeps_round_trip() {
        let link = Link::new("/a").unwrap();

        let err = link.with(&Q, Quality::from_millis(500).unwrap()).unwrap_err();
        assert_eq!(err.kind(), Link::KIND);
        assert_eq!(err.reason(), Reason::Unexpected);
        assert!(link.with(&CHARSET, Charset::UTF_8).is_err());

        const LEVEL: ParameterName<u64> = ParameterName::new("level", &IntegerConverter);
        assert!(link.with(&LEVEL, 5).is_err());

        let weighted = LanguageTag::parse("en;q=0.5").unwrap();
        assert!(link.with(&HREFLANG, weighted.clone()).is_err());
        let link = link.with(&HREFLANG, weighted.without_params()).unwrap();
        assert_eq!(link.format(), "</a>; hreflang=en");
        assert_eq!(Link::parse(&link.format()).unwrap(), link);

        const NOTE: ParameterName<String> = ParameterName::new("Note", &TextConverter);
        let noted = link.with(&NOTE, "x y".to_owned()).unwrap();
        assert_eq!(noted.format(), "</a>; hreflang=en; Note=\"x y\"");
        assert_eq!(Link::parse(&noted.format()).unwrap(), noted);
    }
}
