use std::hash::{BuildHasher, RandomState};

use headval::value::{
    Argument, CacheDirective, Cookie, EntityTag, Filename, LanguageTag, Link, LinkRelation,
    MediaRange, Token, Validator, sort_by_quality,
};
use headval::{CookieName, HeaderName, HeaderValue, Reason, ValueKind};

#[test]
fn case_insensitive_names() {
    let hasher = RandomState::new();
    let names = ["content-type", "Content-Type", "CONTENT-TYPE"].map(|name| {
        HeaderName::new(name).unwrap()
    });
    for name in &names {
        assert_eq!(name, &names[0]);
        assert_eq!(hasher.hash_one(name), hasher.hash_one(&names[0]));
    }
    // spelling is kept
    assert_eq!(names[1].as_str(), "Content-Type");

    assert_ne!(CookieName::new("sid").unwrap(), CookieName::new("SID").unwrap());
}

#[test]
fn case_sensitive_content() {
    assert_ne!(Token::parse("\"abc\"").unwrap(), Token::parse("\"ABC\"").unwrap());

    // the parameter name matches in any casing, its value does not
    let lower = Token::parse("a;Title=abc").unwrap();
    let upper = Token::parse("a;title=ABC").unwrap();
    assert_eq!(lower.params().get_raw("TITLE"), lower.params().get_raw("title"));
    assert_ne!(lower, upper);
}

#[test]
fn wildcard_identity() {
    let concrete = EntityTag::parse("\"*\"").unwrap();
    assert_ne!(EntityTag::WILDCARD, concrete);
    assert_ne!(EntityTag::WILDCARD, EntityTag::weak("*").unwrap());
    assert_eq!(EntityTag::parse("*").unwrap(), EntityTag::WILDCARD);
    assert_eq!(EntityTag::WILDCARD.validator(), None);
    assert_eq!(concrete.validator(), Some(Validator::Strong));
}

#[test]
fn parameter_order() {
    let text = "text/html;level=1;q=0.5;charset=utf-8";
    let range = MediaRange::parse(text).unwrap();
    assert_eq!(range.format(), text);
    assert_eq!(range.format(), range.format());

    let names: Vec<_> = range.params().iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["level", "q", "charset"]);

    // reordered parameters are the same value
    assert_eq!(range, MediaRange::parse("text/html;charset=UTF-8;level=1;q=0.5").unwrap());
}

#[test]
fn quality_sort() {
    let mut tags = LanguageTag::parse_list("en;q=0.5, fr;q=0.9, de;q=0.9").unwrap();
    sort_by_quality(&mut tags);
    let tags: Vec<_> = tags.iter().map(LanguageTag::tag).collect();
    assert_eq!(tags, ["fr", "de", "en"]);

    let err = LanguageTag::parse("en;q=1.001").unwrap_err();
    assert_eq!(err.reason(), Reason::OutOfRange);
}

#[test]
fn unterminated_quote_position() {
    let err = EntityTag::parse("\"abc").unwrap_err();
    assert_eq!(err.kind(), "entity tag");
    assert_eq!(err.reason(), Reason::UnterminatedQuote);
    assert_eq!(err.found(), None);
    assert_eq!(err.position(), 4);
    assert_eq!(
        err.to_string(),
        "invalid entity tag: unterminated quoted string, found end of text at position 4"
    );
}

#[test]
fn directive_parameter_typing() {
    let directive = CacheDirective::parse("max-age=3600").unwrap();
    assert_eq!(directive.argument(), &Argument::Seconds(3600));

    let err = CacheDirective::parse("max-age=abc").unwrap_err();
    assert_eq!(err.reason(), Reason::Unexpected);
    assert_eq!(err.found(), Some('a'));
    assert_eq!(err.position(), 8);

    assert_eq!(CacheDirective::parse("max-age").unwrap_err().reason(), Reason::MissingValue);
    assert!(CacheDirective::parse("no-store=1").is_err());

    let extension = CacheDirective::parse("community=\"UCI\"").unwrap();
    assert!(extension.is_extension());
    assert_eq!(extension.argument(), &Argument::Text("UCI".into()));
}

#[test]
fn duplicate_parameter() {
    let err = LanguageTag::parse("a;q=0.1;q=0.2").unwrap_err();
    assert_eq!(err.reason(), Reason::DuplicateParameter);
    assert_eq!(err.position(), 8);

    let err = HeaderValue::parse(ValueKind::Token, "a;x=1;X=2").unwrap_err();
    assert_eq!(err.reason(), Reason::DuplicateParameter);
}

#[test]
fn functional_update() {
    let tag = LanguageTag::parse("en;q=0.5").unwrap();
    let updated = tag.with_quality(Default::default());
    assert_eq!(tag.format(), "en;q=0.5");
    assert_eq!(updated.format(), "en;q=1");

    let link = Link::parse("<https://example.com/>").unwrap();
    let next = link.with_rel(vec![LinkRelation::NEXT]).unwrap();
    assert!(link.rel().is_empty());
    assert!(next.has_rel(&LinkRelation::parse("NEXT").unwrap()));
    assert_eq!(next.format(), "<https://example.com/>; rel=next");

    let cookie = Cookie::new("sid", "1").unwrap();
    assert_eq!(cookie.with_value("2").unwrap().format(), "sid=2");
    assert_eq!(cookie.format(), "sid=1");
}

#[test]
fn filename_forms() {
    let plain = Filename::parse("\"\u{e9}t\u{e9}.txt\"").unwrap();
    let encoded = Filename::parse("UTF-8''%C3%A9t%C3%A9.txt").unwrap();
    assert_eq!(plain, encoded);
    assert!(encoded.is_encoded());

    let latin = Filename::parse("iso-8859-1'fr'%E9t%E9.txt").unwrap();
    assert_eq!(latin, plain);
    assert_eq!(latin.format(), "iso-8859-1'fr'%E9t%E9.txt");

    let err = Filename::parse("koi8-r''%C1").unwrap_err();
    assert_eq!(err.reason(), Reason::Undecodable);
}

#[test]
fn no_partial_values() {
    // an error anywhere rejects the whole list
    assert!(EntityTag::parse_list("\"a\", \"b").is_err());
    assert!(Link::parse_list("<a>; rel=next, <b>; rel=").is_err());
    assert!(Cookie::parse_list("a=1; b").is_err());
}
