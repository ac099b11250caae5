use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::hash::{BuildHasher, Hash, RandomState};

use headval::convert::{Charset, ExtValue, Quality, TextConverter};
use headval::value::{
    ANCHOR, CHARSET, CacheDirective, ContentDisposition, Cookie, EntityTag, Filename, HREFLANG,
    LanguageTag, Link, LinkRelation, MediaRange, Q, TITLE, TITLE_EXT, TYPE, Token,
};
use headval::{GrammarError, HeaderName, HeaderValue, ParameterName};
use proptest::prelude::*;

const NOTE: ParameterName<String> = ParameterName::new("note", &TextConverter);

const TOKEN: &str = "[A-Za-z0-9!#$%&'*+.^_`|~-]{1,12}";

fn token() -> impl Strategy<Value = String> {
    proptest::string::string_regex(TOKEN).expect("token regex")
}

/// Any visible text, separators and spaces included.
fn text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ -~\u{e0}-\u{ff}]{0,16}").expect("text regex")
}

fn quality() -> impl Strategy<Value = Quality> {
    (0u16..=1000).prop_map(|millis| Quality::from_millis(millis).expect("in range"))
}

fn field_names() -> impl Strategy<Value = Vec<HeaderName>> {
    prop::collection::vec(token(), 0..4).prop_map(|names| {
        names.iter().map(|name| HeaderName::new(name).expect("token")).collect()
    })
}

fn directive() -> impl Strategy<Value = HeaderValue> {
    prop_oneof![
        any::<u64>().prop_map(CacheDirective::max_age),
        any::<u64>().prop_map(CacheDirective::s_maxage),
        any::<Option<u64>>().prop_map(CacheDirective::max_stale),
        any::<u64>().prop_map(CacheDirective::stale_if_error),
        field_names().prop_map(CacheDirective::no_cache),
        field_names().prop_map(CacheDirective::private),
        Just(CacheDirective::no_store()),
        Just(CacheDirective::immutable()),
        ("x-[a-z]{1,8}", prop::option::of(text())).prop_map(|(name, value)| {
            CacheDirective::extension(&name, value.as_deref()).expect("extension")
        }),
    ]
    .prop_map(HeaderValue::from)
}

fn entity_tag() -> impl Strategy<Value = HeaderValue> {
    let opaque = "[!#-~]{0,12}";
    prop_oneof![
        1 => Just(EntityTag::WILDCARD),
        4 => opaque.prop_map(|opaque| EntityTag::strong(&opaque).expect("etagc")),
        4 => opaque.prop_map(|opaque| EntityTag::weak(&opaque).expect("etagc")),
    ]
    .prop_map(HeaderValue::from)
}

fn language_tag() -> impl Strategy<Value = HeaderValue> {
    let tag = prop_oneof![
        1 => Just("*".to_owned()),
        8 => "[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8}){0,3}",
    ];
    (tag, prop::option::of(quality()))
        .prop_map(|(tag, q)| {
            let tag = LanguageTag::new(&tag).expect("language tag");
            match q {
                Some(q) => tag.with_quality(q),
                None => tag,
            }
        })
        .prop_map(HeaderValue::from)
}

fn link_relation() -> impl Strategy<Value = HeaderValue> {
    prop_oneof![
        "[a-z][a-z0-9.-]{0,12}",
        "(https|urn):[A-Za-z0-9/._~:-]{1,16}",
    ]
    .prop_map(|text| LinkRelation::parse(&text).expect("relation"))
    .prop_map(HeaderValue::from)
}

fn cookie() -> impl Strategy<Value = HeaderValue> {
    (token(), "[!-:<-~]([ -:<-~]{0,14}[!-:<-~])?")
        .prop_map(|(name, value)| Cookie::new(&name, &value).expect("cookie"))
        .prop_map(HeaderValue::from)
}

fn filename() -> impl Strategy<Value = HeaderValue> {
    prop_oneof![
        text().prop_map(|name| Filename::plain(&name).expect("plain")),
        "\\PC{0,12}".prop_map(|name| Filename::utf8(&name)),
    ]
    .prop_map(HeaderValue::from)
}

fn token_value() -> impl Strategy<Value = HeaderValue> {
    let params = prop::collection::btree_map("[a-z][a-z0-9-]{0,6}", text(), 0..4);
    (text(), params)
        .prop_map(|(text, params): (String, BTreeMap<String, String>)| {
            params.iter().fold(Token::new(&text).expect("text"), |token, (name, value)| {
                token.with_param(name, value).expect("parameter")
            })
        })
        .prop_map(HeaderValue::from)
}

fn charset() -> impl Strategy<Value = Charset> {
    "[A-Za-z0-9!#$%&+^_`{}~-]{1,10}".prop_map(|name| Charset::new(&name).expect("mime-charset"))
}

fn media_range() -> impl Strategy<Value = MediaRange> {
    let name = || "[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]{0,10}";
    let range = prop_oneof![
        1 => Just(("*".to_owned(), "*".to_owned())),
        1 => name().prop_map(|ty| (ty, "*".to_owned())),
        6 => (name(), name()),
    ];
    (range, prop::option::of(quality()), prop::option::of(charset())).prop_map(
        |((ty, subtype), q, charset)| {
            let range = MediaRange::new(&ty, &subtype).expect("media range");
            let range = match q {
                Some(q) => range.with_quality(q),
                None => range,
            };
            match charset {
                Some(charset) => range.with_charset(charset),
                None => range,
            }
        },
    )
}

fn relations() -> impl Strategy<Value = Vec<LinkRelation>> {
    let relation = prop_oneof![
        "[a-z][a-z0-9.-]{0,12}",
        "(https|urn):[A-Za-z0-9/._~:-]{1,16}",
    ];
    prop::collection::vec(relation, 1..4).prop_map(|relations| {
        relations.iter().map(|text| LinkRelation::new(text).expect("relation")).collect()
    })
}

#[derive(Clone, Debug)]
enum LinkParam {
    Rel(Vec<LinkRelation>),
    Anchor(String),
    Hreflang(LanguageTag),
    Title(String),
    TitleExt(ExtValue),
    Type(MediaRange),
    Note(String),
}

fn link_param() -> impl Strategy<Value = LinkParam> {
    prop_oneof![
        relations().prop_map(LinkParam::Rel),
        text().prop_map(LinkParam::Anchor),
        "[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8}){0,2}"
            .prop_map(|tag| LinkParam::Hreflang(LanguageTag::new(&tag).expect("language tag"))),
        text().prop_map(LinkParam::Title),
        "\\PC{0,12}".prop_map(|title| LinkParam::TitleExt(ExtValue::utf8(title))),
        media_range().prop_map(LinkParam::Type),
        text().prop_map(LinkParam::Note),
    ]
}

fn link() -> impl Strategy<Value = Link> {
    ("[A-Za-z0-9/._~:?#=&;,-]{0,16}", prop::collection::vec(link_param(), 0..5)).prop_map(
        |(target, params)| {
            let link = Link::new(&target).expect("uri reference");
            params.into_iter().fold(link, |link, param| {
                match param {
                    LinkParam::Rel(rel) => link.with_rel(rel),
                    LinkParam::Anchor(anchor) => link.with(&ANCHOR, anchor),
                    LinkParam::Hreflang(tag) => link.with(&HREFLANG, tag),
                    LinkParam::Title(title) => link.with(&TITLE, title),
                    LinkParam::TitleExt(title) => link.with(&TITLE_EXT, title),
                    LinkParam::Type(range) => link.with(&TYPE, range),
                    LinkParam::Note(note) => link.with(&NOTE, note),
                }
                .expect("link parameter")
            })
        },
    )
}

fn disposition() -> impl Strategy<Value = ContentDisposition> {
    let base = prop_oneof![
        Just(ContentDisposition::inline()),
        Just(ContentDisposition::attachment()),
        token().prop_map(|ty| ContentDisposition::new(&ty).expect("token")),
    ];
    let filename = prop_oneof![
        text().prop_map(|name| Filename::plain(&name).expect("plain")),
        "\\PC{0,12}".prop_map(|name| Filename::utf8(&name)),
        "[ -~\u{a0}-\u{ff}]{0,12}".prop_map(|name| {
            let ext = ExtValue::new(Charset::ISO_8859_1, Some("fr"), name).expect("latin-1");
            Filename::encoded(ext)
        }),
    ];
    (
        base,
        prop::collection::vec(filename, 0..3),
        prop::option::of(text()),
    )
        .prop_map(|(base, filenames, name)| {
            let disposition = filenames.into_iter().fold(base, |d, f| d.with_filename(f));
            match name {
                Some(name) => disposition.with_name(&name).expect("text"),
                None => disposition,
            }
        })
}

/// Format `value`, parse the text back and check that both are the same value.
fn check_round_trip<T>(
    value: &T,
    parse: impl Fn(&str) -> Result<T, GrammarError>,
) -> Result<(), TestCaseError>
where
    T: Display + Debug + PartialEq + Hash,
{
    let text = value.to_string();
    let parsed = parse(&text);
    prop_assert_eq!(parsed.as_ref(), Ok(value), "text: {:?}", text);

    let hasher = RandomState::new();
    if let Ok(parsed) = parsed {
        prop_assert_eq!(hasher.hash_one(&parsed), hasher.hash_one(value));
        prop_assert_eq!(parsed.to_string(), text);
    }
    Ok(())
}

fn round_trip(value: HeaderValue) -> Result<(), TestCaseError> {
    check_round_trip(&value, |text| HeaderValue::parse(value.kind(), text))
}

proptest! {
    #[test]
    fn directive_round_trip(value in directive()) {
        round_trip(value)?;
    }

    #[test]
    fn entity_tag_round_trip(value in entity_tag()) {
        round_trip(value)?;
    }

    #[test]
    fn language_tag_round_trip(value in language_tag()) {
        round_trip(value)?;
    }

    #[test]
    fn link_relation_round_trip(value in link_relation()) {
        round_trip(value)?;
    }

    #[test]
    fn cookie_round_trip(value in cookie()) {
        round_trip(value)?;
    }

    #[test]
    fn filename_round_trip(value in filename()) {
        round_trip(value)?;
    }

    #[test]
    fn token_round_trip(value in token_value()) {
        round_trip(value)?;
    }

    #[test]
    fn header_name_ignores_case(name in token()) {
        let hasher = RandomState::new();
        let lower = HeaderName::new(name.to_ascii_lowercase()).expect("token");
        let upper = HeaderName::new(name.to_ascii_uppercase()).expect("token");
        let name = HeaderName::new(&name).expect("token");
        prop_assert_eq!(&name, &lower);
        prop_assert_eq!(&name, &upper);
        prop_assert_eq!(hasher.hash_one(&name), hasher.hash_one(&lower));
        prop_assert_eq!(hasher.hash_one(&name), hasher.hash_one(&upper));
        prop_assert_eq!(name.cmp(&upper), std::cmp::Ordering::Equal);
    }

    #[test]
    fn format_is_deterministic(value in token_value()) {
        prop_assert_eq!(value.format(), value.clone().format());
    }

    #[test]
    fn media_range_round_trip(value in media_range()) {
        check_round_trip(&value, MediaRange::parse)?;
    }

    #[test]
    fn link_round_trip(value in link()) {
        check_round_trip(&value, Link::parse)?;
    }

    #[test]
    fn disposition_round_trip(value in disposition()) {
        check_round_trip(&value, ContentDisposition::parse)?;
    }

    #[test]
    fn link_rejects_foreign_parameters(value in link(), q in quality(), charset in charset()) {
        prop_assert!(value.with(&Q, q).is_err());
        prop_assert!(value.with(&CHARSET, charset).is_err());
    }
}
