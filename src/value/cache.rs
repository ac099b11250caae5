use crate::convert::{Converter, IntegerConverter, TextConverter};
use crate::error::{GrammarError, Reason};
use crate::log::trace;
use crate::name::{HeaderName, Name};
use crate::parser::{Cursor, FieldValue, field_value, grammar};

/// Argument of a [`CacheDirective`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Argument {
    /// No argument.
    None,
    /// `delta-seconds`
    Seconds(u64),
    /// Quoted list of field names, as in `no-cache="set-cookie"`.
    Fields(Vec<HeaderName>),
    /// Argument of an extension directive.
    Text(String),
}

/// How a registered directive takes its argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    Flag,
    Seconds,
    OptionalSeconds,
    OptionalFields,
}

macro_rules! vocabulary {
    ($($id:ident = $name:literal, $rule:ident;)*) => {
        $(const $id: Name = Name::from_static($name);)*

        static VOCABULARY: [(Name, Rule); [$($name),*].len()] = [$(($id, Rule::$rule)),*];
    };
}

vocabulary! {
    MAX_AGE = "max-age", Seconds;
    S_MAXAGE = "s-maxage", Seconds;
    MAX_STALE = "max-stale", OptionalSeconds;
    MIN_FRESH = "min-fresh", Seconds;
    STALE_WHILE_REVALIDATE = "stale-while-revalidate", Seconds;
    STALE_IF_ERROR = "stale-if-error", Seconds;
    NO_CACHE = "no-cache", OptionalFields;
    PRIVATE = "private", OptionalFields;
    NO_STORE = "no-store", Flag;
    NO_TRANSFORM = "no-transform", Flag;
    ONLY_IF_CACHED = "only-if-cached", Flag;
    MUST_REVALIDATE = "must-revalidate", Flag;
    PROXY_REVALIDATE = "proxy-revalidate", Flag;
    MUST_UNDERSTAND = "must-understand", Flag;
    PUBLIC = "public", Flag;
    IMMUTABLE = "immutable", Flag;
}

fn lookup(name: &str) -> Option<&'static (Name, Rule)> {
    VOCABULARY.iter().find(|(known, _)| known.matches(name))
}

/// Cache-Control directive, e.g. `max-age=3600` or `no-cache`.
///
/// Registered directive names are matched case-insensitively and take their argument by a
/// fixed rule, unknown names are extension directives with an optional text argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheDirective {
    name: Name,
    argument: Argument,
}

impl CacheDirective {
    /// `max-age=seconds`
    pub fn max_age(seconds: u64) -> Self {
        Self::registered(MAX_AGE, Argument::Seconds(seconds))
    }

    /// `s-maxage=seconds`
    pub fn s_maxage(seconds: u64) -> Self {
        Self::registered(S_MAXAGE, Argument::Seconds(seconds))
    }

    /// `max-stale[=seconds]`
    pub fn max_stale(seconds: Option<u64>) -> Self {
        let argument = seconds.map_or(Argument::None, Argument::Seconds);
        Self::registered(MAX_STALE, argument)
    }

    /// `min-fresh=seconds`
    pub fn min_fresh(seconds: u64) -> Self {
        Self::registered(MIN_FRESH, Argument::Seconds(seconds))
    }

    /// `stale-while-revalidate=seconds`
    pub fn stale_while_revalidate(seconds: u64) -> Self {
        Self::registered(STALE_WHILE_REVALIDATE, Argument::Seconds(seconds))
    }

    /// `stale-if-error=seconds`
    pub fn stale_if_error(seconds: u64) -> Self {
        Self::registered(STALE_IF_ERROR, Argument::Seconds(seconds))
    }

    /// `no-cache`, or `no-cache="fields"` when `fields` is not empty.
    pub fn no_cache(fields: Vec<HeaderName>) -> Self {
        Self::registered(NO_CACHE, Self::fields(fields))
    }

    /// `private`, or `private="fields"` when `fields` is not empty.
    pub fn private(fields: Vec<HeaderName>) -> Self {
        Self::registered(PRIVATE, Self::fields(fields))
    }

    /// `no-store`
    pub fn no_store() -> Self {
        Self::registered(NO_STORE, Argument::None)
    }

    /// `no-transform`
    pub fn no_transform() -> Self {
        Self::registered(NO_TRANSFORM, Argument::None)
    }

    /// `only-if-cached`
    pub fn only_if_cached() -> Self {
        Self::registered(ONLY_IF_CACHED, Argument::None)
    }

    /// `must-revalidate`
    pub fn must_revalidate() -> Self {
        Self::registered(MUST_REVALIDATE, Argument::None)
    }

    /// `proxy-revalidate`
    pub fn proxy_revalidate() -> Self {
        Self::registered(PROXY_REVALIDATE, Argument::None)
    }

    /// `must-understand`
    pub fn must_understand() -> Self {
        Self::registered(MUST_UNDERSTAND, Argument::None)
    }

    /// `public`
    pub fn public() -> Self {
        Self::registered(PUBLIC, Argument::None)
    }

    /// `immutable`
    pub fn immutable() -> Self {
        Self::registered(IMMUTABLE, Argument::None)
    }

    /// Extension directive `name[=value]`.
    ///
    /// # Errors
    ///
    /// Returns error if `name` is not a token or is a registered directive, or if `value`
    /// contains control characters.
    pub fn extension(name: &str, value: Option<&str>) -> Result<Self, GrammarError> {
        let name = Name::new(name)?;
        if lookup(name.as_str()).is_some() {
            let found = name.as_str().chars().next();
            return Err(GrammarError::new(Self::KIND, Reason::Unexpected, found, 0));
        }
        let argument = match value {
            Some(value) => {
                grammar::validate_text(Self::KIND, value)?;
                Argument::Text(value.to_owned())
            }
            None => Argument::None,
        };
        Ok(Self { name, argument })
    }

    fn registered(name: Name, argument: Argument) -> Self {
        Self { name, argument }
    }

    fn fields(fields: Vec<HeaderName>) -> Argument {
        if fields.is_empty() { Argument::None } else { Argument::Fields(fields) }
    }

    /// Returns the directive name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the argument.
    #[inline]
    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    /// Returns the `delta-seconds` argument.
    pub fn delta_seconds(&self) -> Option<u64> {
        match self.argument {
            Argument::Seconds(seconds) => Some(seconds),
            _ => None,
        }
    }

    /// Returns the field names argument, empty if absent.
    pub fn field_names(&self) -> &[HeaderName] {
        match &self.argument {
            Argument::Fields(fields) => fields,
            _ => &[],
        }
    }

    /// Returns `true` if the directive is not registered.
    pub fn is_extension(&self) -> bool {
        lookup(self.name.as_str()).is_none()
    }
}

impl FieldValue for CacheDirective {
    const KIND: &'static str = "cache directive";

    fn parse_from(cursor: &mut Cursor<'_>) -> Result<Self, GrammarError> {
        let name = grammar::token(cursor)?;
        cursor.skip_whitespace();
        let eq = cursor.mark();
        let has_value = cursor.eat('=');

        let Some((name, rule)) = lookup(name) else {
            trace!("extension cache directive {name:?}");
            let argument = if has_value { scan_argument(cursor, text)? } else { Argument::None };
            return Ok(Self { name: Name::copy_from(name), argument });
        };

        let argument = match (*rule, has_value) {
            (Rule::Flag | Rule::OptionalSeconds | Rule::OptionalFields, false) => Argument::None,
            (Rule::Seconds, false) => return Err(cursor.error(Reason::MissingValue)),
            (Rule::Flag, true) => return Err(cursor.error_at(eq, Reason::Unexpected)),
            (Rule::Seconds | Rule::OptionalSeconds, true) => scan_argument(cursor, seconds)?,
            (Rule::OptionalFields, true) => scan_argument(cursor, field_names)?,
        };

        Ok(Self { name: name.clone(), argument })
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(self.name());
        match &self.argument {
            Argument::None => {}
            Argument::Seconds(seconds) => {
                out.push('=');
                IntegerConverter.format(seconds, out);
            }
            Argument::Fields(fields) => {
                let list = fields.iter().map(Name::as_str).collect::<Vec<_>>().join(", ");
                out.push('=');
                grammar::write_quoted(out, &list);
            }
            Argument::Text(text) => {
                out.push('=');
                grammar::write_token_or_quoted(out, text);
            }
        }
    }
}

field_value!(CacheDirective, list);

/// Scan the raw argument after `=` and convert it, errors are rebased onto the cursor.
fn scan_argument(
    cursor: &mut Cursor<'_>,
    convert: fn(&str) -> Result<Argument, GrammarError>,
) -> Result<Argument, GrammarError> {
    cursor.skip_whitespace();
    let mark = cursor.mark();
    let raw = grammar::raw_value(cursor)?;
    convert(raw).map_err(|err| cursor.rebase(mark, err))
}

fn seconds(raw: &str) -> Result<Argument, GrammarError> {
    IntegerConverter.parse(raw).map(Argument::Seconds)
}

/// `DQUOTE field-name *( OWS "," OWS field-name ) DQUOTE`, or a single bare field name.
fn field_names(raw: &str) -> Result<Argument, GrammarError> {
    let mut cursor = Cursor::new("field names", raw);
    if !cursor.eat('"') {
        return Ok(Argument::Fields(vec![Name::copy_from(grammar::token(&mut cursor)?)]));
    }
    let mut fields = Vec::new();
    loop {
        cursor.skip_whitespace();
        if cursor.eat('"') {
            break;
        }
        if !fields.is_empty() {
            cursor.expect(',')?;
            cursor.skip_whitespace();
        }
        fields.push(Name::copy_from(grammar::token(&mut cursor)?));
    }
    Ok(CacheDirective::fields(fields))
}

fn text(raw: &str) -> Result<Argument, GrammarError> {
    TextConverter.parse(raw).map(Argument::Text)
}
