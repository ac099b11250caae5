//! Typed parameter names and the parameter mapping.
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;

use fnv::FnvBuildHasher;
use indexmap::IndexMap;

use crate::convert::{Converter, ParameterType, ParameterValue, TextConverter};
use crate::error::{GrammarError, Reason};
use crate::name::Name;
use crate::parser::grammar;

/// A parameter name bound to the converter of its value type.
///
/// ```
/// use headval::{ParameterName, convert::IntegerConverter};
///
/// const LEVEL: ParameterName<u64> = ParameterName::new("level", &IntegerConverter);
/// assert_eq!(LEVEL.name(), "LEVEL");
/// ```
pub struct ParameterName<T: 'static> {
    name: Name,
    converter: &'static dyn Converter<Value = T>,
}

impl<T: ParameterType> ParameterName<T> {
    /// Bind `name` to `converter`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid token.
    pub const fn new(name: &'static str, converter: &'static dyn Converter<Value = T>) -> Self {
        Self { name: Name::from_static(name), converter }
    }

    /// Returns the parameter name.
    #[inline]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the converter of the parameter value.
    #[inline]
    pub fn converter(&self) -> &'static dyn Converter<Value = T> {
        self.converter
    }
}

impl<T: 'static> Clone for ParameterName<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            converter: self.converter,
        }
    }
}

impl<T: 'static> std::fmt::Debug for ParameterName<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterName")
            .field("name", &self.name)
            .field("kind", &self.converter.kind())
            .finish()
    }
}

/// A parameter name with its value type erased, as registered in a [`ParameterSet`].
pub trait ParameterDef: Send + Sync {
    /// Returns the parameter name.
    fn name(&self) -> &Name;

    /// Convert the raw wire text of a value.
    fn convert(&self, raw: &str) -> Result<ParameterValue, GrammarError>;
}

impl<T: ParameterType> ParameterDef for ParameterName<T> {
    #[inline]
    fn name(&self) -> &Name {
        &self.name
    }

    fn convert(&self, raw: &str) -> Result<ParameterValue, GrammarError> {
        self.converter.parse(raw).map(ParameterType::into_value)
    }
}

/// The parameters a grammar accepts.
#[derive(Clone, Copy)]
pub struct ParameterSet {
    known: &'static [&'static dyn ParameterDef],
    extension: bool,
}

impl ParameterSet {
    /// Accept only `known` parameters.
    pub const fn new(known: &'static [&'static dyn ParameterDef]) -> Self {
        Self { known, extension: false }
    }

    /// Accept `known` parameters, and any other name as a text extension parameter.
    pub const fn with_extension(known: &'static [&'static dyn ParameterDef]) -> Self {
        Self { known, extension: true }
    }

    /// Returns the registered parameter spelled `name`, in any casing.
    pub fn lookup(&self, name: &str) -> Option<&'static dyn ParameterDef> {
        self.known.iter().copied().find(|def| def.name().matches(name))
    }

    /// Returns `true` if unregistered names are accepted as text.
    #[inline]
    pub const fn accepts_extension(&self) -> bool {
        self.extension
    }

    /// Check that `value` set as parameter `name` parses back to itself under this set.
    ///
    /// Returns the entry to insert, keyed by the registered spelling of the name.
    pub(crate) fn admit<T: ParameterType>(
        &self,
        kind: &'static str,
        name: &ParameterName<T>,
        value: T,
    ) -> Result<(Name, ParameterValue), GrammarError> {
        value.validate()?;
        let value = value.into_value();
        let mut raw = String::new();
        value.format(&mut raw);

        let spelled = name.name().as_str();
        let (key, parsed) = match self.lookup(spelled) {
            Some(def) => (def.name().clone(), def.convert(&raw)),
            None if self.extension => {
                let parsed = TextConverter.parse(&raw).map(ParameterValue::Text);
                (name.name().clone(), parsed)
            }
            None => {
                let found = spelled.chars().next();
                return Err(GrammarError::new(kind, Reason::UnknownParameter, found, 0));
            }
        };

        match parsed {
            Ok(parsed) if parsed == value => Ok((key, value)),
            Ok(_) => Err(GrammarError::new(kind, Reason::Unexpected, raw.chars().next(), 0)),
            Err(err) => Err(err.rebase(kind, 0)),
        }
    }
}

impl std::fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSet")
            .field("known", &self.known.iter().map(|def| def.name()).collect::<Vec<_>>())
            .field("extension", &self.extension)
            .finish()
    }
}

/// Parameters of a header value.
///
/// Keys are unique case-insensitive names, kept in insertion order so formatting is
/// reproducible. Equality ignores order. The mapping is immutable and shared between the
/// values derived from it, `with` and `without` return a new mapping.
#[derive(Clone, Default)]
pub struct Parameters {
    entries: Arc<IndexMap<Name, ParameterValue>>,
}

impl Parameters {
    /// Create empty parameters.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(entries: IndexMap<Name, ParameterValue>) -> Self {
        Self { entries: Arc::new(entries) }
    }

    /// Returns the number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no parameters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the typed value of a registered parameter.
    pub fn get<T: ParameterType>(&self, name: &ParameterName<T>) -> Option<&T> {
        self.entries.get(&name.name).and_then(T::from_value)
    }

    /// Returns the value of any parameter, looked up case-insensitively.
    pub fn get_raw(&self, name: &str) -> Option<&ParameterValue> {
        self.entries.iter().find(|(key, _)| key.matches(name)).map(|(_, value)| value)
    }

    /// Returns `true` if a parameter named `name` is present, in any casing.
    pub fn contains(&self, name: &str) -> bool {
        self.get_raw(name).is_some()
    }

    /// Returns an iterator over parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &ParameterValue)> {
        self.entries.iter()
    }

    /// Returns parameters with `name` set to `value`.
    ///
    /// An existing parameter keeps its position.
    ///
    /// # Errors
    ///
    /// Returns error if `value` cannot be written as parameter text.
    pub fn with<T: ParameterType>(
        &self,
        name: &ParameterName<T>,
        value: T,
    ) -> Result<Self, GrammarError> {
        value.validate()?;
        Ok(self.with_value(name.name.clone(), value.into_value()))
    }

    /// Returns parameters with the extension parameter `name` set to text `value`.
    ///
    /// # Errors
    ///
    /// Returns error if `name` is not a token or `value` contains control characters.
    pub fn with_text(&self, name: &str, value: &str) -> Result<Self, GrammarError> {
        let name = Name::new(name)?;
        grammar::validate_text("text", value)?;
        Ok(self.with_value(name, ParameterValue::Text(value.to_owned())))
    }

    pub(crate) fn with_value(&self, name: Name, value: ParameterValue) -> Self {
        let mut entries = IndexMap::clone(&self.entries);
        entries.insert(name, value);
        Self::from_map(entries)
    }

    /// Returns parameters without `name`, the remaining order is kept.
    pub fn without(&self, name: &str) -> Self {
        match self.entries.iter().position(|(key, _)| key.matches(name)) {
            Some(index) => {
                let mut entries = IndexMap::clone(&self.entries);
                entries.shift_remove_index(index);
                Self::from_map(entries)
            }
            None => self.clone(),
        }
    }

    /// Write `;name=value` for each parameter.
    pub fn write_to(&self, out: &mut String) {
        self.write_with(out, ";");
    }

    /// Write `; name=value` for each parameter.
    pub fn write_spaced(&self, out: &mut String) {
        self.write_with(out, "; ");
    }

    fn write_with(&self, out: &mut String, separator: &str) {
        for (name, value) in self.entries.iter() {
            out.push_str(separator);
            out.push_str(name.as_str());
            out.push('=');
            value.format(out);
        }
    }
}

// ===== Traits =====

impl std::fmt::Debug for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl PartialEq for Parameters {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) || *self.entries == *other.entries
    }
}

impl Eq for Parameters {}

impl Hash for Parameters {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // order independent, consistent with `eq`
        let sum = self.entries.iter().fold(0u64, |sum, entry| {
            sum.wrapping_add(FnvBuildHasher::default().hash_one(entry))
        });
        state.write_usize(self.entries.len());
        state.write_u64(sum);
    }
}

#[cfg(test)]
mod test {
    use std::hash::RandomState;

    use super::*;
    use crate::convert::{IntegerConverter, Quality, QualityConverter};

    static Q: ParameterName<Quality> = ParameterName::new("q", &QualityConverter);
    const LEVEL: ParameterName<u64> = ParameterName::new("level", &IntegerConverter);

    #[test]
    fn functional_update() {
        let empty = Parameters::new();
        let one = empty.with(&LEVEL, 1).unwrap();
        let two = one.with(&Q, Quality::MIN).unwrap();

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);
        assert_eq!(two.get(&LEVEL), Some(&1));
        assert_eq!(two.get(&Q), Some(&Quality::MIN));
        assert!(two.contains("LEVEL"));

        let replaced = two.with(&LEVEL, 7).unwrap();
        let names: Vec<&str> = replaced.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["level", "q"]);
        assert_eq!(replaced.get(&LEVEL), Some(&7));
        assert_eq!(two.get(&LEVEL), Some(&1));

        let removed = replaced.without("Level");
        assert_eq!(removed.len(), 1);
        assert_eq!(removed.get(&LEVEL), None);
    }

    #[test]
    fn order_independent_identity() {
        let hasher = RandomState::new();
        let ab = Parameters::new().with(&LEVEL, 1).unwrap().with(&Q, Quality::MIN).unwrap();
        let ba = Parameters::new().with(&Q, Quality::MIN).unwrap().with(&LEVEL, 1).unwrap();

        assert_eq!(ab, ba);
        assert_eq!(hasher.hash_one(&ab), hasher.hash_one(&ba));

        let mut out = String::new();
        ab.write_to(&mut out);
        assert_eq!(out, ";level=1;q=0");

        let mut out = String::new();
        ba.write_spaced(&mut out);
        assert_eq!(out, "; q=0; level=1");
    }

    #[test]
    fn admit_reads_back() {
        static SET: ParameterSet = ParameterSet::new(&[&Q]);
        static OPEN: ParameterSet = ParameterSet::with_extension(&[&Q]);

        let (key, value) = SET.admit("test", &Q, Quality::MIN).unwrap();
        assert_eq!(key.as_str(), "q");
        assert_eq!(value, Quality::MIN.into_value());

        let err = SET.admit("test", &LEVEL, 5).unwrap_err();
        assert_eq!(err.reason(), Reason::UnknownParameter);
        assert_eq!(err.found(), Some('l'));

        // an extension parameter reads back as text, not as an integer
        let err = OPEN.admit("test", &LEVEL, 5).unwrap_err();
        assert_eq!(err.reason(), Reason::Unexpected);
        assert_eq!(err.found(), Some('5'));

        const TITLE: ParameterName<String> = ParameterName::new("title", &TextConverter);
        let (key, value) = OPEN.admit("test", &TITLE, "a b".to_owned()).unwrap();
        assert_eq!(key.as_str(), "title");
        assert_eq!(value, ParameterValue::Text("a b".into()));

        // registered under another type
        const NUMERIC_Q: ParameterName<u64> = ParameterName::new("Q", &IntegerConverter);
        let err = SET.admit("test", &NUMERIC_Q, 1).unwrap_err();
        assert_eq!(err.reason(), Reason::Unexpected);
        assert!(SET.admit("test", &NUMERIC_Q, 2).is_err());
    }

    #[test]
    fn text_values() {
        let params = Parameters::new().with_text("title", "a b").unwrap();
        let mut out = String::new();
        params.write_to(&mut out);
        assert_eq!(out, ";title=\"a b\"");

        assert!(params.with_text("bad name", "x").is_err());
        assert!(params.with_text("title", "line\nbreak").is_err());
        assert_eq!(params.get_raw("TITLE"), Some(&ParameterValue::Text("a b".into())));
    }
}
