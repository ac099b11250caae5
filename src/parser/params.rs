use indexmap::IndexMap;

use super::{Cursor, grammar};
use crate::convert::{Converter, ParameterValue, TextConverter};
use crate::error::{GrammarError, Reason};
use crate::name::Name;
use crate::param::{ParameterSet, Parameters};

/// Parse `*( OWS ";" OWS name OWS "=" OWS value )` after a primary value.
///
/// Every value is converted by the converter bound to its name in `set`. Names absent from
/// `set` are rejected unless the set accepts extension parameters, which convert as text.
/// Repeating a name, in any casing, is an error.
///
/// On success the cursor is left at the first character that does not belong to the list,
/// trailing whitespace skipped.
pub fn parse_parameters(
    cursor: &mut Cursor<'_>,
    set: &ParameterSet,
) -> Result<Parameters, GrammarError> {
    let mut entries = IndexMap::new();

    loop {
        cursor.skip_whitespace();
        if !cursor.eat(';') {
            break;
        }
        cursor.skip_whitespace();

        let name_mark = cursor.mark();
        let name = grammar::token(cursor)?;
        let def = set.lookup(name);
        let key = match def {
            Some(def) => def.name().clone(),
            None if set.accepts_extension() => Name::copy_from(name),
            None => return Err(cursor.error_at(name_mark, Reason::UnknownParameter)),
        };
        if entries.contains_key(&key) {
            return Err(cursor.error_at(name_mark, Reason::DuplicateParameter));
        }

        cursor.skip_whitespace();
        cursor.expect('=')?;
        cursor.skip_whitespace();

        let value_mark = cursor.mark();
        let raw = grammar::raw_value(cursor)?;
        let value = match def {
            Some(def) => def.convert(raw),
            None => TextConverter.parse(raw).map(ParameterValue::Text),
        };
        let value = value.map_err(|err| cursor.rebase(value_mark, err))?;

        entries.insert(key, value);
    }

    Ok(Parameters::from_map(entries))
}
