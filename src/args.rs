use std::collections::HashMap;

/// The resolved name/value mapping passed into a script invocation.
pub type ParameterMap = HashMap<String, String>;

/// Splits raw `name=value` entries into a parameter map.
///
/// Each entry is split on the first `=` only, so values may themselves
/// contain `=`. Names and values are trimmed. An entry without a `=` is
/// dropped without an error, and a later duplicate name overwrites an
/// earlier one.
pub fn parse_parameters<S: AsRef<str>>(raw: &[S]) -> ParameterMap {
    let mut parameters = ParameterMap::new();

    for entry in raw {
        if let Some((name, value)) = entry.as_ref().split_once('=') {
            parameters.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    parameters
}
