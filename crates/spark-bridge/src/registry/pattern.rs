//! Compilation of Cucumber expressions to anchored regular expressions.

use regex::Regex;

use crate::RegistryError;

/// Regex fragment for a built-in parameter type, or `None` if unknown.
fn parameter_regex(name: &str) -> Option<&'static str> {
    match name {
        "string" => Some(r#""([^"]*)""#),
        "int" => Some(r"(-?\d+)"),
        "float" => Some(r"(-?\d+(?:\.\d+)?)"),
        "word" => Some(r"(\S+)"),
        "" => Some(r"(.*)"),
        _ => None,
    }
}

/// Compile `pattern` into a regex matching whole step texts.
///
/// Literal text is escaped; `{string}`, `{int}`, `{float}`, `{word}` and
/// `{}` become capture groups.
pub(crate) fn compile(pattern: &str) -> Result<Regex, RegistryError> {
    let mut source = String::from("^");
    let mut rest = pattern;
    while let Some((literal, after)) = rest.split_once('{') {
        source.push_str(&regex::escape(literal));
        let (name, tail) = after
            .split_once('}')
            .ok_or_else(|| RegistryError::UnterminatedParameter(pattern.to_owned()))?;
        let fragment =
            parameter_regex(name.trim()).ok_or_else(|| RegistryError::UnknownParameterType {
                name: name.to_owned(),
                pattern: pattern.to_owned(),
            })?;
        source.push_str(fragment);
        rest = tail;
    }
    source.push_str(&regex::escape(rest));
    source.push('$');
    Regex::new(&source).map_err(|source| RegistryError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}
