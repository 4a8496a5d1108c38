use regex::Regex;
use serde::{Deserialize, Serialize};

/// Colour code that ioquake3 appends to cvar values when printing them.
const COLOR_RESET: &str = "^7";

/// A console variable as printed by the server when queried over rcon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableValue {
    /// Name of the variable.
    pub name: String,

    /// Current value.
    pub value: String,

    /// The compiled-in default, unless the server said the variable is
    /// already at its default.
    pub default: Option<String>,
}

impl VariableValue {
    /// Is the variable at its default value?
    pub fn is_default(&self) -> bool {
        self.default.as_ref().map_or(true, |default| *default == self.value)
    }
}

/// Find the value of `name` in the output of an rcon command.
///
/// The server prints a variable in one of these forms:
///
/// ```text
/// "sv_hostname" is:"my server^7", the default
/// "g_gravity" is:"900^7" default:"800^7"
/// ```
///
/// The first form is tried first. When it matches and the output does not end
/// right at its closing quote, `default` is set to the value itself. A
/// trailing `^7` is stripped from both values. Returns `None` when neither
/// form is found.
pub fn parse_variable(name: &str, response: &str) -> Option<VariableValue> {
    let name_pattern = regex::escape(name);

    let default_form = Regex::new(&format!(
        r#"(?mR)"{name_pattern}" is:"([^"]*?)"(?:$|, the default)"#
    ))
    .ok()?;

    if let Some(caps) = default_form.captures(response) {
        let value = clean(&caps[1]);
        let default = (!response.ends_with('"')).then(|| value.clone());

        return Some(VariableValue {
            name: name.to_string(),
            value,
            default,
        });
    }

    let custom_form = Regex::new(&format!(
        r#""{name_pattern}" is:"([^"]*?)" default:"([^"]*?)""#
    ))
    .ok()?;

    let caps = custom_form.captures(response)?;

    Some(VariableValue {
        name: name.to_string(),
        value: clean(&caps[1]),
        default: Some(clean(&caps[2])),
    })
}

fn clean(value: &str) -> String {
    value.strip_suffix(COLOR_RESET).unwrap_or(value).to_string()
}
