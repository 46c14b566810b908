use std::collections::HashMap;

use leon::Template;

use crate::error::Result;

pub fn get_template(command: &str) -> Result<Template<'_>> {
    Ok(Template::parse(command)?)
}

/// Escapes a value for use inside a PowerShell single-quoted string.
#[must_use]
pub fn quote_powershell(value: &str) -> String {
    value.replace('\'', "''")
}

/// Renders `command` with every context value escaped for single-quoted PowerShell.
pub fn interpolate_command(context: &HashMap<String, String>, command: &str) -> Result<String> {
    let template = get_template(command)?;

    let escaped: HashMap<&str, String> = context
        .iter()
        .map(|(key, value)| (key.as_str(), quote_powershell(value)))
        .collect();

    Ok(template.render(&escaped)?)
}
