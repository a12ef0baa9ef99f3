use scaffold_core::ScaffoldError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::filter::AssociationMap;

pub fn render_template(
    template: &str,
    context: &HashMap<&str, String>,
) -> Result<String, ScaffoldError> {
    let mut result = template.to_string();

    for (key, value) in context {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    if let Some(start) = result.find("{{") {
        let rest = &result[start..];
        let end = rest.find("}}").map(|i| i + 2).unwrap_or(rest.len());
        return Err(ScaffoldError::template(format!(
            "Unresolved placeholder {}",
            &rest[..end]
        )));
    }

    Ok(result)
}

/// Associations a generated controller loads alongside its records
pub static CONTAIN_TEMPLATE: &str = r#"// Associations loaded with {{table}} records
pub const {{const_name}}: &[&str] = &[{{contain}}];
"#;

/// Render the contain list of a table: every kept association name, quoted,
/// in association map order.
pub fn render_controller_contain(
    table: &str,
    map: &AssociationMap,
) -> Result<String, ScaffoldError> {
    let contain = map
        .iter()
        .map(|(_, name, _)| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut context = HashMap::new();
    context.insert("table", table.to_string());
    context.insert(
        "const_name",
        format!(
            "{}_CONTAIN",
            scaffold_core::inflector::underscore(table).to_uppercase()
        ),
    );
    context.insert("contain", contain);

    render_template(CONTAIN_TEMPLATE, &context)
}

/// Serialization format of a rendered association map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ScaffoldError::configuration(format!(
                "Unknown output format '{}', expected yaml or json",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialize an association map for template consumption
pub fn render_association_map(
    map: &AssociationMap,
    format: OutputFormat,
) -> Result<String, ScaffoldError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(map)?),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(map)?;
            json.push('\n');
            Ok(json)
        }
    }
}
