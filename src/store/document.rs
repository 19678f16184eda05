use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::domain::FieldDefinition;

/// Supported formats for schema documents on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}

impl DocumentFormat {
    /// Picks a format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            #[cfg(feature = "toml")]
            "toml" => Ok(DocumentFormat::Toml),
            other if other.is_empty() => {
                bail!("cannot infer document format for '{}'", path.display())
            }
            other => bail!("unsupported document format '{other}'"),
        }
    }
}

/// Parses a schema document into an ordered field list.
///
/// Deserialize-then-validate: the serde pass rejects structurally bad
/// documents, then the list is sorted by `order` ascending so downstream code
/// never re-sorts. TOML has no top-level arrays, so its documents wrap the
/// list in a `fields` table key; JSON and YAML are plain arrays.
pub fn parse_fields_str(contents: &str, format: DocumentFormat) -> Result<Vec<FieldDefinition>> {
    let mut fields: Vec<FieldDefinition> = match format {
        DocumentFormat::Json => {
            serde_json::from_str(contents).context("failed to parse JSON schema document")?
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str(contents).context("failed to parse YAML schema document")?
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            let wrapper: FieldsWrapper =
                toml::from_str(contents).context("failed to parse TOML schema document")?;
            wrapper.fields
        }
    };
    fields.sort_by_key(|field| field.order);
    Ok(fields)
}

/// Serializes a field list back to document text in the given format.
pub fn fields_to_string(fields: &[FieldDefinition], format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Json => {
            serde_json::to_string_pretty(fields).context("failed to serialize schema to JSON")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::to_string(fields).context("failed to serialize schema to YAML")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string_pretty(&FieldsWrapper {
            fields: fields.to_vec(),
        })
        .context("failed to serialize schema to TOML"),
    }
}

#[cfg(feature = "toml")]
#[derive(serde::Serialize, serde::Deserialize)]
struct FieldsWrapper {
    fields: Vec<FieldDefinition>,
}
