use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::json;

use formdesk::{
    DocumentFormat, FieldDefinition, FormValues, SubmissionForm, audit_fields, parse_fields_str,
};

#[derive(Debug, Parser)]
#[command(
    name = "formdesk",
    version,
    about = "Inspect and simulate dynamic ticket-form schemas"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a schema document and report every problem found
    Check {
        /// Path to the schema document
        schema: PathBuf,
        /// Override the format inferred from the file extension
        #[arg(long = "format", value_name = "FORMAT")]
        format: Option<String>,
    },
    /// Show the visible fields and their resolved options for a value set
    Resolve {
        schema: PathBuf,
        /// JSON file mapping field names to entered values
        #[arg(long = "values", value_name = "FILE")]
        values: Option<PathBuf>,
        #[arg(long = "format", value_name = "FORMAT")]
        format: Option<String>,
    },
    /// Run a sequence of edits through the consistency engine
    Apply {
        schema: PathBuf,
        /// An edit to apply, in order; repeatable
        #[arg(long = "set", value_name = "NAME=VALUE")]
        sets: Vec<String>,
        #[arg(long = "format", value_name = "FORMAT")]
        format: Option<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Check { schema, format } => check(&schema, format.as_deref()),
        Command::Resolve {
            schema,
            values,
            format,
        } => resolve(&schema, values.as_deref(), format.as_deref()),
        Command::Apply {
            schema,
            sets,
            format,
        } => apply(&schema, &sets, format.as_deref()),
    }
}

fn check(schema: &Path, format: Option<&str>) -> Result<()> {
    let fields = load_fields(schema, format)?;
    let findings = audit_fields(&fields);
    for finding in &findings {
        eprintln!("problem: {finding}");
    }
    if findings.is_empty() {
        println!("schema ok: {} field(s)", fields.len());
        Ok(())
    } else {
        Err(eyre!(
            "{} problem(s) in '{}'",
            findings.len(),
            schema.display()
        ))
    }
}

fn resolve(schema: &Path, values: Option<&Path>, format: Option<&str>) -> Result<()> {
    let fields = load_fields(schema, format)?;
    let form = form_with_values(fields, values)?;

    let visible: Vec<_> = form
        .visible_fields()
        .into_iter()
        .map(|field| {
            let options: Vec<_> = form.options_for(&field.name).into_iter().collect();
            json!({
                "name": field.name,
                "label": field.label,
                "type": field.field_type.to_string(),
                "options": options,
            })
        })
        .collect();

    let report = json!({
        "values": form.values(),
        "visible": visible,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn apply(schema: &Path, sets: &[String], format: Option<&str>) -> Result<()> {
    let fields = load_fields(schema, format)?;
    let mut form = SubmissionForm::new(fields);
    for set in sets {
        let (name, value) = set
            .split_once('=')
            .ok_or_else(|| eyre!("--set expects NAME=VALUE, got '{set}'"))?;
        form.set_value(name, value);
    }
    println!("{}", serde_json::to_string_pretty(form.values())?);
    Ok(())
}

fn form_with_values(
    fields: Vec<FieldDefinition>,
    values: Option<&Path>,
) -> Result<SubmissionForm> {
    let mut form = SubmissionForm::new(fields);
    if let Some(path) = values {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read values file '{}'", path.display()))?;
        let entered: FormValues = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("'{}' is not a JSON value map", path.display()))?;
        for (name, value) in entered.iter() {
            form.set_value(name, value);
        }
    }
    Ok(form)
}

fn load_fields(path: &Path, format: Option<&str>) -> Result<Vec<FieldDefinition>> {
    let format = match format {
        Some(name) => format_by_name(name)?,
        None => DocumentFormat::from_path(path).map_err(|err| eyre!("{err:#}"))?,
    };
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read schema '{}'", path.display()))?;
    parse_fields_str(&contents, format).map_err(|err| eyre!("{err:#}"))
}

fn format_by_name(name: &str) -> Result<DocumentFormat> {
    match name.to_ascii_lowercase().as_str() {
        "json" => Ok(DocumentFormat::Json),
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        #[cfg(feature = "toml")]
        "toml" => Ok(DocumentFormat::Toml),
        other => Err(eyre!("unsupported format '{other}' in this build")),
    }
}
