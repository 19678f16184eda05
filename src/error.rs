use std::fmt;

/// A visible field was left empty at submission time.
///
/// Carries the whole batch of offending fields, not just the first one found,
/// so the caller can surface every problem in one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<MissingField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    pub name: String,
    pub label: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "required fields missing: ")?;
        for (index, field) in self.missing.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field.label)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A write to the schema store or submission sink failed.
///
/// Callers keep their local state intact when they see this, so the user can
/// retry without re-entering anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceError {
    pub message: String,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PersistenceError {}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    Validation(ValidationError),
    Persistence(PersistenceError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Validation(err) => write!(f, "{err}"),
            SubmitError::Persistence(err) => write!(f, "submission failed: {err}"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Validation(err) => Some(err),
            SubmitError::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        SubmitError::Validation(err)
    }
}

impl From<PersistenceError> for SubmitError {
    fn from(err: PersistenceError) -> Self {
        SubmitError::Persistence(err)
    }
}

/// A schema rejected by the editor before any write was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    EmptyLabel,
    DuplicateName {
        name: String,
        labels: Vec<String>,
    },
    /// A conditional points at a field id that is not in the schema.
    UnknownReference {
        label: String,
        target: String,
    },
    /// A conditional points at a field that cannot act as a trigger because
    /// it is not a select.
    NonSelectController {
        label: String,
        controller: String,
    },
    SelfReference {
        label: String,
    },
    /// A conditional points at a field that has not been saved yet, so its
    /// final id is unknown.
    UnsavedReference {
        label: String,
        target: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptyLabel => write!(f, "field label must not be empty"),
            SchemaError::DuplicateName { name, labels } => {
                write!(
                    f,
                    "fields {} share the derived name '{name}'",
                    labels.join(" and ")
                )
            }
            SchemaError::UnknownReference { label, target } => {
                write!(f, "field '{label}' references unknown field {target}")
            }
            SchemaError::NonSelectController { label, controller } => {
                write!(
                    f,
                    "field '{label}' is conditioned on '{controller}', which is not a select"
                )
            }
            SchemaError::SelfReference { label } => {
                write!(f, "field '{label}' is conditioned on itself")
            }
            SchemaError::UnsavedReference { label, target } => {
                write!(
                    f,
                    "field '{label}' references unsaved field {target}; save it first"
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Why a schema save did not go through: either the working copy failed local
/// validation (nothing was written) or the store batch failed (the working
/// copy is untouched and the save can be retried).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    Schema(SchemaError),
    Persistence(PersistenceError),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Schema(err) => write!(f, "{err}"),
            SaveError::Persistence(err) => write!(f, "schema save failed: {err}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Schema(err) => Some(err),
            SaveError::Persistence(err) => Some(err),
        }
    }
}

impl From<SchemaError> for SaveError {
    fn from(err: SchemaError) -> Self {
        SaveError::Schema(err)
    }
}

impl From<PersistenceError> for SaveError {
    fn from(err: PersistenceError) -> Self {
        SaveError::Persistence(err)
    }
}
