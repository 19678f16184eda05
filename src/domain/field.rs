use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Identifier of a persisted field document.
///
/// Fields created in the editor but not yet saved carry an id in the `local:`
/// namespace; the save diff uses that to tell inserts apart from updates. The
/// store never sees a placeholder id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

const PLACEHOLDER_PREFIX: &str = "local:";

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A locally-scoped placeholder id for a not-yet-persisted field.
    pub fn local(counter: u64) -> Self {
        Self(format!("{PLACEHOLDER_PREFIX}{counter}"))
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(PLACEHOLDER_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The widget a field renders as. Only `Select` fields produce discrete
/// values, so only they can act as condition triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Select,
    Textarea,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Select => write!(f, "select"),
            FieldType::Textarea => write!(f, "textarea"),
        }
    }
}

/// The value side of a condition: either an exact match or the `"any"`
/// wildcard, which matches every non-empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionValue {
    Any,
    Equals(String),
}

impl ConditionValue {
    /// Whether `candidate` (the controlling field's current value) satisfies
    /// this condition. The empty string means unset and never matches.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            ConditionValue::Any => !candidate.is_empty(),
            ConditionValue::Equals(expected) => !candidate.is_empty() && candidate == expected,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ConditionValue::Equals(value) if value.is_empty())
    }
}

impl From<String> for ConditionValue {
    fn from(raw: String) -> Self {
        if raw == "any" {
            ConditionValue::Any
        } else {
            ConditionValue::Equals(raw)
        }
    }
}

impl From<ConditionValue> for String {
    fn from(value: ConditionValue) -> Self {
        match value {
            ConditionValue::Any => "any".to_string(),
            ConditionValue::Equals(raw) => raw,
        }
    }
}

impl Serialize for ConditionValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConditionValue::Any => serializer.serialize_str("any"),
            ConditionValue::Equals(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(String::deserialize(deserializer)?.into())
    }
}

/// "Only when field X has value Y" — used both for whole-field visibility and
/// for option sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: FieldId,
    pub value: ConditionValue,
}

impl Condition {
    /// A condition with an empty field reference or an empty value was left
    /// half-filled in the editor and is dropped on save.
    pub fn is_complete(&self) -> bool {
        !self.field.as_str().is_empty() && !self.value.is_empty()
    }
}

/// One bundle of selectable values for a dropdown field. A set without a
/// condition is the default set and always contributes its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl OptionSet {
    pub fn is_default(&self) -> bool {
        self.condition.is_none()
    }
}

/// One admin-defined question in the dynamic issue-report form.
///
/// Serialized with the store's camelCase document keys; unknown keys in a
/// loaded document are ignored, missing mandatory keys reject the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: FieldId,
    pub label: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub order: usize,
    /// Legacy flat option list, used when a select has no conditional sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_sets: Option<Vec<OptionSet>>,
    /// Controls whether the whole field is visible. Absent means always.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Condition>,
}

impl FieldDefinition {
    pub fn new(id: FieldId, label: impl Into<String>, field_type: FieldType, order: usize) -> Self {
        let label = label.into();
        let name = derive_name(&label);
        Self {
            id,
            label,
            name,
            field_type,
            order,
            options: None,
            option_sets: None,
            conditional: None,
        }
    }

    pub fn is_select(&self) -> bool {
        self.field_type == FieldType::Select
    }

    /// Structural equality that ignores `order`, for the save diff: a field
    /// whose only difference is renumbering needs no content write.
    pub fn same_content(&self, other: &FieldDefinition) -> bool {
        self.label == other.label
            && self.name == other.name
            && self.field_type == other.field_type
            && self.options == other.options
            && self.option_sets == other.option_sets
            && self.conditional == other.conditional
    }
}

/// Derives the machine key used in submitted records: lowercased label with
/// whitespace runs collapsed to single underscores.
pub fn derive_name(label: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    whitespace.replace_all(label.trim(), "_").to_lowercase()
}

/// Looks a field up by id. Dangling references resolve to `None`; callers
/// fail closed on that.
pub fn field_by_id<'a>(fields: &'a [FieldDefinition], id: &FieldId) -> Option<&'a FieldDefinition> {
    fields.iter().find(|field| &field.id == id)
}

pub fn field_by_name<'a>(fields: &'a [FieldDefinition], name: &str) -> Option<&'a FieldDefinition> {
    fields.iter().find(|field| field.name == name)
}
