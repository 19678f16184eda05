mod field;
mod values;

pub use field::{
    Condition, ConditionValue, FieldDefinition, FieldId, FieldType, OptionSet, derive_name,
    field_by_id, field_by_name,
};
pub use values::FormValues;
