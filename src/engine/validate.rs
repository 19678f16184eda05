use crate::domain::{FieldDefinition, FormValues};
use crate::error::{MissingField, ValidationError};

use super::visibility::is_visible;

/// Checks that every currently visible field has a value.
///
/// Hidden fields are exempt; the submitted record will not contain them. The
/// error reports all offending fields at once.
pub fn validate_for_submission(
    values: &FormValues,
    all_fields: &[FieldDefinition],
) -> Result<(), ValidationError> {
    let missing: Vec<MissingField> = all_fields
        .iter()
        .filter(|field| is_visible(field, values, all_fields) && !values.is_set(&field.name))
        .map(|field| MissingField {
            name: field.name.clone(),
            label: field.label.clone(),
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}
