use crate::domain::{FieldDefinition, FormValues};

use super::{options::resolve_options, visibility::is_visible};

/// Applies one user edit and cleans every value it invalidated.
///
/// Fixpoint cleaning: after writing the new value, full passes over the
/// schema clear (a) values of fields that are no longer visible and (b)
/// select values that fell out of their resolved option set, repeating until
/// a pass changes nothing. A pass can only clear values, never set them, so
/// the loop terminates within one pass per field.
pub fn on_field_change(
    changed_name: &str,
    new_value: &str,
    values: FormValues,
    all_fields: &[FieldDefinition],
) -> FormValues {
    let mut candidate = values;
    candidate.set(changed_name, new_value);
    clean(&mut candidate, all_fields);
    candidate
}

/// Runs cleaning passes over `values` until they stabilize.
pub(crate) fn clean(values: &mut FormValues, all_fields: &[FieldDefinition]) {
    loop {
        let mut changed = false;
        for field in all_fields {
            if !values.is_set(&field.name) {
                continue;
            }
            if !is_visible(field, values, all_fields) {
                values.clear(&field.name);
                changed = true;
                continue;
            }
            if field.is_select() {
                let options = resolve_options(field, values, all_fields);
                if !options.contains(values.get(&field.name)) {
                    values.clear(&field.name);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// Merges an old value set into a freshly loaded schema snapshot.
///
/// Values survive when a field with the same `name` still exists; everything
/// else starts unset. The merged set is cleaned once so a stale selection
/// invalidated by the new schema is dropped immediately.
pub fn merge_values(old: &FormValues, fields: &[FieldDefinition]) -> FormValues {
    let mut merged = FormValues::for_fields(fields);
    for field in fields {
        let carried = old.get(&field.name);
        if !carried.is_empty() {
            merged.set(field.name.clone(), carried);
        }
    }
    clean(&mut merged, fields);
    merged
}
