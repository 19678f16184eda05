use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::domain::{FieldDefinition, field_by_id};
use crate::error::SchemaError;
use crate::store::SchemaBatch;

/// Cleans a working copy up for persistence.
///
/// Half-filled conditions are editor debris: a whole-field conditional with
/// an empty side is dropped, an option set whose condition is incomplete is
/// dropped. When conditional option sets survive, the legacy flat `options`
/// list is removed so the field has a single source of truth.
pub(crate) fn sanitize(fields: &[FieldDefinition]) -> Vec<FieldDefinition> {
    fields
        .iter()
        .map(|field| {
            let mut field = field.clone();
            if let Some(conditional) = &field.conditional
                && !conditional.is_complete()
            {
                field.conditional = None;
            }
            if let Some(sets) = field.option_sets.take() {
                let kept: Vec<_> = sets
                    .into_iter()
                    .filter(|set| set.condition.as_ref().is_none_or(|cond| cond.is_complete()))
                    .collect();
                if kept.is_empty() {
                    field.option_sets = None;
                } else {
                    field.option_sets = Some(kept);
                    field.options = None;
                }
            }
            field
        })
        .collect()
}

/// Rejects schemas that would misbehave once persisted: duplicate derived
/// names (two fields would fight over one record key), and conditional
/// references that are missing, self-directed, aimed at a non-select, or
/// aimed at a field whose final id is not known yet.
pub(crate) fn validate(fields: &[FieldDefinition]) -> Result<(), SchemaError> {
    let mut by_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for field in fields {
        if field.label.trim().is_empty() {
            return Err(SchemaError::EmptyLabel);
        }
        by_name.entry(&field.name).or_default().push(&field.label);
    }
    for (name, labels) in by_name {
        if labels.len() > 1 {
            return Err(SchemaError::DuplicateName {
                name: name.to_string(),
                labels: labels.into_iter().map(str::to_string).collect(),
            });
        }
    }

    for field in fields {
        let mut references = Vec::new();
        if let Some(conditional) = &field.conditional {
            references.push(&conditional.field);
        }
        if let Some(sets) = &field.option_sets {
            references.extend(sets.iter().filter_map(|set| {
                set.condition.as_ref().map(|condition| &condition.field)
            }));
        }
        for target in references {
            if target == &field.id {
                return Err(SchemaError::SelfReference {
                    label: field.label.clone(),
                });
            }
            let Some(controller) = field_by_id(fields, target) else {
                return Err(SchemaError::UnknownReference {
                    label: field.label.clone(),
                    target: target.to_string(),
                });
            };
            if controller.id.is_placeholder() {
                return Err(SchemaError::UnsavedReference {
                    label: field.label.clone(),
                    target: controller.label.clone(),
                });
            }
            if !controller.is_select() {
                return Err(SchemaError::NonSelectController {
                    label: field.label.clone(),
                    controller: controller.label.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Diffs the sanitized working copy against the last persisted snapshot.
///
/// Placeholder-id fields become inserts (in list order, so assigned ids can
/// be zipped back). Persisted fields with changed content become updates;
/// content-identical fields whose `order` moved travel in the cheaper
/// reorder lane. Fields present only in the snapshot become deletes.
pub(crate) fn diff(original: &[FieldDefinition], edited: &[FieldDefinition]) -> SchemaBatch {
    let snapshot: IndexMap<_, _> = original
        .iter()
        .map(|field| (field.id.clone(), field))
        .collect();

    let mut batch = SchemaBatch::default();
    for field in edited {
        if field.id.is_placeholder() {
            batch.inserts.push(field.clone());
            continue;
        }
        match snapshot.get(&field.id) {
            Some(previous) if previous.same_content(field) => {
                if previous.order != field.order {
                    batch.reorders.push((field.id.clone(), field.order));
                }
            }
            _ => batch.updates.push(field.clone()),
        }
    }
    for field in original {
        if !edited.iter().any(|kept| kept.id == field.id) {
            batch.deletes.push(field.id.clone());
        }
    }
    batch
}
