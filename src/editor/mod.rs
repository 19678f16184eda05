//! Admin-side mutation of the ordered field list. The editor owns a working
//! copy and a snapshot of the last persisted state; nothing reaches the store
//! until `save` diffs the two into one atomic batch.

mod audit;
pub(crate) mod diff;

pub use audit::audit_fields;

use crate::domain::{FieldDefinition, FieldId, FieldType, derive_name};
use crate::error::{SaveError, SchemaError};
use crate::store::SchemaStore;

use diff::{diff, sanitize, validate};

pub struct SchemaEditor {
    original: Vec<FieldDefinition>,
    edited: Vec<FieldDefinition>,
    next_local: u64,
}

impl SchemaEditor {
    /// Starts editing from a loaded schema snapshot (already sorted by
    /// `order`, per the store contract).
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self {
            original: fields.clone(),
            edited: fields,
            next_local: 0,
        }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.edited
    }

    /// Whether the working copy differs from the last persisted snapshot.
    /// Placeholder ids are ignored in the comparison; they are a local
    /// bookkeeping detail, not content.
    pub fn has_changes(&self) -> bool {
        if self.original.len() != self.edited.len() {
            return true;
        }
        self.original.iter().zip(&self.edited).any(|(a, b)| {
            let same_identity = b.id.is_placeholder() || a.id == b.id;
            !(same_identity && a.same_content(b) && a.order == b.order)
        })
    }

    /// Appends a new field at the end of the list. Local validation only; no
    /// write happens until `save`.
    pub fn add_field(
        &mut self,
        label: impl Into<String>,
        field_type: FieldType,
    ) -> Result<FieldId, SchemaError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(SchemaError::EmptyLabel);
        }
        self.next_local += 1;
        let id = FieldId::local(self.next_local);
        let order = self.edited.len();
        self.edited
            .push(FieldDefinition::new(id.clone(), label, field_type, order));
        Ok(id)
    }

    /// Replaces one field's definition in place, keeping its slot and order.
    /// The machine name is re-derived from the (possibly edited) label.
    pub fn update_field(&mut self, mut field: FieldDefinition) -> bool {
        let Some(slot) = self.edited.iter_mut().find(|entry| entry.id == field.id) else {
            return false;
        };
        field.order = slot.order;
        field.name = derive_name(&field.label);
        *slot = field;
        true
    }

    /// Removes a field and renumbers the rest so `order` stays a contiguous
    /// 0..N-1 sequence.
    pub fn delete_field(&mut self, id: &FieldId) -> bool {
        let before = self.edited.len();
        self.edited.retain(|field| &field.id != id);
        if self.edited.len() == before {
            return false;
        }
        self.renumber();
        true
    }

    /// Moves the field at `from` to position `to` (splice semantics, as a
    /// drag-and-drop handler produces), then renumbers.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.edited.len() || to >= self.edited.len() {
            return false;
        }
        let field = self.edited.remove(from);
        self.edited.insert(to, field);
        self.renumber();
        true
    }

    /// Throws the working copy away and returns to the persisted snapshot.
    pub fn discard(&mut self) {
        self.edited = self.original.clone();
    }

    /// Sanitizes and validates the working copy, diffs it against the
    /// snapshot, and applies the result as one atomic batch.
    ///
    /// On any failure the working copy is left untouched so the admin can
    /// retry without re-entering changes. On success the store-assigned ids
    /// for inserted fields are patched in and the snapshot is refreshed.
    pub fn save(&mut self, store: &mut dyn SchemaStore) -> Result<(), SaveError> {
        let sanitized = sanitize(&self.edited);
        validate(&sanitized)?;
        let batch = diff(&self.original, &sanitized);

        let assigned = if batch.is_empty() {
            Vec::new()
        } else {
            store.apply_batch(batch)?
        };

        let mut saved = sanitized;
        let mut assigned = assigned.into_iter();
        for field in &mut saved {
            if field.id.is_placeholder()
                && let Some(id) = assigned.next()
            {
                field.id = id;
            }
        }
        self.original = saved.clone();
        self.edited = saved;
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, field) in self.edited.iter_mut().enumerate() {
            field.order = index;
        }
    }
}
