use indexmap::IndexMap;

use crate::domain::{FieldDefinition, FieldId};
use crate::error::PersistenceError;

use super::{SchemaBatch, SchemaStore, SubmissionMeta, SubmissionSink, TicketId};

pub type SchemaListener = Box<dyn FnMut(&[FieldDefinition]) + Send>;

/// In-memory store with snapshot subscriptions, for tests and hosts that do
/// their own persistence. Listeners are notified with the fresh field list
/// after every successful batch, mirroring the document store's
/// collection-listen semantics.
#[derive(Default)]
pub struct MemoryStore {
    fields: Vec<FieldDefinition>,
    next_id: u64,
    listeners: Vec<SchemaListener>,
    fail_next: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(fields: Vec<FieldDefinition>) -> Self {
        let mut store = Self::new();
        store.fields = fields;
        store.fields.sort_by_key(|field| field.order);
        store
    }

    pub fn subscribe(&mut self, listener: SchemaListener) {
        self.listeners.push(listener);
    }

    /// Makes the next `apply_batch` fail without touching the stored schema.
    /// Test hook for save-failure atomicity.
    pub fn fail_next_batch(&mut self) {
        self.fail_next = true;
    }

    fn assign_id(&mut self) -> FieldId {
        self.next_id += 1;
        FieldId::new(format!("field:{:04}", self.next_id))
    }

    fn notify(&mut self) {
        let snapshot = self.fields.clone();
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl SchemaStore for MemoryStore {
    fn load_schema(&self) -> Result<Vec<FieldDefinition>, PersistenceError> {
        Ok(self.fields.clone())
    }

    fn apply_batch(&mut self, batch: SchemaBatch) -> Result<Vec<FieldId>, PersistenceError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(PersistenceError::new("store unavailable"));
        }

        // Stage the whole batch on a copy; the live list only changes once
        // everything applied.
        let mut staged: IndexMap<FieldId, FieldDefinition> = self
            .fields
            .iter()
            .map(|field| (field.id.clone(), field.clone()))
            .collect();

        for id in &batch.deletes {
            if staged.shift_remove(id).is_none() {
                return Err(PersistenceError::new(format!("cannot delete unknown field {id}")));
            }
        }
        for update in &batch.updates {
            match staged.get_mut(&update.id) {
                Some(slot) => *slot = update.clone(),
                None => {
                    return Err(PersistenceError::new(format!(
                        "cannot update unknown field {}",
                        update.id
                    )));
                }
            }
        }
        for (id, order) in &batch.reorders {
            match staged.get_mut(id) {
                Some(slot) => slot.order = *order,
                None => {
                    return Err(PersistenceError::new(format!(
                        "cannot reorder unknown field {id}"
                    )));
                }
            }
        }

        let mut assigned = Vec::with_capacity(batch.inserts.len());
        for insert in batch.inserts {
            let id = self.assign_id();
            let mut field = insert;
            field.id = id.clone();
            staged.insert(id.clone(), field);
            assigned.push(id);
        }

        let mut fields: Vec<FieldDefinition> = staged.into_values().collect();
        fields.sort_by_key(|field| field.order);
        self.fields = fields;
        self.notify();
        Ok(assigned)
    }
}

/// A ticket record as the memory sink keeps it.
#[derive(Debug, Clone)]
pub struct StoredTicket {
    pub id: TicketId,
    pub record: IndexMap<String, String>,
    pub meta: SubmissionMeta,
}

/// In-memory submission sink, for tests and demos.
#[derive(Default)]
pub struct MemorySink {
    tickets: Vec<StoredTicket>,
    next_id: u64,
    fail_next: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_submit(&mut self) {
        self.fail_next = true;
    }

    pub fn tickets(&self) -> &[StoredTicket] {
        &self.tickets
    }
}

impl SubmissionSink for MemorySink {
    fn submit(
        &mut self,
        record: IndexMap<String, String>,
        meta: SubmissionMeta,
    ) -> Result<TicketId, PersistenceError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(PersistenceError::new("sink unavailable"));
        }
        self.next_id += 1;
        let id = TicketId(format!("ticket:{:04}", self.next_id));
        self.tickets.push(StoredTicket {
            id: id.clone(),
            record,
            meta,
        });
        Ok(id)
    }
}
