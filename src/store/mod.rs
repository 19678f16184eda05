//! Boundary with the document store and the ticket sink. The engine itself
//! never performs I/O; hosts receive these adapters as explicit arguments.

mod document;
mod file;
mod memory;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{FieldDefinition, FieldId};
use crate::error::PersistenceError;

pub use document::{DocumentFormat, fields_to_string, parse_fields_str};
pub use file::FileStore;
pub use memory::{MemorySink, MemoryStore, SchemaListener, StoredTicket};

/// One atomic set of schema writes produced by the editor's save diff.
///
/// `inserts` carry no usable id (the editor strips placeholders); the store
/// assigns ids and returns them in order. `reorders` are fields whose content
/// is unchanged and only need their `order` rewritten. Partial application is
/// forbidden: a failing batch must leave the stored schema as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaBatch {
    pub inserts: Vec<FieldDefinition>,
    pub updates: Vec<FieldDefinition>,
    pub reorders: Vec<(FieldId, usize)>,
    pub deletes: Vec<FieldId>,
}

impl SchemaBatch {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
            && self.updates.is_empty()
            && self.reorders.is_empty()
            && self.deletes.is_empty()
    }
}

/// The persisted field list, plus batched writes against it.
///
/// Ordering contract: `load_schema` returns fields sorted by `order`
/// ascending; the engine does not re-sort.
pub trait SchemaStore {
    fn load_schema(&self) -> Result<Vec<FieldDefinition>, PersistenceError>;

    /// Applies the whole batch atomically and returns the assigned ids for
    /// `batch.inserts`, in order.
    fn apply_batch(&mut self, batch: SchemaBatch) -> Result<Vec<FieldId>, PersistenceError>;
}

/// Workflow status stamped onto a submitted ticket. Which status a submission
/// gets is decided by the caller (role-based, outside this engine) and passed
/// in through [`SubmissionMeta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Pending,
    Approved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMeta {
    pub user_id: String,
    pub status: TicketStatus,
    /// Caller-supplied timestamp, stored verbatim.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

/// Where finished submissions go. Receives a flat record containing only the
/// currently-visible field names.
pub trait SubmissionSink {
    fn submit(
        &mut self,
        record: IndexMap<String, String>,
        meta: SubmissionMeta,
    ) -> Result<TicketId, PersistenceError>;
}
