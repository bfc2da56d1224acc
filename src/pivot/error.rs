use crate::entity::{Record, RecordRef};
use crate::Error;

/// Errors that can be returned while attaching, detaching or checking the
/// relation between two records through a pivot.
#[derive(Debug, thiserror::Error)]
pub enum PivotError {
    #[error("Database pivot error: Identifier required for {0}")]
    IdRequired(RecordRef),

    #[error("Database pivot error: Entity must exist in the database. Try saving the entity first {0}")]
    ExistRequired(RecordRef),

    #[error("Database pivot error: Invalid entity {record}: type {desired} required.")]
    InvalidType {
        record: RecordRef,
        desired: &'static str,
    },

    #[error("Database pivot error: {0}")]
    Unspecified(#[source] Box<Error>),
}

impl PivotError {
    pub fn id_required(record: &dyn Record) -> Self {
        PivotError::IdRequired(record.snapshot())
    }

    pub fn exist_required(record: &dyn Record) -> Self {
        PivotError::ExistRequired(record.snapshot())
    }

    pub fn invalid_type<T: 'static>(record: &dyn Record) -> Self {
        PivotError::InvalidType {
            record: record.snapshot(),
            desired: std::any::type_name::<T>(),
        }
    }
}

/// Collaborator failures are wrapped unchanged; a pivot error that already
/// crossed into `Error` comes back out as itself.
impl From<Error> for PivotError {
    fn from(err: Error) -> Self {
        match err {
            Error::Pivot(inner) => inner,
            other => PivotError::Unspecified(Box::new(other)),
        }
    }
}
