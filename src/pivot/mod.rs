//! Pivot Layer - join tables between two entity types
//!
//! - `PivotProtocol`: capability of a join entity (related/attach/detach)
//! - `Pivot<Left, Right>`: generic join table named from both entity names
//! - `PivotError`: precondition failures and wrapped collaborator errors

pub mod error;
pub mod generic;

pub use error::PivotError;
pub use generic::Pivot;

use crate::database::Database;
use crate::entity::{Entity, Record};
use crate::node::Node;

/// A pivot between two many-to-many entities.
///
/// For example: users > team_user < teams
pub trait PivotProtocol: Entity {
    /// True if the two records share at least one pivot row
    fn related(db: &Database, left: &dyn Record, right: &dyn Record) -> Result<bool, PivotError>;

    /// Insert a pivot row for the two records. Both must be saved.
    fn attach(db: &Database, left: &dyn Record, right: &dyn Record) -> Result<(), PivotError>;

    /// Delete every pivot row for the two records. Both must be saved.
    fn detach(db: &Database, left: &dyn Record, right: &dyn Record) -> Result<(), PivotError>;
}

/// Check both records are persisted and return their identifiers.
///
/// Order: left exists, left id, right exists, right id.
pub fn assert_saved(left: &dyn Record, right: &dyn Record) -> Result<(Node, Node), PivotError> {
    let left_id = saved_id(left)?;
    let right_id = saved_id(right)?;
    Ok((left_id, right_id))
}

fn saved_id(record: &dyn Record) -> Result<Node, PivotError> {
    if !record.exists() {
        return Err(PivotError::exist_required(record));
    }
    record.id().cloned().ok_or_else(|| PivotError::id_required(record))
}

/// Recover the concrete type behind a type-erased record
pub fn downcast<T: Entity>(record: &dyn Record) -> Result<&T, PivotError> {
    record
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| PivotError::invalid_type::<T>(record))
}
