//! Insert, delete and diff-based update

use tracing::debug;

use super::{descriptor_of, guarded, Persistence, PersistenceError, PersistenceResult};
use crate::mapping::{to_triples, to_triples_no_side_effects, to_triples_with_lending, Resource};
use crate::rdf::{diff, Triple, TripleDiff};
use crate::store::SparqlStore;

impl<S: SparqlStore> Persistence<S> {
    /// `INSERT DATA` text for the value and everything it reaches
    pub fn insert_query(&self, value: &dyn Resource) -> PersistenceResult<String> {
        let triples = guarded(|| to_triples(value, true))?.triples;
        ensure_assigned(value, &triples)?;
        Ok(self.queries.insert(&triples)?)
    }

    /// `DELETE DATA` text for the state the value owns
    pub fn delete_query(&self, value: &dyn Resource) -> PersistenceResult<String> {
        let triples = guarded(|| to_triples_no_side_effects(value))?;
        ensure_assigned(value, &triples)?;
        Ok(self.queries.delete(&triples)?)
    }

    /// Triples to remove and add to turn `old` into `new`.
    ///
    /// Nested roots contribute only their relation triple on both sides.
    /// Removals come from owned state alone; additions also carry lending
    /// relations and lent content that `old` did not have.
    pub fn update_diff(&self, old: &dyn Resource, new: &dyn Resource) -> PersistenceResult<TripleDiff> {
        let owned_before = guarded(|| to_triples_no_side_effects(old))?;
        let owned_after = guarded(|| to_triples_no_side_effects(new))?;
        let lent_before = guarded(|| to_triples_with_lending(old))?;
        let lent_after = guarded(|| to_triples_with_lending(new))?;
        Ok(TripleDiff {
            remove: diff(&owned_before, &owned_after).remove,
            add: diff(&lent_before, &lent_after).add,
        })
    }

    /// Single-request update text; `None` when nothing changed
    pub fn update_query(&self, old: &dyn Resource, new: &dyn Resource) -> PersistenceResult<Option<String>> {
        let changes = self.update_diff(old, new)?;
        if changes.is_empty() {
            return Ok(None);
        }
        ensure_assigned(new, &changes.add)?;
        ensure_assigned(old, &changes.remove)?;
        Ok(Some(self.queries.update(&changes)?))
    }

    /// Write the value, its nested values and referenced roots
    pub async fn insert(&self, value: &dyn Resource) -> PersistenceResult<()> {
        let update = self.insert_query(value)?;
        self.execute_update("insert", &update).await
    }

    /// Remove the triples the value owns; referenced roots stay
    pub async fn delete(&self, value: &dyn Resource) -> PersistenceResult<()> {
        let update = self.delete_query(value)?;
        self.execute_update("delete", &update).await
    }

    /// Replace the stored state `old` with `new`. Sends nothing when they
    /// serialize to the same triples.
    pub async fn update(&self, old: &dyn Resource, new: &dyn Resource) -> PersistenceResult<()> {
        match self.update_query(old, new)? {
            Some(update) => self.execute_update("update", &update).await,
            None => {
                debug!(entity = descriptor_of(new)?.type_name, "update skipped, no changes");
                Ok(())
            }
        }
    }
}

fn ensure_assigned(value: &dyn Resource, triples: &[Triple]) -> PersistenceResult<()> {
    if triples.iter().any(Triple::has_variable) {
        return Err(PersistenceError::Unassigned {
            entity: descriptor_of(value)?.type_name,
        });
    }
    Ok(())
}
