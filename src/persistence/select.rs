//! Reads by id

use futures::future::BoxFuture;
use tracing::debug;

use super::{descriptor_of, field_slot, guarded, list_items, required_id, Depth, Persistence, PersistenceResult};
use crate::mapping::{from_triples, FieldSlot, Resource};
use crate::rdf::{NamedNode, RdfError, Triple};
use crate::store::SparqlStore;

impl<S: SparqlStore> Persistence<S> {
    /// Replace the value with its stored triples. Nested values receive
    /// only their ids.
    pub async fn select(&self, value: &mut dyn Resource) -> PersistenceResult<()> {
        let id = required_id(value)?;
        let triples = self.fetch_node(&id).await?;
        guarded(|| from_triples(value, id.as_str(), &triples))
    }

    /// Replace the value with its stored triples and every reachable child
    /// in one request
    pub async fn select_deep(&self, value: &mut dyn Resource) -> PersistenceResult<()> {
        let id = required_id(value)?;
        let query = self.queries.select_deep(&id)?;
        let triples = self.query_graph("select_deep", &query).await?;
        guarded(|| from_triples(value, id.as_str(), &triples))
    }

    /// Shallow select, then select nested values down to `depth`.
    ///
    /// `0` is a plain [`select`](Self::select), a negative depth follows
    /// every child. An id already on the current path is not selected again.
    pub async fn select_level(&self, value: &mut dyn Resource, depth: impl Into<Depth>) -> PersistenceResult<()> {
        let mut path = Vec::new();
        self.select_level_inner(value, depth.into(), &mut path).await
    }

    fn select_level_inner<'a>(
        &'a self,
        value: &'a mut dyn Resource,
        depth: Depth,
        path: &'a mut Vec<String>,
    ) -> BoxFuture<'a, PersistenceResult<()>> {
        Box::pin(async move {
            self.select(value).await?;
            let Some(next) = depth.next() else {
                return Ok(());
            };

            path.push(required_id(value)?.as_str().to_string());
            let descriptor = descriptor_of(value)?;
            for field in descriptor.fields.iter().filter(|f| f.kind.is_nested()) {
                match field_slot(value, field.name)? {
                    Some(FieldSlot::Entity(child)) => {
                        if should_descend(child, path)? {
                            self.select_level_inner(child, next, path).await?;
                        }
                    }
                    Some(FieldSlot::EntityList(items)) => {
                        for child in list_items(items)? {
                            if should_descend(child, path)? {
                                self.select_level_inner(child, next, path).await?;
                            }
                        }
                    }
                    _ => {}
                }
            }
            path.pop();
            Ok(())
        })
    }

    /// Stored triples with `id` as subject, undecoded
    pub async fn fetch_triples(&self, id: &str) -> PersistenceResult<Vec<Triple>> {
        let id = NamedNode::new(id).map_err(|e| RdfError::InvalidIri(e.to_string()))?;
        self.fetch_node(&id).await
    }

    async fn fetch_node(&self, id: &NamedNode) -> PersistenceResult<Vec<Triple>> {
        let query = self.queries.select(id)?;
        self.query_triples("select", &query).await
    }
}

fn should_descend(child: &dyn Resource, path: &[String]) -> PersistenceResult<bool> {
    let id = guarded(|| Ok(child.assigned_id().map(str::to_string)))?;
    Ok(match id {
        Some(id) if path.contains(&id) => {
            debug!(id, "cycle, not selecting again");
            false
        }
        Some(_) => true,
        None => false,
    })
}
