//! Existence checks and id assignment

use futures::future::BoxFuture;
use tracing::debug;
use uuid::Uuid;

use super::{descriptor_of, field_slot, guarded, list_items, required_id, Persistence, PersistenceResult};
use crate::mapping::{DescriptorError, FieldSlot, Resource};
use crate::rdf::{NamedNode, RdfError};
use crate::store::SparqlStore;

impl<S: SparqlStore> Persistence<S> {
    /// True if any `rdf:type` triple has `id` as subject
    pub async fn id_exists(&self, id: &str) -> PersistenceResult<bool> {
        let id = NamedNode::new(id).map_err(|e| RdfError::InvalidIri(e.to_string()))?;
        let query = self.queries.id_exists(&id)?;
        self.query_bool("id_exists", &query).await
    }

    /// True if the value's id is typed with the value's entity class
    pub async fn id_is_of_class(&self, value: &dyn Resource) -> PersistenceResult<bool> {
        let descriptor = descriptor_of(value)?;
        descriptor.validate()?;
        let id = required_id(value)?;
        let query = self.queries.id_is_of_class(&id, &descriptor.entity_node())?;
        self.query_bool("id_is_of_class", &query).await
    }

    /// True if `id` is typed with the class `entity`
    pub async fn id_has_class(&self, id: &str, entity: &str) -> PersistenceResult<bool> {
        let id = NamedNode::new(id).map_err(|e| RdfError::InvalidIri(e.to_string()))?;
        let entity = NamedNode::new(entity).map_err(|e| RdfError::InvalidIri(e.to_string()))?;
        let query = self.queries.id_is_of_class(&id, &entity)?;
        self.query_bool("id_is_of_class", &query).await
    }

    /// Give a non-empty value without id a fresh `<graph>#<uuid>` id not yet
    /// used in the store. Values that already have an id are left alone.
    pub async fn set_id(&self, value: &mut dyn Resource) -> PersistenceResult<()> {
        let (assigned, empty) = guarded(|| Ok((value.assigned_id().is_some(), value.is_empty())))?;
        if assigned || empty {
            return Ok(());
        }
        let descriptor = descriptor_of(value)?;
        if descriptor.id_field.is_none() {
            return Err(DescriptorError::MissingIdField {
                type_name: descriptor.type_name,
            }
            .into());
        }

        loop {
            let id = self.generate_id();
            if self.id_exists(&id).await? {
                debug!(id, "generated id already taken");
                continue;
            }
            debug!(entity = descriptor.type_name, id, "assigned id");
            guarded(|| Ok(value.set_id(id)))?;
            return Ok(());
        }
    }

    /// [`set_id`](Self::set_id) on the value and every nested value
    pub async fn set_id_deep(&self, value: &mut dyn Resource) -> PersistenceResult<()> {
        self.set_id_deep_inner(value).await
    }

    fn set_id_deep_inner<'a>(&'a self, value: &'a mut dyn Resource) -> BoxFuture<'a, PersistenceResult<()>> {
        Box::pin(async move {
            self.set_id(value).await?;
            let descriptor = descriptor_of(value)?;
            for field in descriptor.fields.iter().filter(|f| f.kind.is_nested()) {
                match field_slot(value, field.name)? {
                    Some(FieldSlot::Entity(child)) => self.set_id_deep_inner(child).await?,
                    Some(FieldSlot::EntityList(items)) => {
                        for child in list_items(items)? {
                            self.set_id_deep_inner(child).await?;
                        }
                    }
                    _ => {}
                }
            }
            Ok(())
        })
    }

    fn generate_id(&self) -> String {
        format!("{}#{}", self.queries.graph(), Uuid::new_v4())
    }
}
