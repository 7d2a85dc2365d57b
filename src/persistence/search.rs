//! Multi-result reads: list, query by example, free-text search

use super::{guarded, Persistence, PersistenceError, PersistenceResult};
use crate::mapping::{from_triples_list, Entity, Pattern, Resource};
use crate::sparql::Page;
use crate::store::SparqlStore;

impl<S: SparqlStore> Persistence<S> {
    /// Entities of type `T` ordered by id
    pub async fn list<T: Entity>(&self, limit: u64, offset: u64) -> PersistenceResult<Vec<T>> {
        self.list_page(&Page::new(limit, offset)).await
    }

    /// Entities of type `T` in an arbitrary window and order
    pub async fn list_page<T: Entity>(&self, page: &Page) -> PersistenceResult<Vec<T>> {
        let descriptor = T::type_descriptor();
        descriptor.validate()?;
        let query = self.queries.list(&descriptor.entity_node(), page)?;
        self.fetch_list("list", &query).await
    }

    /// Entities matching every non-empty field of `example`
    pub async fn search<T: Entity>(&self, example: &T, limit: u64, offset: u64) -> PersistenceResult<Vec<T>> {
        self.search_page(example, &Page::new(limit, offset)).await
    }

    /// Every entity matching `example`
    pub async fn search_all<T: Entity>(&self, example: &T) -> PersistenceResult<Vec<T>> {
        self.search_page(example, &Page::all()).await
    }

    pub async fn search_page<T: Entity>(&self, example: &T, page: &Page) -> PersistenceResult<Vec<T>> {
        let pattern = guarded(|| Pattern::from_example(example))?;
        let query = self.queries.search(&pattern, page)?;
        self.fetch_list("search", &query).await
    }

    /// The single entity matching `example`
    pub async fn search_one<T: Entity>(&self, example: &T) -> PersistenceResult<T> {
        let mut found = self.search_all(example).await?;
        let entity = T::type_descriptor().type_name;
        match found.len() {
            0 => Err(PersistenceError::NotFound { entity }),
            1 => Ok(found.remove(0)),
            count => Err(PersistenceError::Ambiguous { entity, count }),
        }
    }

    /// Entities matching `mandatory` and at least one of `variants`
    pub async fn variant_search<T: Entity>(
        &self,
        mandatory: &T,
        variants: &[&dyn Resource],
        limit: u64,
        offset: u64,
    ) -> PersistenceResult<Vec<T>> {
        self.variant_search_page(mandatory, variants, &Page::new(limit, offset))
            .await
    }

    pub async fn variant_search_all<T: Entity>(
        &self,
        mandatory: &T,
        variants: &[&dyn Resource],
    ) -> PersistenceResult<Vec<T>> {
        self.variant_search_page(mandatory, variants, &Page::all())
            .await
    }

    pub async fn variant_search_page<T: Entity>(
        &self,
        mandatory: &T,
        variants: &[&dyn Resource],
        page: &Page,
    ) -> PersistenceResult<Vec<T>> {
        let pattern = guarded(|| Pattern::from_example(mandatory))?;
        let alternatives = patterns(variants)?;
        let query = self.queries.variant_search(&pattern, &alternatives, page)?;
        self.fetch_list("variant_search", &query).await
    }

    /// Entities of type `T` where any text field of `example` matches as a
    /// case-insensitive regular expression
    pub async fn text_search<T: Entity>(&self, example: &T, limit: u64, offset: u64) -> PersistenceResult<Vec<T>> {
        self.variant_text_search(example, &[], limit, offset).await
    }

    /// [`text_search`](Self::text_search) AND-ed with a union of variants
    pub async fn variant_text_search<T: Entity>(
        &self,
        example: &T,
        variants: &[&dyn Resource],
        limit: u64,
        offset: u64,
    ) -> PersistenceResult<Vec<T>> {
        self.text_search_page(example, variants, &Page::new(limit, offset))
            .await
    }

    pub async fn text_search_page<T: Entity>(
        &self,
        example: &T,
        variants: &[&dyn Resource],
        page: &Page,
    ) -> PersistenceResult<Vec<T>> {
        let descriptor = T::type_descriptor();
        descriptor.validate()?;
        let pattern = guarded(|| Pattern::from_example(example))?;
        let alternatives = patterns(variants)?;
        let query =
            self.queries
                .text_search(&descriptor.entity_node(), pattern, &alternatives, page)?;
        self.fetch_list("text_search", &query).await
    }

    async fn fetch_list<T: Entity>(&self, kind: &'static str, query: &str) -> PersistenceResult<Vec<T>> {
        let triples = self.query_triples(kind, query).await?;
        guarded(|| from_triples_list::<T>(&triples))
    }
}

fn patterns(examples: &[&dyn Resource]) -> PersistenceResult<Vec<Pattern>> {
    examples
        .iter()
        .map(|example| guarded(|| Pattern::from_example(*example)))
        .collect()
}
