//! MemoryStore: in-process oxigraph store
//!
//! Runs the same SPARQL text as [`super::HttpSparqlStore`] without a network
//! round trip. Used by tests and local runs.

use async_trait::async_trait;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use tracing::debug;

use super::{SparqlStore, StoreError, StoreResult};
use crate::rdf::{Term, Triple};
use crate::sparql::{QuerySolution, SparqlResults};

/// In-memory triple store
#[derive(Clone)]
pub struct MemoryStore {
    store: Store,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> StoreResult<Self> {
        let store = Store::new().map_err(embedded)?;
        Ok(Self { store })
    }

    /// Number of quads across all graphs
    pub fn len(&self) -> StoreResult<usize> {
        self.store.len().map_err(embedded)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.store.is_empty().map_err(embedded)
    }

    fn query(&self, query: &str) -> StoreResult<SparqlResults> {
        let results = self.store.query(query).map_err(embedded)?;
        match results {
            QueryResults::Boolean(value) => Ok(SparqlResults::Boolean(value)),
            QueryResults::Solutions(solutions) => {
                let variables = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(embedded)?;
                    let mut bound = QuerySolution::new();
                    for (variable, term) in solution.iter() {
                        if let Ok(term) = Term::try_from(term.clone()) {
                            bound.bind(variable.as_str(), term);
                        }
                    }
                    rows.push(bound);
                }
                Ok(SparqlResults::Bindings {
                    variables,
                    solutions: rows,
                })
            }
            QueryResults::Graph(triples) => {
                let mut graph = Vec::new();
                for triple in triples {
                    let triple = triple.map_err(embedded)?;
                    let oxigraph::model::Subject::NamedNode(subject) = triple.subject else {
                        continue;
                    };
                    let Ok(object) = Term::try_from(triple.object) else {
                        continue;
                    };
                    graph.push(Triple::new(Term::Iri(subject), triple.predicate, object));
                }
                Ok(SparqlResults::Graph(graph))
            }
        }
    }
}

#[async_trait]
impl SparqlStore for MemoryStore {
    async fn select(&self, query: &str) -> StoreResult<Vec<Triple>> {
        debug!("embedded select");
        Ok(self.query(query)?.into_triples()?)
    }

    async fn construct(&self, query: &str) -> StoreResult<Vec<Triple>> {
        debug!("embedded construct");
        Ok(self.query(query)?.into_triples()?)
    }

    async fn ask(&self, query: &str) -> StoreResult<bool> {
        debug!("embedded ask");
        Ok(self.query(query)?.into_boolean()?)
    }

    async fn update(&self, update: &str) -> StoreResult<()> {
        debug!("embedded update");
        self.store.update(update).map_err(embedded)
    }
}

fn embedded(err: impl std::fmt::Display) -> StoreError {
    StoreError::Embedded(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = "http://example.org/graph";

    #[tokio::test]
    async fn test_update_and_query() {
        let store = MemoryStore::new().unwrap();
        assert!(store.is_empty().unwrap());

        store
            .update(&format!(
                "INSERT DATA {{ GRAPH <{GRAPH}> {{ <http://example.org/a> a <http://example.org/T> ; <http://example.org/name> \"A\" }} }}"
            ))
            .await
            .unwrap();
        assert_eq!(store.len().unwrap(), 2);

        let exists = store
            .ask(&format!("ASK FROM <{GRAPH}> {{ <http://example.org/a> a ?t }}"))
            .await
            .unwrap();
        assert!(exists);

        let triples = store
            .select(&format!(
                "SELECT ?s ?p ?o FROM <{GRAPH}> WHERE {{ ?s ?p ?o }} ORDER BY ?p"
            ))
            .await
            .unwrap();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].object.value(), "A");
    }

    #[tokio::test]
    async fn test_syntax_error() {
        let store = MemoryStore::new().unwrap();
        let err = store.ask("ASK {").await.unwrap_err();
        assert!(matches!(err, StoreError::Embedded(_)));
    }
}
