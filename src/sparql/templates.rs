//! SPARQL text generation
//!
//! Every query the repository sends is rendered from one of the templates
//! below. Templates only substitute pre-rendered fragments (triples, IRIs,
//! solution modifiers) so the generated text stays easy to audit in logs.

use handlebars::Handlebars;
use oxrdf::{Literal, NamedNode};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use super::{QueryError, QueryResult};
use crate::mapping::{Pattern, TextConstraint};
use crate::rdf::{turtle_lines, Term, Triple, TripleDiff, DEFAULT_OVERRIDES, RDF_TYPE};

const INSERT: &str = "insert";
const DELETE: &str = "delete";
const UPDATE: &str = "update";
const SELECT: &str = "select";
const DEEP: &str = "deep";
const PAGED: &str = "paged";
const SORTED: &str = "sorted";
const ID_EXISTS: &str = "id_exists";
const ID_IS_OF_CLASS: &str = "id_is_of_class";
const VARIANTS: &str = "variants";
const TEXT: &str = "text";

const INSERT_TEMPLATE: &str = "INSERT DATA {
  GRAPH <{{graph}}> {
{{#each triples}}    {{this}}
{{/each}}  }
}";

const DELETE_TEMPLATE: &str = "DELETE DATA {
  GRAPH <{{graph}}> {
{{#each triples}}    {{this}}
{{/each}}  }
}";

const UPDATE_TEMPLATE: &str = "DELETE DATA {
  GRAPH <{{graph}}> {
{{#each remove}}    {{this}}
{{/each}}  }
} ;
INSERT DATA {
  GRAPH <{{graph}}> {
{{#each add}}    {{this}}
{{/each}}  }
}";

const SELECT_TEMPLATE: &str = "SELECT (<{{id}}> AS ?s) ?p ?o
FROM <{{graph}}>
WHERE { <{{id}}> ?p ?o }";

const DEEP_TEMPLATE: &str = "CONSTRUCT {
  <{{id}}> ?prop ?val .
  ?child ?childProp ?childPropVal .
  ?someSubj ?incomingChildProp ?child .
}
FROM <{{graph}}>
WHERE {
  { <{{id}}> ?prop ?val }
  UNION
  {
    <{{id}}> (<{{overrides}}>|!<{{overrides}}>)+ ?child .
    ?child ?childProp ?childPropVal .
    ?someSubj ?incomingChildProp ?child .
  }
}";

const PAGED_TEMPLATE: &str = "SELECT DISTINCT ?s ?p ?o
FROM <{{graph}}>
WHERE {
  {
    SELECT DISTINCT ({{symbol}} AS ?s) WHERE {
{{body}}
    }
    ORDER BY ?s{{paging}}
  }
  ?s ?p ?o .
}
ORDER BY ?s";

const SORTED_TEMPLATE: &str = "SELECT DISTINCT ?s ?p ?o
FROM <{{graph}}>
WHERE {
  {
    SELECT ?s (MIN(?sortValue) AS ?sort) WHERE {
      {
        SELECT DISTINCT ({{symbol}} AS ?s) WHERE {
{{body}}
        }
      }
      OPTIONAL { ?s <{{sort}}> ?sortValue }
    }
    GROUP BY ?s
    ORDER BY {{direction}}(?sort) ?s{{paging}}
  }
  ?s ?p ?o .
}
ORDER BY {{direction}}(?sort) ?s";

const ID_EXISTS_TEMPLATE: &str = "ASK
FROM <{{graph}}>
{ <{{id}}> a ?type }";

const ID_IS_OF_CLASS_TEMPLATE: &str = "ASK
FROM <{{graph}}>
{ <{{id}}> a <{{entity}}> }";

const VARIANTS_TEMPLATE: &str = "{
{{#each variants}}{{#unless @first}}  UNION
{{/unless}}  {
    SELECT ({{symbol}} AS {{main}}) WHERE {
{{body}}
    }
  }
{{/each}}
}";

const TEXT_TEMPLATE: &str = "{
{{#each texts}}{{#unless @first}}  UNION
{{/unless}}  {
    {{subject}} <{{predicate}}> ?text{{@index}} .
    FILTER regex(str(?text{{@index}}), {{pattern}}, \"i\")
  }
{{/each}}
}";

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "ASC"),
            Direction::Desc => write!(f, "DESC"),
        }
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(QueryError::InvalidArgument(format!(
                "unknown sort direction {other:?}"
            ))),
        }
    }
}

/// Order results by the value of one predicate, id breaking ties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub predicate: NamedNode,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(predicate: NamedNode, direction: Direction) -> Self {
        Self {
            predicate,
            direction,
        }
    }
}

/// Result window of a multi-result query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of entities; `None` returns every match
    pub limit: Option<u64>,
    /// Entities to skip
    pub offset: u64,
    pub sort: Option<SortOrder>,
}

impl Page {
    /// Every match, ordered by id
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset,
            sort: None,
        }
    }

    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    fn modifiers(&self) -> String {
        let mut out = String::new();
        if let Some(limit) = self.limit {
            out.push_str(&format!("\n    LIMIT {limit}"));
        }
        if self.offset > 0 {
            out.push_str(&format!("\n    OFFSET {}", self.offset));
        }
        out
    }
}

/// Renders SPARQL text for one graph
pub struct QueryBuilder {
    graph: String,
    overrides: String,
    validate: bool,
    registry: Handlebars<'static>,
}

impl QueryBuilder {
    /// Create a builder for `graph`, which must be an absolute IRI
    pub fn new(graph: impl Into<String>) -> QueryResult<Self> {
        let graph = graph.into();
        oxiri::Iri::parse(graph.as_str())
            .map_err(|e| QueryError::InvalidArgument(format!("graph {graph:?}: {e}")))?;

        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);

        for (name, template) in [
            (INSERT, INSERT_TEMPLATE),
            (DELETE, DELETE_TEMPLATE),
            (UPDATE, UPDATE_TEMPLATE),
            (SELECT, SELECT_TEMPLATE),
            (DEEP, DEEP_TEMPLATE),
            (PAGED, PAGED_TEMPLATE),
            (SORTED, SORTED_TEMPLATE),
            (ID_EXISTS, ID_EXISTS_TEMPLATE),
            (ID_IS_OF_CLASS, ID_IS_OF_CLASS_TEMPLATE),
            (VARIANTS, VARIANTS_TEMPLATE),
            (TEXT, TEXT_TEMPLATE),
        ] {
            registry.register_template_string(name, template)?;
        }

        Ok(Self {
            graph,
            overrides: DEFAULT_OVERRIDES.to_string(),
            validate: false,
            registry,
        })
    }

    /// Link followed by select-deep to merge inherited data
    pub fn with_overrides(mut self, predicate: impl Into<String>) -> Self {
        self.overrides = predicate.into();
        self
    }

    /// Parse every generated query before handing it out
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn graph(&self) -> &str {
        &self.graph
    }

    pub fn overrides(&self) -> &str {
        &self.overrides
    }

    /// `INSERT DATA` for a fully serialized value
    pub fn insert(&self, triples: &[Triple]) -> QueryResult<String> {
        let text = self.registry.render(
            INSERT,
            &json!({ "graph": self.graph, "triples": turtle_lines(triples) }),
        )?;
        self.checked_update(text)
    }

    /// `DELETE DATA` for exactly `triples`
    pub fn delete(&self, triples: &[Triple]) -> QueryResult<String> {
        let text = self.registry.render(
            DELETE,
            &json!({ "graph": self.graph, "triples": turtle_lines(triples) }),
        )?;
        self.checked_update(text)
    }

    /// Removal and addition of a diff in one request
    pub fn update(&self, diff: &TripleDiff) -> QueryResult<String> {
        let text = self.registry.render(
            UPDATE,
            &json!({
                "graph": self.graph,
                "remove": turtle_lines(&diff.remove),
                "add": turtle_lines(&diff.add),
            }),
        )?;
        self.checked_update(text)
    }

    /// Every predicate/object pair of one subject
    pub fn select(&self, id: &NamedNode) -> QueryResult<String> {
        let text = self
            .registry
            .render(SELECT, &json!({ "graph": self.graph, "id": id.as_str() }))?;
        self.checked_query(text)
    }

    /// Graph neighbourhood of one subject as a `CONSTRUCT`
    pub fn select_deep(&self, id: &NamedNode) -> QueryResult<String> {
        let text = self.registry.render(
            DEEP,
            &json!({
                "graph": self.graph,
                "id": id.as_str(),
                "overrides": self.overrides,
            }),
        )?;
        self.checked_query(text)
    }

    /// Every entity of class `entity`
    pub fn list(&self, entity: &NamedNode, page: &Page) -> QueryResult<String> {
        let symbol = Term::placeholder();
        let body = format!("      {symbol} <{RDF_TYPE}> {entity} .");
        self.paged(&symbol.to_string(), &body, page)
    }

    /// Entities matching the relevant triples of an example
    pub fn search(&self, pattern: &Pattern, page: &Page) -> QueryResult<String> {
        self.paged(&pattern.root.to_string(), &triples_block(&pattern.triples), page)
    }

    /// Entities matching `mandatory` and at least one of `variants`
    pub fn variant_search(
        &self,
        mandatory: &Pattern,
        variants: &[Pattern],
        page: &Page,
    ) -> QueryResult<String> {
        if variants.is_empty() {
            return self.search(mandatory, page);
        }
        let (main, mut body) = self.mandatory_body(mandatory);
        body.push_str(&self.variant_block(&main, variants)?);
        body.push_str(&main_filter(mandatory, &main));
        self.paged(&main, &body, page)
    }

    /// Entities of class `entity` where any text field of the example
    /// matches case-insensitively, optionally AND-ed with variants
    pub fn text_search(
        &self,
        entity: &NamedNode,
        pattern: Pattern,
        variants: &[Pattern],
        page: &Page,
    ) -> QueryResult<String> {
        let root = pattern.root.clone();
        let (main, mut body) = {
            let (structural, texts) = pattern.split_text();
            let main = match &root {
                Term::Variable(_) => root.to_string(),
                _ => Term::placeholder().to_string(),
            };
            let mut body = format!("      {main} <{RDF_TYPE}> {entity} .\n");
            body.push_str(&triples_block(&structural));
            body.push_str(&self.text_block(&root, &texts)?);
            (main, body)
        };
        body.push_str(&self.variant_block(&main, variants)?);
        if !root.is_variable() {
            body.push_str(&format!("\n      FILTER({main} = {root})"));
        }
        self.paged(&main, &body, page)
    }

    /// `ASK` whether the id carries any type
    pub fn id_exists(&self, id: &NamedNode) -> QueryResult<String> {
        let text = self
            .registry
            .render(ID_EXISTS, &json!({ "graph": self.graph, "id": id.as_str() }))?;
        self.checked_query(text)
    }

    /// `ASK` whether the id is an instance of `entity`
    pub fn id_is_of_class(&self, id: &NamedNode, entity: &NamedNode) -> QueryResult<String> {
        let text = self.registry.render(
            ID_IS_OF_CLASS,
            &json!({
                "graph": self.graph,
                "id": id.as_str(),
                "entity": entity.as_str(),
            }),
        )?;
        self.checked_query(text)
    }

    fn paged(&self, symbol: &str, body: &str, page: &Page) -> QueryResult<String> {
        let text = match &page.sort {
            None => self.registry.render(
                PAGED,
                &json!({
                    "graph": self.graph,
                    "symbol": symbol,
                    "body": body,
                    "paging": page.modifiers(),
                }),
            )?,
            Some(sort) => self.registry.render(
                SORTED,
                &json!({
                    "graph": self.graph,
                    "symbol": symbol,
                    "body": body,
                    "paging": page.modifiers(),
                    "sort": sort.predicate.as_str(),
                    "direction": sort.direction.to_string(),
                }),
            )?,
        };
        self.checked_query(text)
    }

    /// Mandatory triples keyed on a variable. A concrete root gets a fresh
    /// variable that `main_filter` pins to it.
    fn mandatory_body(&self, mandatory: &Pattern) -> (String, String) {
        let main = match &mandatory.root {
            Term::Variable(_) => mandatory.root.to_string(),
            _ => Term::placeholder().to_string(),
        };
        (main, triples_block(&mandatory.triples))
    }

    fn variant_block(&self, main: &str, variants: &[Pattern]) -> QueryResult<String> {
        if variants.is_empty() {
            return Ok(String::new());
        }
        let items: Vec<_> = variants
            .iter()
            .map(|v| {
                json!({
                    "main": main,
                    "symbol": v.root.to_string(),
                    "body": triples_block(&v.triples),
                })
            })
            .collect();
        let block = self
            .registry
            .render(VARIANTS, &json!({ "variants": items }))?;
        Ok(format!("\n{block}"))
    }

    fn text_block(&self, root: &Term, texts: &[TextConstraint]) -> QueryResult<String> {
        if texts.is_empty() {
            return Ok(String::new());
        }
        let items: Vec<_> = texts
            .iter()
            .map(|t| {
                let subject = t.subject.as_ref().unwrap_or(root);
                json!({
                    "subject": subject.to_string(),
                    "predicate": t.predicate.as_str(),
                    "pattern": Literal::new_simple_literal(&t.pattern).to_string(),
                })
            })
            .collect();
        let block = self.registry.render(TEXT, &json!({ "texts": items }))?;
        Ok(format!("\n{block}"))
    }

    pub(crate) fn checked_query(&self, text: String) -> QueryResult<String> {
        trace!(query = %text, "rendered query");
        if self.validate {
            spargebra::Query::parse(&text, None).map_err(|e| QueryError::Invalid {
                message: e.to_string(),
                text: text.clone(),
            })?;
        }
        Ok(text)
    }

    fn checked_update(&self, text: String) -> QueryResult<String> {
        trace!(update = %text, "rendered update");
        if self.validate {
            spargebra::Update::parse(&text, None).map_err(|e| QueryError::Invalid {
                message: e.to_string(),
                text: text.clone(),
            })?;
        }
        Ok(text)
    }
}

/// Triples as indented turtle statements
fn triples_block(triples: &[Triple]) -> String {
    turtle_lines(triples)
        .into_iter()
        .map(|line| format!("      {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn main_filter(mandatory: &Pattern, main: &str) -> String {
    match &mandatory.root {
        Term::Variable(_) => String::new(),
        root => format!("\n      FILTER({main} = {root})"),
    }
}
