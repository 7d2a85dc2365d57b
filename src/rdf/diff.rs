//! Set difference between two triple sets
//!
//! Triples are compared by their rendered `subject::predicate::object` key,
//! so two placeholders with different names never compare equal.

use indexmap::IndexMap;

use super::Triple;

/// Result of [`diff`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleDiff {
    /// Triples present in the old set only
    pub remove: Vec<Triple>,
    /// Triples present in the new set only
    pub add: Vec<Triple>,
}

impl TripleDiff {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

fn index(triples: &[Triple]) -> IndexMap<String, &Triple> {
    let mut map = IndexMap::with_capacity(triples.len());
    for triple in triples {
        map.entry(triple.hash_key()).or_insert(triple);
    }
    map
}

/// Compute `(old - new, new - old)`.
///
/// Output keeps first-appearance order and contains no duplicates.
pub fn diff(old: &[Triple], new: &[Triple]) -> TripleDiff {
    let old_index = index(old);
    let new_index = index(new);

    let remove = old_index
        .iter()
        .filter(|(key, _)| !new_index.contains_key(*key))
        .map(|(_, triple)| (*triple).clone())
        .collect();
    let add = new_index
        .iter()
        .filter(|(key, _)| !old_index.contains_key(*key))
        .map(|(_, triple)| (*triple).clone())
        .collect();

    TripleDiff { remove, add }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Term;
    use oxrdf::NamedNode;

    fn t(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(
            Term::iri(s).unwrap(),
            NamedNode::new(p).unwrap(),
            Term::literal(o),
        )
    }

    #[test]
    fn test_diff_basic() {
        let a = vec![t("urn:a", "urn:p", "1"), t("urn:a", "urn:q", "2")];
        let b = vec![t("urn:a", "urn:p", "1"), t("urn:a", "urn:q", "3")];
        let d = diff(&a, &b);
        assert_eq!(d.remove, vec![t("urn:a", "urn:q", "2")]);
        assert_eq!(d.add, vec![t("urn:a", "urn:q", "3")]);
    }

    #[test]
    fn test_diff_symmetry() {
        let a = vec![t("urn:a", "urn:p", "1"), t("urn:b", "urn:p", "x")];
        let b = vec![t("urn:b", "urn:p", "x"), t("urn:c", "urn:p", "y")];
        let ab = diff(&a, &b);
        let ba = diff(&b, &a);
        assert_eq!(ab.remove, ba.add);
        assert_eq!(ab.add, ba.remove);
    }

    #[test]
    fn test_diff_idempotence() {
        let a = vec![t("urn:a", "urn:p", "1"), t("urn:a", "urn:p", "1")];
        assert!(diff(&a, &a).is_empty());
    }

    #[test]
    fn test_diff_deduplicates() {
        let a = vec![t("urn:a", "urn:p", "1"), t("urn:a", "urn:p", "1")];
        let d = diff(&a, &[]);
        assert_eq!(d.remove.len(), 1);
        assert!(d.add.is_empty());
    }
}
