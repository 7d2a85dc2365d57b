//! Base types a value type can be built on

use serde::{Deserialize, Serialize};

use super::{Format, SmartObject, ValueType};
use crate::rdf::{XSD_BOOLEAN, XSD_DECIMAL, XSD_INTEGER, XSD_STRING};

/// Prefix of every class and property in the repository ontology
pub const NAMESPACE: &str = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#";

pub const INDEX_STRUCT_BASE_TYPE: &str =
    "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#index_structure";
pub const STRUCT_BASE_TYPE: &str =
    "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#structure";
pub const MAP_BASE_TYPE: &str = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#map";
pub const LIST_BASE_TYPE: &str = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#list";

/// Values offered to clients when they build types and services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedValues {
    pub service_types: Vec<SmartObject>,
    pub formats: Vec<Format>,
    pub primitive: Vec<String>,
    pub collections: Vec<String>,
    pub structures: Vec<String>,
    pub map: Vec<String>,
    pub set: Vec<String>,
}

impl AllowedValues {
    /// The fixed base-type vocabulary; service types and formats are left
    /// for the caller to fill from the store
    pub fn base() -> Self {
        Self {
            service_types: Vec::new(),
            formats: Vec::new(),
            primitive: [XSD_STRING, XSD_INTEGER, XSD_DECIMAL, XSD_BOOLEAN]
                .map(String::from)
                .to_vec(),
            collections: vec![LIST_BASE_TYPE.to_string(), MAP_BASE_TYPE.to_string()],
            structures: vec![
                INDEX_STRUCT_BASE_TYPE.to_string(),
                STRUCT_BASE_TYPE.to_string(),
            ],
            map: vec![MAP_BASE_TYPE.to_string()],
            set: vec![LIST_BASE_TYPE.to_string()],
        }
    }

    pub fn is_map(&self, value_type: &ValueType) -> bool {
        contains(&self.map, value_type)
    }

    pub fn is_set(&self, value_type: &ValueType) -> bool {
        contains(&self.set, value_type)
    }

    pub fn is_collection(&self, value_type: &ValueType) -> bool {
        contains(&self.collections, value_type)
    }

    pub fn is_structure(&self, value_type: &ValueType) -> bool {
        contains(&self.structures, value_type)
    }

    pub fn is_primitive(&self, value_type: &ValueType) -> bool {
        contains(&self.primitive, value_type)
    }
}

fn contains(base_types: &[String], value_type: &ValueType) -> bool {
    base_types.iter().any(|b| *b == value_type.base_type)
}
