//! Device repository domain model
//!
//! Every entity is mapped with `#[derive(Entity)]` and serialized to JSON
//! with serde. Several types share an entity class and describe different
//! projections of the same stored resource (for example [`Gateway`],
//! [`GatewayFlat`] and [`GatewayName`]).

mod sort;
mod validation;
mod vocabulary;

pub use sort::sort_by_id;
pub use validation::{ValidationError, ValidationResult};
pub use vocabulary::{
    AllowedValues, INDEX_STRUCT_BASE_TYPE, LIST_BASE_TYPE, MAP_BASE_TYPE, NAMESPACE,
    STRUCT_BASE_TYPE,
};

use serde::{Deserialize, Serialize};

use crate::Entity;

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Vendor", root)]
#[serde(default)]
pub struct Vendor {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#DeviceClass", root)]
#[serde(default)]
pub struct DeviceClass {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Service kind (`Actuator`, `Sensor`)
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#SmartObject", root)]
#[serde(default)]
pub struct SmartObject {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Payload format such as JSON or XML
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Format", root)]
#[serde(default)]
pub struct Format {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Named part of a protocol message
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#MsgSegment", root)]
#[serde(default)]
pub struct MsgSegment {
    #[rdf(id)]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasConstraint", reference)]
    pub constraints: Vec<String>,
}

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Protocol", root)]
#[serde(default)]
pub struct Protocol {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#protocol_handler_url")]
    pub protocol_handler_url: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#description")]
    pub description: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasMsgSegment")]
    pub msg_structure: Vec<MsgSegment>,
}

/// Value type of one structure field
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#FieldType")]
#[serde(default)]
pub struct FieldType {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasValueType")]
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// Data type of a message segment. A non-empty `literal` makes it a
/// constant.
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#ValueType", root)]
#[serde(default)]
pub struct ValueType {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#description")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasBaseType", reference)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_type: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasField")]
    pub fields: Vec<FieldType>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasLiteral")]
    pub literal: String,
}

/// Format flag for one field; the field is borrowed, not owned
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#FormatInfo")]
#[serde(default)]
pub struct AdditionalFormatInfo {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasFormatinfoForField", lending)]
    pub field: FieldType,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasFormatFlag")]
    pub format_flag: String,
}

/// Binds a value type to a message segment of a service input or output
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#MsgSegmentAssignment")]
#[serde(default)]
pub struct TypeAssignment {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasMsgSegment")]
    pub msg_segment: MsgSegment,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasTypeAssigned")]
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasFormat", reference)]
    pub format: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasFormatInfo")]
    pub additional_formatinfo: Vec<AdditionalFormatInfo>,
}

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Service")]
#[serde(default)]
pub struct Service {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasServiceType", reference)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_type: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#description")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasProtocol")]
    pub protocol: Protocol,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasInput")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<TypeAssignment>,
    /// Alternative result types, e.g. plain text on success and JSON on error
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasOutput")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<TypeAssignment>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#url")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#endpoint_format")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub endpoint_format: String,
}

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Service")]
#[serde(default)]
pub struct ShortService {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasServiceType", reference)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_type: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#url")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
}

/// Configuration parameter declared by a device type
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#ConfigField")]
#[serde(default)]
pub struct ConfigFieldType {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Configuration value of a device instance
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#ConfigField")]
#[serde(default)]
pub struct ConfigField {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasValue")]
    pub value: String,
}

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#DeviceType", root)]
#[serde(default)]
pub struct DeviceType {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#description")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#generated")]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub generated: bool,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#maintenance")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub maintenance: Vec<String>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasDeviceClass")]
    pub device_class: DeviceClass,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasService")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#vendor")]
    pub vendor: Vendor,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasConfigParameter")]
    #[serde(rename = "config_parameter", skip_serializing_if = "Vec::is_empty")]
    pub config: Vec<ConfigFieldType>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#image", reference)]
    #[serde(rename = "img", skip_serializing_if = "String::is_empty")]
    pub img_url: String,
}

/// Device type reduced to its services
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#DeviceType", root)]
#[serde(default)]
pub struct ShortDeviceType {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasService")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ShortService>,
}

/// Device type projection used to find the owner of one service
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#DeviceType", root)]
#[serde(default)]
pub struct UltraShortDeviceType {
    #[rdf(id)]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasService", reference)]
    pub service: String,
}

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#DeviceInstance", root)]
#[serde(default)]
pub struct DeviceInstance {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasDeviceType", reference)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub device_type: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasConfig")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub config: Vec<ConfigField>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#url")]
    #[serde(rename = "uri", skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasTag")]
    pub tags: Vec<String>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hasUserTag")]
    pub user_tags: Vec<String>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#connectedByGateway", reference)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#image", reference)]
    #[serde(rename = "img", skip_serializing_if = "String::is_empty")]
    pub img_url: String,
}

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Gateway", root)]
#[serde(default)]
pub struct Gateway {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hash")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#connectsDevices")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<DeviceInstance>,
}

/// Gateway with device ids instead of device values
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Gateway", root)]
#[serde(default)]
pub struct GatewayFlat {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#connectsDevices", reference)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<String>,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#hash")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Gateway", root)]
#[serde(default)]
pub struct GatewayName {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#name")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Device instance reduced to the gateway it is connected by
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#DeviceInstance", root)]
#[serde(default)]
pub struct DeviceToGateway {
    #[rdf(id)]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#connectedByGateway")]
    pub gateway: GatewayName,
}

/// Resolved address of one service on one device
#[derive(Entity, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[rdf(entity = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#Endpoint")]
#[serde(default)]
pub struct Endpoint {
    #[rdf(id)]
    pub id: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#endpoint")]
    pub endpoint: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#refService", reference)]
    pub service: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#refDevice", reference)]
    pub device: String,
    #[rdf(field = "http://www.sepl.wifa.uni-leipzig.de/ontlogies/device-repo#protocol_handler")]
    pub protocol_handler: String,
}
