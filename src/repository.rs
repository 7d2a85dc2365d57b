//! Device repository operations
//!
//! Thin per-entity helpers over [`Persistence`]. Free-text queries are
//! escaped before they reach the regular expression filter, so user input
//! matches literally.

use serde::Serialize;
use tracing::{debug, info};

use crate::model::{
    DeviceClass, DeviceInstance, DeviceToGateway, DeviceType, Endpoint, FieldType, Gateway,
    GatewayName, Protocol, Service, TypeAssignment, UltraShortDeviceType, ValueType, Vendor,
};
use crate::persistence::{Depth, Persistence, PersistenceError, PersistenceResult};
use crate::store::SparqlStore;

/// An entity that still references a value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dependent {
    ValueType { id: String, name: String },
    DeviceType { id: String, name: String },
}

/// Domain operations on one repository graph
pub struct DeviceRepository<S> {
    db: Persistence<S>,
}

impl<S: SparqlStore> DeviceRepository<S> {
    pub fn new(db: Persistence<S>) -> Self {
        Self { db }
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.db
    }

    pub async fn list_vendors(&self, limit: u64, offset: u64) -> PersistenceResult<Vec<Vendor>> {
        self.db.list(limit, offset).await
    }

    /// Assign ids and insert; returns the vendor id
    pub async fn create_vendor(&self, mut vendor: Vendor) -> PersistenceResult<String> {
        self.db.set_id_deep(&mut vendor).await?;
        self.db.insert(&vendor).await?;
        info!("Created vendor {}", vendor.id);
        Ok(vendor.id)
    }

    pub async fn list_device_classes(&self, limit: u64, offset: u64) -> PersistenceResult<Vec<DeviceClass>> {
        self.db.list(limit, offset).await
    }

    pub async fn create_device_class(&self, mut class: DeviceClass) -> PersistenceResult<String> {
        self.db.set_id_deep(&mut class).await?;
        self.db.insert(&class).await?;
        info!("Created device class {}", class.id);
        Ok(class.id)
    }

    pub async fn create_protocol(&self, mut protocol: Protocol) -> PersistenceResult<String> {
        self.db.set_id_deep(&mut protocol).await?;
        self.db.insert(&protocol).await?;
        info!("Created protocol {}", protocol.id);
        Ok(protocol.id)
    }

    /// The protocol served by a protocol handler, with its message structure
    pub async fn protocol_by_handler(&self, uri: &str) -> PersistenceResult<Protocol> {
        let example = Protocol {
            protocol_handler_url: uri.to_string(),
            ..Protocol::default()
        };
        let mut protocol = self
            .db
            .search(&example, 1, 0)
            .await?
            .into_iter()
            .next()
            .ok_or(PersistenceError::NotFound { entity: "Protocol" })?;
        self.db.select_deep(&mut protocol).await?;
        Ok(protocol)
    }

    /// Protocols whose name contains `query`; every protocol when it is empty
    pub async fn search_protocols(&self, query: &str, limit: u64, offset: u64) -> PersistenceResult<Vec<Protocol>> {
        let found: Vec<Protocol> = if query.is_empty() {
            self.db.list(limit, offset).await?
        } else {
            let example = Protocol {
                name: regex::escape(query),
                ..Protocol::default()
            };
            self.db.text_search(&example, limit, offset).await?
        };

        let mut protocols = Vec::with_capacity(found.len());
        for protocol in found {
            let mut full = Protocol {
                id: protocol.id,
                ..Protocol::default()
            };
            self.db.select_level(&mut full, Depth::Unlimited).await?;
            protocols.push(full);
        }
        Ok(protocols)
    }

    pub async fn create_value_type(&self, mut value_type: ValueType) -> PersistenceResult<String> {
        self.db.set_id_deep(&mut value_type).await?;
        self.db.insert(&value_type).await?;
        info!("Created value type {}", value_type.id);
        Ok(value_type.id)
    }

    pub async fn list_value_types(&self, limit: u64, offset: u64) -> PersistenceResult<Vec<ValueType>> {
        self.db.list(limit, offset).await
    }

    /// A value type with all nested fields and their types
    pub async fn value_type(&self, id: &str) -> PersistenceResult<ValueType> {
        let mut value_type = ValueType {
            id: id.to_string(),
            ..ValueType::default()
        };
        self.db.select_level(&mut value_type, Depth::Unlimited).await?;
        Ok(value_type)
    }

    pub async fn delete_value_type(&self, id: &str) -> PersistenceResult<()> {
        let value_type = self.value_type(id).await?;
        debug!(id, name = %value_type.name, "deleting value type");
        self.db.delete(&value_type).await
    }

    pub async fn value_type_exists(&self, id: &str) -> PersistenceResult<bool> {
        self.db.id_exists(id).await
    }

    /// Id of a stored value type with this structure: its own id when set,
    /// else the first exact match
    pub async fn find_value_type(&self, value_type: &ValueType) -> PersistenceResult<Option<String>> {
        if !value_type.id.is_empty() {
            return Ok(Some(value_type.id.clone()));
        }
        let found = self.db.search(value_type, 1, 0).await?;
        Ok(found.into_iter().next().map(|v| v.id))
    }

    /// Value types whose name contains `query`; a plain listing when empty
    pub async fn search_value_types(&self, query: &str, limit: u64, offset: u64) -> PersistenceResult<Vec<ValueType>> {
        if query.is_empty() {
            return self.list_value_types(limit, offset).await;
        }
        let example = ValueType {
            name: regex::escape(query),
            ..ValueType::default()
        };
        self.db.text_search(&example, limit, offset).await
    }

    /// First entity that still uses value type `id`: as a structure field
    /// or as a service input or output
    pub async fn value_type_dependents(&self, id: &str) -> PersistenceResult<Option<Dependent>> {
        let referenced = || ValueType {
            id: id.to_string(),
            ..ValueType::default()
        };

        let as_field = ValueType {
            fields: vec![FieldType {
                value_type: referenced(),
                ..FieldType::default()
            }],
            ..ValueType::default()
        };
        if let Some(found) = self.db.search(&as_field, 1, 0).await?.into_iter().next() {
            return Ok(Some(Dependent::ValueType {
                id: found.id,
                name: found.name,
            }));
        }

        let assignment = || {
            vec![TypeAssignment {
                value_type: referenced(),
                ..TypeAssignment::default()
            }]
        };
        let as_input = Service {
            input: assignment(),
            ..Service::default()
        };
        let as_output = Service {
            output: assignment(),
            ..Service::default()
        };
        for service in [as_input, as_output] {
            let example = DeviceType {
                services: vec![service],
                ..DeviceType::default()
            };
            if let Some(found) = self.db.search(&example, 1, 0).await?.into_iter().next() {
                return Ok(Some(Dependent::DeviceType {
                    id: found.id,
                    name: found.name,
                }));
            }
        }
        Ok(None)
    }

    pub async fn list_device_types(&self, limit: u64, offset: u64) -> PersistenceResult<Vec<DeviceType>> {
        self.db.list(limit, offset).await
    }

    pub async fn device_type(&self, id: &str, depth: impl Into<Depth>) -> PersistenceResult<DeviceType> {
        let mut device_type = DeviceType {
            id: id.to_string(),
            ..DeviceType::default()
        };
        self.db.select_level(&mut device_type, depth).await?;
        Ok(device_type)
    }

    pub async fn delete_device_type(&self, id: &str) -> PersistenceResult<()> {
        let device_type = self.device_type(id, Depth::Unlimited).await?;
        self.db.delete(&device_type).await
    }

    /// The device type offering a service
    pub async fn device_type_id_by_service(&self, service_id: &str) -> PersistenceResult<String> {
        let example = UltraShortDeviceType {
            service: service_id.to_string(),
            ..UltraShortDeviceType::default()
        };
        Ok(self.db.search_one(&example).await?.id)
    }

    pub async fn device_instance(&self, id: &str) -> PersistenceResult<DeviceInstance> {
        let mut instance = DeviceInstance {
            id: id.to_string(),
            ..DeviceInstance::default()
        };
        self.db.select_level(&mut instance, Depth::Unlimited).await?;
        Ok(instance)
    }

    pub async fn gateway(&self, id: &str) -> PersistenceResult<Gateway> {
        let mut gateway = Gateway {
            id: id.to_string(),
            ..Gateway::default()
        };
        self.db.select_level(&mut gateway, Depth::Unlimited).await?;
        Ok(gateway)
    }

    pub async fn gateway_name(&self, id: &str) -> PersistenceResult<String> {
        let mut gateway = GatewayName {
            id: id.to_string(),
            ..GatewayName::default()
        };
        self.db.select(&mut gateway).await?;
        Ok(gateway.name)
    }

    /// Name of the gateway a device is connected by; empty when it has none
    pub async fn gateway_name_by_device(&self, device_id: &str) -> PersistenceResult<String> {
        let mut device = DeviceToGateway {
            id: device_id.to_string(),
            ..DeviceToGateway::default()
        };
        self.db.select_level(&mut device, Depth::Unlimited).await?;
        Ok(device.gateway.name)
    }

    pub async fn endpoints(&self, endpoint: &str, protocol_handler: &str) -> PersistenceResult<Vec<Endpoint>> {
        let example = Endpoint {
            endpoint: endpoint.to_string(),
            protocol_handler: protocol_handler.to_string(),
            ..Endpoint::default()
        };
        self.db.search_all(&example).await
    }

    pub async fn endpoint_by_device_and_service(&self, device_id: &str, service_id: &str) -> PersistenceResult<Endpoint> {
        let example = Endpoint {
            device: device_id.to_string(),
            service: service_id.to_string(),
            ..Endpoint::default()
        };
        self.db
            .search(&example, 1, 0)
            .await?
            .into_iter()
            .next()
            .ok_or(PersistenceError::NotFound { entity: "Endpoint" })
    }

    pub async fn list_endpoints(&self, limit: u64, offset: u64) -> PersistenceResult<Vec<Endpoint>> {
        self.db.list(limit, offset).await
    }
}
