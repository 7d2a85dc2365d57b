//! Device repository operations against the embedded store
#![cfg(feature = "embedded")]

use device_repo::model::{
    DeviceInstance, DeviceType, Endpoint, FieldType, Gateway, MsgSegment, Protocol, Service,
    TypeAssignment, ValueType, Vendor,
};
use device_repo::{Dependent, DeviceRepository, MemoryStore, Persistence, PersistenceError, QueryBuilder};

const GRAPH: &str = "http://example.org/repository";

fn repo() -> DeviceRepository<MemoryStore> {
    let queries = QueryBuilder::new(GRAPH).unwrap().with_validation(true);
    DeviceRepository::new(Persistence::new(MemoryStore::new().unwrap(), queries))
}

fn iri(local: &str) -> String {
    format!("http://example.org/{local}")
}

fn value_type(local: &str, name: &str) -> ValueType {
    ValueType {
        id: iri(local),
        name: name.to_string(),
        ..ValueType::default()
    }
}

#[tokio::test]
async fn test_create_and_list_vendors() {
    let repo = repo();
    let acme = repo
        .create_vendor(Vendor {
            name: "Acme".into(),
            ..Vendor::default()
        })
        .await
        .unwrap();
    assert!(acme.starts_with(&format!("{GRAPH}#")));

    repo.create_vendor(Vendor {
        name: "Globex".into(),
        ..Vendor::default()
    })
    .await
    .unwrap();

    let vendors = repo.list_vendors(10, 0).await.unwrap();
    assert_eq!(vendors.len(), 2);
    assert!(vendors.iter().any(|v| v.id == acme && v.name == "Acme"));
}

#[tokio::test]
async fn test_value_type_search_matches_literally() {
    let repo = repo();
    let db = repo.persistence();
    db.insert(&value_type("vt/celsius", "Temp (°C) reading")).await.unwrap();
    db.insert(&value_type("vt/temperature", "temperature")).await.unwrap();
    db.insert(&value_type("vt/any", "Temp C")).await.unwrap();

    let found = repo.search_value_types("temp (°c)", 10, 0).await.unwrap();
    let ids: Vec<_> = found.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, [iri("vt/celsius")]);

    let all = repo.search_value_types("", 10, 0).await.unwrap();
    assert_eq!(all.len(), 3);

    assert!(repo.value_type_exists(&iri("vt/any")).await.unwrap());
    assert_eq!(
        repo.find_value_type(&ValueType {
            name: "temperature".into(),
            ..ValueType::default()
        })
        .await
        .unwrap(),
        Some(iri("vt/temperature"))
    );
}

#[tokio::test]
async fn test_value_type_dependents() {
    let repo = repo();
    let db = repo.persistence();
    let int = value_type("vt/int", "int");
    db.insert(&int).await.unwrap();
    assert_eq!(repo.value_type_dependents(&int.id).await.unwrap(), None);

    let point = ValueType {
        fields: vec![FieldType {
            id: iri("field/x"),
            name: "x".into(),
            value_type: ValueType {
                id: int.id.clone(),
                ..ValueType::default()
            },
        }],
        ..value_type("vt/point", "point")
    };
    db.insert(&point).await.unwrap();
    assert_eq!(
        repo.value_type_dependents(&int.id).await.unwrap(),
        Some(Dependent::ValueType {
            id: point.id.clone(),
            name: "point".into(),
        })
    );

    repo.delete_value_type(&point.id).await.unwrap();
    assert!(!repo.value_type_exists(&point.id).await.unwrap());
    assert!(repo.value_type_exists(&int.id).await.unwrap());
    assert_eq!(repo.value_type_dependents(&int.id).await.unwrap(), None);

    let device_type = DeviceType {
        id: iri("dt/counter"),
        name: "Counter".into(),
        services: vec![Service {
            id: iri("service/read"),
            name: "read".into(),
            output: vec![TypeAssignment {
                id: iri("assignment/out"),
                name: "count".into(),
                value_type: ValueType {
                    id: int.id.clone(),
                    ..ValueType::default()
                },
                ..TypeAssignment::default()
            }],
            ..Service::default()
        }],
        ..DeviceType::default()
    };
    db.insert(&device_type).await.unwrap();
    assert_eq!(
        repo.value_type_dependents(&int.id).await.unwrap(),
        Some(Dependent::DeviceType {
            id: device_type.id.clone(),
            name: "Counter".into(),
        })
    );
}

#[tokio::test]
async fn test_device_type_lookup_and_delete() {
    let repo = repo();
    let db = repo.persistence();
    let vendor = Vendor {
        id: iri("vendor/acme"),
        name: "Acme".into(),
    };
    let device_type = DeviceType {
        id: iri("dt/lamp"),
        name: "Lamp".into(),
        vendor: vendor.clone(),
        services: vec![Service {
            id: iri("service/on"),
            name: "on".into(),
            ..Service::default()
        }],
        ..DeviceType::default()
    };
    db.insert(&device_type).await.unwrap();

    assert_eq!(
        repo.device_type_id_by_service(&iri("service/on")).await.unwrap(),
        device_type.id
    );
    assert!(matches!(
        repo.device_type_id_by_service(&iri("service/off")).await,
        Err(PersistenceError::NotFound { .. })
    ));

    let shallow = repo.device_type(&device_type.id, 0).await.unwrap();
    assert_eq!(shallow.vendor.id, vendor.id);
    assert!(shallow.vendor.name.is_empty());
    let full = repo.device_type(&device_type.id, -1).await.unwrap();
    assert_eq!(full, device_type);

    repo.delete_device_type(&device_type.id).await.unwrap();
    assert!(!db.id_exists(&device_type.id).await.unwrap());
    assert!(!db.id_exists(&iri("service/on")).await.unwrap());
    assert!(db.id_exists(&vendor.id).await.unwrap());
}

#[tokio::test]
async fn test_protocols() {
    let repo = repo();
    let id = repo
        .create_protocol(Protocol {
            protocol_handler_url: "mqtt".into(),
            name: "MQTT".into(),
            msg_structure: vec![MsgSegment {
                name: "payload".into(),
                ..MsgSegment::default()
            }],
            ..Protocol::default()
        })
        .await
        .unwrap();

    let protocol = repo.protocol_by_handler("mqtt").await.unwrap();
    assert_eq!(protocol.id, id);
    assert_eq!(protocol.msg_structure[0].name, "payload");
    assert!(matches!(
        repo.protocol_by_handler("coap").await,
        Err(PersistenceError::NotFound { entity: "Protocol" })
    ));

    let found = repo.search_protocols("mq", 10, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].msg_structure[0].name, "payload");
    assert!(repo.search_protocols("http", 10, 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gateway_of_device() {
    let repo = repo();
    let db = repo.persistence();
    let device = DeviceInstance {
        id: iri("device/lamp"),
        name: "kitchen lamp".into(),
        gateway: iri("gateway/home"),
        ..DeviceInstance::default()
    };
    let gateway = Gateway {
        id: iri("gateway/home"),
        name: "home".into(),
        devices: vec![device.clone()],
        ..Gateway::default()
    };
    db.insert(&gateway).await.unwrap();

    assert_eq!(repo.gateway_name(&gateway.id).await.unwrap(), "home");
    assert_eq!(repo.gateway_name_by_device(&device.id).await.unwrap(), "home");
    assert_eq!(repo.gateway(&gateway.id).await.unwrap(), gateway);
    assert_eq!(repo.device_instance(&device.id).await.unwrap(), device);
}

#[tokio::test]
async fn test_endpoints() {
    let repo = repo();
    let db = repo.persistence();
    let endpoint = |local: &str, path: &str, device: &str, service: &str| Endpoint {
        id: iri(local),
        endpoint: path.to_string(),
        service: iri(service),
        device: iri(device),
        protocol_handler: "mqtt".into(),
    };
    db.insert(&endpoint("ep/1", "/lamp/on", "device/lamp", "service/on")).await.unwrap();
    db.insert(&endpoint("ep/2", "/lamp/off", "device/lamp", "service/off")).await.unwrap();

    let found = repo.endpoints("/lamp/on", "mqtt").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, iri("ep/1"));
    assert!(repo.endpoints("/lamp/on", "http").await.unwrap().is_empty());

    let off = repo
        .endpoint_by_device_and_service(&iri("device/lamp"), &iri("service/off"))
        .await
        .unwrap();
    assert_eq!(off.endpoint, "/lamp/off");
    assert!(matches!(
        repo.endpoint_by_device_and_service(&iri("device/lamp"), &iri("service/dim")).await,
        Err(PersistenceError::NotFound { entity: "Endpoint" })
    ));

    assert_eq!(repo.list_endpoints(10, 0).await.unwrap().len(), 2);
}
