use forti_sync::config::ProviderConfig;
use forti_sync::expand::get_object;
use forti_sync::flatten::refresh_object;
use forti_sync::schema::load_schema;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn read_back_of_written_payload_matches_declared_state() {
    let (schema, _) = load_schema("firewall_internetservicegroup", None).expect("schema");
    let config = ProviderConfig {
        dynamic_sort_subtable: "natural".to_string(),
        ..ProviderConfig::default()
    };
    let declared = json!({
        "name": "grp1",
        "comment": "edge services",
        "member": [{"name": "svc2", "id": 2}, {"name": "svc10", "id": 10}]
    });
    let declared = declared.as_object().expect("object");

    let payload = get_object(&schema, declared, &config, false).expect("payload");
    assert_eq!(payload.get("member").and_then(|m| m.as_array()).map(Vec::len), Some(2));

    let refreshed = refresh_object(&schema, &payload, declared, &config).expect("refresh");
    assert_eq!(&refreshed, declared);
}

#[test]
fn version_gated_fields_survive_round_trip_on_new_firmware() {
    let (schema, _) = load_schema("system_netflow", None).expect("schema");
    let config = ProviderConfig {
        firmware_version: Some("7.4.0".to_string()),
        ..ProviderConfig::default()
    };
    let declared = json!({
        "active_flow_timeout": 120,
        "collectors": [{"id": 2, "collector_ip": "192.0.2.9", "collector_port": 2055}]
    });
    let declared = declared.as_object().expect("object");

    let payload = get_object(&schema, declared, &config, false).expect("payload");
    assert_eq!(
        serde_json::Value::Object(payload.clone()),
        json!({
            "active-flow-timeout": 120,
            "collectors": [{"id": 2, "collector-ip": "192.0.2.9", "collector-port": 2055}]
        })
    );

    let refreshed = refresh_object(&schema, &payload, declared, &config).expect("refresh");
    assert_eq!(&refreshed, declared);
}
