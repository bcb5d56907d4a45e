//! Map marshaling round-trips and partial-update semantics.

use std::sync::Arc;

use protea_core::{Constraint, Entity, Kind, ModelError, Schema, Value};
use protea_interchange::{apply_map_to_entity, entity_to_map, StaticSchemaResolver};

fn address_schema() -> Arc<Schema> {
    Schema::builder("address")
        .property("street", Kind::Text)
        .property("state", Kind::Text)
        .constraint(
            "state",
            Constraint::Length {
                min: Some(2),
                max: Some(2),
            },
        )
        .build()
}

fn email_schema() -> Arc<Schema> {
    Schema::builder("email").property("email", Kind::Text).build()
}

fn contact_schema() -> Arc<Schema> {
    Schema::builder("contact")
        .property("name", Kind::Text)
        .property("balance", Kind::Decimal)
        .property("since", Kind::Date)
        .relation("address", "address")
        .relation_list("emails", "email")
        .list_property("tags", Kind::Text)
        .build()
}

fn resolver() -> StaticSchemaResolver {
    let mut resolver = StaticSchemaResolver::empty();
    resolver.register(address_schema());
    resolver.register(email_schema());
    resolver.register(contact_schema());
    resolver
}

fn sample_contact() -> Entity {
    let mut address = Entity::new(address_schema());
    address.set("street", Value::from("12 Main St")).unwrap();
    address.set("state", Value::from("NY")).unwrap();

    let mut home = Entity::new(email_schema());
    home.set("email", Value::from("ada@example.com")).unwrap();
    let mut work = Entity::new(email_schema());
    work.set("email", Value::from("ada@work.example")).unwrap();

    let mut contact = Entity::with_id(contact_schema(), "42");
    contact.set("name", Value::from("Ada Lovelace")).unwrap();
    contact.set("balance", Value::from("1250.75")).unwrap();
    contact.set("since", Value::from("2019-03-14")).unwrap();
    contact.set("address", Value::from(address)).unwrap();
    contact.add("emails", Value::from(home)).unwrap();
    contact.add("emails", Value::from(work)).unwrap();
    contact.add("tags", Value::from("vip")).unwrap();
    contact
}

#[test]
fn round_trip_preserves_structure() {
    let original = sample_contact();
    let map = entity_to_map(&original);

    let mut rebuilt = Entity::new(contact_schema());
    apply_map_to_entity(&mut rebuilt, &map, &resolver()).unwrap();

    assert_eq!(rebuilt, original);
}

#[test]
fn map_serializes_nested_graphs() {
    let map = entity_to_map(&sample_contact());
    let json = serde_json::Value::Object(map);

    assert_eq!(json["id"], "42");
    assert_eq!(json["balance"], "1250.75");
    assert_eq!(json["since"], "2019-03-14");
    assert_eq!(json["address"]["state"], "NY");
    assert_eq!(json["emails"][1]["email"], "ada@work.example");
    assert_eq!(json["tags"][0], "vip");
}

#[test]
fn absent_keys_leave_attributes_untouched() {
    let mut contact = sample_contact();
    let patch = serde_json::json!({ "name": "Augusta Ada King" });

    apply_map_to_entity(
        &mut contact,
        patch.as_object().unwrap(),
        &resolver(),
    )
    .unwrap();

    assert_eq!(
        contact.get("name").unwrap(),
        &Value::from("Augusta Ada King")
    );
    // Everything else is untouched, including the nested graph.
    assert_eq!(
        contact
            .get_property("address.state", Kind::Text)
            .unwrap(),
        &Value::from("NY")
    );
    assert_eq!(contact.id(), Some("42"));
}

#[test]
fn null_clears_scalars_and_lists() {
    let mut contact = sample_contact();
    let patch = serde_json::json!({
        "balance": null,
        "address": null,
        "tags": null,
    });

    apply_map_to_entity(&mut contact, patch.as_object().unwrap(), &resolver()).unwrap();

    assert_eq!(contact.get("balance").unwrap(), &Value::Null);
    assert_eq!(contact.get("address").unwrap(), &Value::Null);
    assert_eq!(contact.get("tags").unwrap(), &Value::List(Vec::new()));
}

#[test]
fn nested_maps_update_the_existing_entity_in_place() {
    let mut contact = sample_contact();
    let patch = serde_json::json!({ "address": { "state": "CA" } });

    apply_map_to_entity(&mut contact, patch.as_object().unwrap(), &resolver()).unwrap();

    assert_eq!(
        contact.get_property("address.state", Kind::Text).unwrap(),
        &Value::from("CA")
    );
    // Partial nested update: the street survives.
    assert_eq!(
        contact.get_property("address.street", Kind::Text).unwrap(),
        &Value::from("12 Main St")
    );
}

#[test]
fn nested_maps_build_fresh_entities_when_absent() {
    let mut contact = Entity::new(contact_schema());
    let patch = serde_json::json!({
        "emails": [ { "email": "a@example.com" }, { "email": "b@example.com" } ],
    });

    apply_map_to_entity(&mut contact, patch.as_object().unwrap(), &resolver()).unwrap();

    assert_eq!(
        contact.get_property("emails[0].email", Kind::Text).unwrap(),
        &Value::from("a@example.com")
    );
    assert_eq!(
        contact.get_property("emails[1].email", Kind::Text).unwrap(),
        &Value::from("b@example.com")
    );
}

#[test]
fn unknown_keys_are_rejected() {
    let mut contact = Entity::new(contact_schema());
    let patch = serde_json::json!({ "nickname": "Ada" });

    let err = apply_map_to_entity(&mut contact, patch.as_object().unwrap(), &resolver())
        .unwrap_err();
    assert!(matches!(err, ModelError::UnknownAttribute { .. }));
}

#[test]
fn missing_related_schema_propagates_unmodified() {
    let mut contact = Entity::new(contact_schema());
    let patch = serde_json::json!({ "address": { "state": "NY" } });

    let err = apply_map_to_entity(
        &mut contact,
        patch.as_object().unwrap(),
        &StaticSchemaResolver::empty(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ModelError::MissingRelatedSchema {
            name: "address".to_string()
        }
    );
}

#[test]
fn application_is_fail_fast_without_rollback() {
    let mut contact = Entity::new(contact_schema());
    // serde_json's preserve_order feature keeps the literal key order, so
    // "name" applies before "nickname" fails.
    let patch = serde_json::json!({ "name": "Ada", "nickname": "?" });

    let err = apply_map_to_entity(&mut contact, patch.as_object().unwrap(), &resolver());
    assert!(err.is_err());
    assert_eq!(contact.get("name").unwrap(), &Value::from("Ada"));
}
