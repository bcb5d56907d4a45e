//! End-to-end validation over nested entity graphs.
//!
//! Builds a contact/address/email schema family, populates entity graphs,
//! and checks that `validate()` reports path-qualified violations for every
//! failing branch without short-circuiting.

use std::sync::Arc;

use protea_core::{Constraint, Entity, Kind, Schema, Value};

fn address_schema() -> Arc<Schema> {
    Schema::builder("address")
        .property("street", Kind::Text)
        .property("city", Kind::Text)
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
    Schema::builder("email")
        .property("email", Kind::Text)
        .constraint("email", Constraint::NotBlank)
        .build()
}

fn contact_schema() -> Arc<Schema> {
    Schema::builder("contact")
        .property("name", Kind::Text)
        .constraint("name", Constraint::NotBlank)
        .relation("address", "address")
        .relation_list("emails", "email")
        .build()
}

fn valid_contact() -> Entity {
    let mut address = Entity::new(address_schema());
    address.set("street", Value::from("12 Main St")).unwrap();
    address.set("city", Value::from("Albany")).unwrap();
    address.set("state", Value::from("NY")).unwrap();

    let mut email = Entity::new(email_schema());
    email.set("email", Value::from("ada@example.com")).unwrap();

    let mut contact = Entity::new(contact_schema());
    contact.set("name", Value::from("Ada Lovelace")).unwrap();
    contact.set("address", Value::from(address)).unwrap();
    contact.add("emails", Value::from(email)).unwrap();
    contact
}

#[test]
fn satisfied_constraints_produce_no_violations() {
    assert!(valid_contact().validate().is_empty());
}

#[test]
fn top_level_violation_carries_the_attribute_name() {
    let mut address = Entity::new(address_schema());
    address.set("state", Value::from("New York")).unwrap();

    let violations = address.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "state");
    assert_eq!(
        violations[0].message(),
        "state must be exactly 2 characters in length"
    );
}

#[test]
fn nested_violation_path_is_dot_qualified() {
    let mut contact = valid_contact();
    let mut address = Entity::new(address_schema());
    address.set("state", Value::from("New York")).unwrap();
    contact.set("address", Value::from(address)).unwrap();

    let violations = contact.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "address.state");
}

#[test]
fn null_nested_entity_is_skipped_silently() {
    let mut contact = valid_contact();
    contact.set("address", Value::Null).unwrap();
    assert!(contact.validate().is_empty());
}

#[test]
fn list_element_violations_carry_the_index() {
    let mut contact = valid_contact();

    let mut blank = Entity::new(email_schema());
    blank.set("email", Value::from("   ")).unwrap();
    contact.add("emails", Value::from(blank)).unwrap();

    let violations = contact.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "emails[1].email");
    assert_eq!(violations[0].message(), "emails[1].email must not be blank");
}

#[test]
fn validation_reports_every_failing_branch() {
    let mut contact = Entity::new(contact_schema());
    contact.set("name", Value::from("")).unwrap();

    let mut address = Entity::new(address_schema());
    address.set("state", Value::from("N")).unwrap();
    contact.set("address", Value::from(address)).unwrap();

    let mut blank = Entity::new(email_schema());
    blank.set("email", Value::Null).unwrap();
    contact.add("emails", Value::from(blank)).unwrap();

    let violations = contact.validate();
    let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, vec!["name", "address.state", "emails[0].email"]);
}

#[test]
fn monetary_and_not_zero_compose() {
    let schema = Schema::builder("invoice")
        .property("total", Kind::Decimal)
        .constraint("total", Constraint::NotNull)
        .constraint("total", Constraint::NotZero)
        .constraint("total", Constraint::Monetary)
        .build();

    let mut invoice = Entity::new(schema.clone());
    invoice.set("total", Value::from("19.99")).unwrap();
    assert!(invoice.validate().is_empty());

    let mut zero = Entity::new(schema.clone());
    zero.set("total", Value::from("0.00")).unwrap();
    let violations = zero.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message(), "total must not be zero");

    let mut precise = Entity::new(schema);
    precise.set("total", Value::from("19.999")).unwrap();
    let violations = precise.validate();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "total");
}
