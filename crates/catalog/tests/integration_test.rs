// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for the catalog crate

use mobile_datamodel_catalog::{Catalog, CatalogError, FieldKind, JsonCatalog, RelationType};
use mobile_datamodel_test_utils::{CatalogDocumentBuilder, CatalogTableDef, SchemaFixtures};
use serde_json::json;

fn office_catalog() -> anyhow::Result<JsonCatalog> {
    Ok(JsonCatalog::from_value(&SchemaFixtures::office_catalog())?)
}

#[test]
fn test_one_table_per_valid_definition() -> anyhow::Result<()> {
    let document = CatalogDocumentBuilder::new()
        .table(CatalogTableDef::new("Employee", 1).storage("name", 0))
        .raw_table(json!({ "name": "NoNumber", "fields": [] }))
        .raw_table(json!({ "tableNumber": 9, "fields": [] }))
        .table(CatalogTableDef::new("Office", 3))
        .build();
    let catalog = JsonCatalog::from_value(&document)?;

    let names: Vec<&str> = catalog.tables().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Employee", "Office"]);
    assert_eq!(catalog.base_tables().len(), 2);
    Ok(())
}

#[test]
fn test_missing_structure_is_an_empty_catalog() -> anyhow::Result<()> {
    let catalog = JsonCatalog::from_value(&json!({ "version": 1 }))?;
    assert!(catalog.tables().is_empty());
    assert!(catalog.relations().is_empty());
    Ok(())
}

#[test]
fn test_parse_from_text() -> anyhow::Result<()> {
    let text = SchemaFixtures::office_catalog().to_string();
    let catalog = JsonCatalog::parse(&text)?;
    assert_eq!(catalog.tables().len(), 3);
    assert_eq!(JsonCatalog::parse("").unwrap_err(), CatalogError::EmptyInput);
    Ok(())
}

#[test]
fn test_base_view_keeps_relation_fields_raw() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let employee = catalog.find_base_table("Employee").unwrap();

    assert!(employee.relations.is_empty());
    assert!(employee.field("manager").is_some());
    assert!(employee.field("__managerKey").is_none());
    Ok(())
}

#[test]
fn test_simplified_view_materializes_relations_and_keys() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let employee = catalog.find_table("Employee").unwrap();

    let manager = employee.relation("manager").unwrap();
    assert_eq!(manager.relation_type, RelationType::ManyToOne);
    assert_eq!(manager.target, "Employee");
    assert_eq!(manager.inverse_name, "reports");
    assert_eq!(manager.path, "");

    let services = employee.relation("services").unwrap();
    assert_eq!(services.relation_type, RelationType::OneToMany);
    assert_eq!(services.inverse_name, "employee");

    let key = employee.field("__managerKey").unwrap();
    assert_eq!(key.field_type_string, "string");
    assert_eq!(key.data_model_id, "1");
    assert!(employee.field("__officeKey").is_some());
    assert!(employee.field("__servicesKey").is_none());

    // Key fields come after the declared fields
    assert!(employee.fields.last().unwrap().name.starts_with("__"));
    Ok(())
}

#[test]
fn test_relation_sub_fields_come_from_base_view() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let office = catalog.find_relation("Employee", "office").unwrap();

    let names: Vec<&str> = office.sub_fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["name", "address", "employees"]);
    Ok(())
}

#[test]
fn test_aliases_are_not_relations() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let employee = catalog.find_table("Employee").unwrap();

    let boss = employee.field("boss").unwrap();
    assert_eq!(boss.kind, Some(FieldKind::Alias));
    assert_eq!(boss.path.as_deref(), Some("manager"));
    assert!(employee.relation("boss").is_none());
    assert!(catalog.find_relation("Employee", "boss").is_none());
    Ok(())
}

#[test]
fn test_relations_are_flattened() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    // Employee: manager, reports, services, office; Service: employee; Office: employees
    assert_eq!(catalog.relations().len(), 6);
    assert!(catalog.find_relation("Service", "employee").is_some());
    assert!(catalog.find_relation("Office", "manager").is_none());
    Ok(())
}

#[test]
fn test_relation_requires_inverse_name() -> anyhow::Result<()> {
    let document = CatalogDocumentBuilder::new()
        .table(CatalogTableDef::new("Employee", 1).field(json!({
            "name": "office",
            "kind": "relatedEntity",
            "relatedDataClass": "Office",
            "isToOne": true
        })))
        .build();
    let catalog = JsonCatalog::from_value(&document)?;
    let employee = catalog.find_table("Employee").unwrap();

    assert!(employee.relations.is_empty());
    assert!(employee.field("__officeKey").is_none());
    assert_eq!(employee.field("office").unwrap().field_type_string, "Office");
    Ok(())
}

#[test]
fn test_lookups_by_number() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    assert_eq!(catalog.find_table_by_number(3).unwrap().name, "Office");
    assert_eq!(catalog.find_table_by_id("2").unwrap().name, "Service");
    assert!(catalog.find_table_by_id("42").is_none());
    assert!(catalog.is_known_table_number(1));
    assert!(!catalog.is_known_table_number(42));
    assert!(catalog.is_known_table("Office"));
    assert!(!catalog.is_known_table("Building"));
    Ok(())
}
