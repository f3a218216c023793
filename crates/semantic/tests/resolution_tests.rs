// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Path resolution against the office catalog

use mobile_datamodel_catalog::{Catalog, JsonCatalog, RelationType};
use mobile_datamodel_semantic::{
    PathResolver, RelationSynthesizer, Resolution, ResolutionConfig, SemanticError,
};
use mobile_datamodel_test_utils::{CatalogDocumentBuilder, CatalogTableDef, SchemaFixtures};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn office_catalog() -> anyhow::Result<JsonCatalog> {
    init_tracing();
    Ok(JsonCatalog::from_value(&SchemaFixtures::office_catalog())?)
}

#[test]
fn test_direct_relation_identity() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);

    for relation in catalog.relations().iter().filter(|r| r.path.is_empty()) {
        let resolution = resolver.resolve_segment(&relation.name, &relation.source)?;
        assert_eq!(
            resolution,
            Resolution::Resolved {
                table: relation.target.clone(),
                path: relation.name.clone(),
            }
        );
    }
    Ok(())
}

#[test]
fn test_terminal_field_is_unresolved() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);

    let resolution = resolver.resolve_segment("name", "Employee")?;
    assert_eq!(
        resolution,
        Resolution::Unresolved {
            path: "name".to_string()
        }
    );
    Ok(())
}

#[test]
fn test_relation_alias_resolves_to_its_target() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);

    let resolution = resolver.resolve_segment("boss", "Employee")?;
    assert_eq!(
        resolution,
        Resolution::Resolved {
            table: "Employee".to_string(),
            path: "manager".to_string(),
        }
    );
    assert_eq!(
        resolver.resolve_path("boss.office.address", "Employee")?,
        "manager.office.address"
    );
    Ok(())
}

#[test]
fn test_field_alias_keeps_canonical_path() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);

    // A field alias has no target table but still unfolds
    let resolution = resolver.resolve_segment("managerName", "Employee")?;
    assert_eq!(resolution.table(), None);
    assert_eq!(resolution.path(), "manager.name");

    assert_eq!(
        resolver.resolve_path("employee.managerName", "Service")?,
        "employee.manager.name"
    );
    Ok(())
}

#[test]
fn test_segments_after_a_miss_stay_verbatim() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);

    assert_eq!(
        resolver.resolve_path("unknown.boss.name", "Employee")?,
        "unknown.boss.name"
    );
    Ok(())
}

#[test]
fn test_clean_path_drops_unresolved_segments() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);

    assert_eq!(
        resolver.clean_path("boss.office.address", "Employee")?,
        "manager.office"
    );
    assert_eq!(resolver.clean_path("name", "Employee")?, "");
    Ok(())
}

#[test]
fn test_composed_relation_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let document = CatalogDocumentBuilder::new()
        .table(
            CatalogTableDef::new("Employee", 1)
                .storage("name", 0)
                .to_one("manager", "Employee", 1, "reports"),
        )
        .table(
            CatalogTableDef::new("Service", 2).field(json!({
                "name": "supervisor",
                "kind": "relatedEntity",
                "relatedDataClass": "Employee",
                "relatedTableNumber": 1,
                "inverseName": "supervised",
                "isToOne": true,
                "path": "manager"
            })),
        )
        .build();
    let catalog = JsonCatalog::from_value(&document)?;
    let resolver = PathResolver::new(&catalog);

    let relation = catalog
        .find_relation("Service", "supervisor")
        .expect("composed relation");
    let composed = resolver.resolve_segment(&relation.name, &relation.source)?;
    assert_eq!(composed.table(), Some("Employee"));
    assert_eq!(
        composed.path(),
        resolver.resolve_path(&relation.path, &relation.target)?
    );
    Ok(())
}

#[test]
fn test_cyclic_alias_is_an_error() -> anyhow::Result<()> {
    init_tracing();
    let catalog = JsonCatalog::from_value(&SchemaFixtures::cyclic_catalog())?;
    let resolver = PathResolver::new(&catalog);

    let err = resolver.resolve_path("loop.name", "Node").unwrap_err();
    assert_eq!(
        err,
        SemanticError::CyclicAlias {
            table: "Node".to_string(),
            segment: "loop".to_string(),
            chain: "Node.loop → Node.loop".to_string(),
        }
    );
    Ok(())
}

#[test]
fn test_alias_depth_bound() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver =
        PathResolver::new(&catalog).with_config(ResolutionConfig { max_alias_depth: 1 });

    // Direct relations never nest
    assert_eq!(resolver.resolve_path("manager.name", "Employee")?, "manager.name");
    assert!(matches!(
        resolver.resolve_path("boss.name", "Employee"),
        Err(SemanticError::AliasDepthExceeded { depth: 1, .. })
    ));
    Ok(())
}

#[test]
fn test_destination_queries() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);

    assert_eq!(
        resolver.destination_before_last_segment("Service", Some("employee.manager.name"))?,
        "Employee"
    );
    assert_eq!(
        resolver.destination_before_last_segment("Employee", Some("boss.office.address"))?,
        "Office"
    );
    assert_eq!(resolver.destination_before_last_segment("Employee", None)?, "Employee");

    assert_eq!(
        resolver.destination_with_field("Employee", "manager.office"),
        "Office"
    );
    assert_eq!(
        resolver.destination_with_field("Employee", "manager.office.address"),
        "string"
    );
    assert_eq!(resolver.destination_with_field("Employee", "manager.unknown"), "");
    Ok(())
}

#[test]
fn test_one_to_many_infects_the_chain() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);

    assert_eq!(
        resolver.relation_type_along_path("Service", "employee.manager.name"),
        RelationType::ManyToOne
    );
    assert_eq!(
        resolver.relation_type_along_path("Employee", "manager.services.name"),
        RelationType::OneToMany
    );
    assert_eq!(
        resolver.relation_type_along_path("Office", "employees.manager"),
        RelationType::OneToMany
    );
    Ok(())
}

#[test]
fn test_synthesized_chain_is_connected() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);
    let synthesizer = RelationSynthesizer::new(&resolver);

    let relations = synthesizer.synthesize_relations("Service", "employee.manager.name")?;
    let names: Vec<&str> = relations.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["employeeManagerName", "managerName"]);

    assert_eq!(relations[0].source, "Service");
    assert_eq!(relations[0].path, "employee.manager.name");
    assert_eq!(relations[0].embedded_return_type, "EmployeeRelationManagerName");
    assert_eq!(relations[1].source, relations[0].target);
    assert_eq!(relations[1].target, "Employee");
    assert_eq!(relations[1].path, "manager.name");
    assert_eq!(relations[1].embedded_return_type, "EmployeeRelationName");
    assert!(relations.iter().all(|r| r.is_synthesized()));
    assert!(relations.iter().all(|r| r.inverse_name.is_empty()));
    Ok(())
}

#[test]
fn test_synthesis_is_idempotent() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);
    let synthesizer = RelationSynthesizer::new(&resolver);

    let first = synthesizer.synthesize_relations("Employee", "manager.office.address")?;
    let second = synthesizer.synthesize_relations("Employee", "manager.office.address")?;
    assert_eq!(first, second);
    assert!(synthesizer.synthesize_relations("Employee", "name")?.is_empty());
    Ok(())
}

#[test]
fn test_first_hop_and_embedded_type() -> anyhow::Result<()> {
    let catalog = office_catalog()?;
    let resolver = PathResolver::new(&catalog);
    let synthesizer = RelationSynthesizer::new(&resolver);

    assert_eq!(
        synthesizer.first_hop("Employee", "office.address"),
        Some(("Office".to_string(), "address".to_string()))
    );
    assert_eq!(synthesizer.first_hop("Employee", "office"), None);
    assert_eq!(
        synthesizer.first_hop("Employee", "unknown.address"),
        Some((String::new(), "address".to_string()))
    );

    assert_eq!(synthesizer.embedded_return_type("Employee", "office"), "Office");
    assert_eq!(
        synthesizer.embedded_return_type("Employee", "office.address"),
        "OfficeRelationAddress"
    );
    Ok(())
}
