// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Data model test helpers and custom assertions

use mobile_datamodel_ir::{DataModel, Field, Relation, RelationType};

/// Custom assertion helpers for resolved data models
pub struct ModelAssertions;

impl ModelAssertions {
    /// Assert that exactly one table has this name, and return it
    pub fn assert_single_table<'a>(models: &'a [DataModel], table: &str) -> &'a DataModel {
        let matching: Vec<&DataModel> = models.iter().filter(|m| m.name == table).collect();
        assert_eq!(
            matching.len(),
            1,
            "Expected exactly one table '{}', found {}",
            table,
            matching.len()
        );
        matching[0]
    }

    /// Assert that a table has a field with this name, and return it
    pub fn assert_field<'a>(models: &'a [DataModel], table: &str, field: &str) -> &'a Field {
        let model = Self::assert_single_table(models, table);
        model.field(field).unwrap_or_else(|| {
            panic!(
                "Table '{}' has no field '{}', fields are {:?}",
                table,
                field,
                Self::field_names(model)
            )
        })
    }

    /// Assert that a table has no field with this name
    pub fn assert_no_field(models: &[DataModel], table: &str, field: &str) {
        let model = Self::assert_single_table(models, table);
        assert!(
            !model.has_field(field),
            "Table '{}' unexpectedly has field '{}'",
            table,
            field
        );
    }

    /// Assert that a table has a relation with this name, and return it
    pub fn assert_relation<'a>(
        models: &'a [DataModel],
        table: &str,
        relation: &str,
    ) -> &'a Relation {
        let model = Self::assert_single_table(models, table);
        model.relation(relation).unwrap_or_else(|| {
            panic!(
                "Table '{}' has no relation '{}', relations are {:?}",
                table,
                relation,
                model.relations.iter().map(|r| &r.name).collect::<Vec<_>>()
            )
        })
    }

    /// Assert the endpoints and cardinality of a relation
    pub fn assert_relation_shape(
        relation: &Relation,
        source: &str,
        target: &str,
        relation_type: RelationType,
    ) {
        assert_eq!(relation.source, source, "Relation '{}' source mismatch", relation.name);
        assert_eq!(relation.target, target, "Relation '{}' target mismatch", relation.name);
        assert_eq!(
            relation.relation_type, relation_type,
            "Relation '{}' type mismatch",
            relation.name
        );
    }

    /// Assert that no table declares the same field name twice
    pub fn assert_unique_field_names(models: &[DataModel]) {
        for model in models {
            let names = Self::field_names(model);
            for (index, name) in names.iter().enumerate() {
                assert!(
                    !names[..index].contains(name),
                    "Table '{}' declares field '{}' twice",
                    model.name,
                    name
                );
            }
        }
    }

    /// Field names of a table, in order
    pub fn field_names(model: &DataModel) -> Vec<&str> {
        model.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
