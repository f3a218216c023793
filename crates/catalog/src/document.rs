// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # JSON Catalog
//!
//! Loads a catalog export (`structure.definition`) into memory.
//!
//! Every table definition is read twice. The base pass keeps relation fields
//! as they are. The simplified pass turns each `relatedEntity` and
//! `relatedEntities` field into a [`Relation`] whose sub-fields are taken from
//! the base view of the target table, and appends a `__<name>Key` field for
//! every many-to-one relation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mobile_datamodel_catalog::{Catalog, JsonCatalog};
//!
//! let catalog = JsonCatalog::parse(&std::fs::read_to_string("catalog.json")?)?;
//! let employee = catalog.find_table("Employee");
//! ```

use serde_json::Value;
use tracing::{debug, instrument};

use mobile_datamodel_ir::{
    CatalogField, CatalogTable, FieldKind, JsonObject, JsonObjectExt, NativeType, Relation,
    RelationType, VariableType, naming,
};

use crate::{Catalog, CatalogError, CatalogResult};

/// Catalog loaded from a JSON export
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    base: Vec<CatalogTable>,
    tables: Vec<CatalogTable>,
    relations: Vec<Relation>,
}

impl JsonCatalog {
    /// Parse a catalog document from text
    pub fn parse(json: &str) -> CatalogResult<Self> {
        if json.trim().is_empty() {
            return Err(CatalogError::EmptyInput);
        }
        let value: Value =
            serde_json::from_str(json).map_err(|e| CatalogError::MalformedJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Load a catalog from an already-parsed document
    #[instrument(skip(value))]
    pub fn from_value(value: &Value) -> CatalogResult<Self> {
        let root = match value {
            Value::Null => return Err(CatalogError::EmptyInput),
            Value::Object(root) if root.is_empty() => return Err(CatalogError::EmptyInput),
            Value::Object(root) => root,
            _ => {
                return Err(CatalogError::MalformedJson(
                    "catalog root is not an object".to_string(),
                ));
            }
        };

        let definitions: Vec<&JsonObject> = root
            .get_object("structure")
            .and_then(|structure| structure.get_array("definition"))
            .map(|definition| definition.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default();

        let base: Vec<CatalogTable> = definitions
            .iter()
            .filter_map(|definition| parse_table(definition, None))
            .collect();
        let tables: Vec<CatalogTable> = definitions
            .iter()
            .filter_map(|definition| parse_table(definition, Some(&base)))
            .collect();
        let relations: Vec<Relation> = tables
            .iter()
            .flat_map(|table| table.relations.iter().cloned())
            .collect();

        debug!(
            tables = tables.len(),
            relations = relations.len(),
            "Catalog loaded"
        );

        Ok(Self {
            base,
            tables,
            relations,
        })
    }

    /// Build a catalog from already-simplified tables
    pub fn from_tables(base: Vec<CatalogTable>, tables: Vec<CatalogTable>) -> Self {
        let relations = tables
            .iter()
            .flat_map(|table| table.relations.iter().cloned())
            .collect();
        Self {
            base,
            tables,
            relations,
        }
    }
}

impl Catalog for JsonCatalog {
    fn base_tables(&self) -> &[CatalogTable] {
        &self.base
    }

    fn tables(&self) -> &[CatalogTable] {
        &self.tables
    }

    fn relations(&self) -> &[Relation] {
        &self.relations
    }
}

/// Parse one table definition. `base` is `None` for the base pass.
fn parse_table(definition: &JsonObject, base: Option<&[CatalogTable]>) -> Option<CatalogTable> {
    let (Some(name), Some(table_number)) = (
        definition.get_str("name"),
        definition.get_i64("tableNumber"),
    ) else {
        debug!("Skipping catalog table without name or tableNumber");
        return None;
    };
    let table_id = table_number.to_string();

    let mut fields: Vec<CatalogField> = definition
        .get_array("fields")
        .map(|fields| {
            fields
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|field| parse_field(field, &table_id))
                .collect()
        })
        .unwrap_or_default();
    let mut relations = Vec::new();

    if let Some(base) = base {
        let mut key_fields = Vec::new();
        for field in fields.iter().filter(|f| f.kind.is_some_and(|k| k.is_relation())) {
            let sub_fields = field
                .related_data_class
                .as_deref()
                .and_then(|target| base.iter().find(|t| t.name == target))
                .map(|target| target.fields.iter().map(CatalogField::to_field).collect())
                .unwrap_or_default();
            if let Some(relation) = field.to_relation(name, sub_fields) {
                if relation.relation_type == RelationType::ManyToOne {
                    key_fields.push(CatalogField::key_for(&relation.name, &table_id));
                }
                relations.push(relation);
            }
        }
        fields.extend(key_fields);
    }

    Some(CatalogTable {
        table_number,
        name: name.to_string(),
        fields,
        relations,
    })
}

fn parse_field(object: &JsonObject, data_model_id: &str) -> Option<CatalogField> {
    let name = object.get_str("name")?;
    let mut field = CatalogField::new(name, data_model_id);
    field.kind = object.get_str("kind").map(FieldKind::from_name);
    field.related_data_class = object.get_string("relatedDataClass");
    field.inverse_name = object.get_string("inverseName");
    if let Some(id) = object.get_string("id") {
        field.id = id;
    }
    field.field_type = object.get_i64("fieldType");
    field.related_table_number = object.get_i64("relatedTableNumber");
    field.path = object.get_string("path");

    if object.get_bool("isToMany") == Some(true) {
        let target = field.related_data_class.as_deref().unwrap_or_default();
        field.field_type_string = format!("Entities<{}>", naming::table_name_adjustment(target));
        field.is_to_many = true;
        field.variable_type = VariableType::Mutable;
    } else if object.get_bool("isToOne") == Some(true) {
        field.field_type_string = field.related_data_class.clone().unwrap_or_default();
        field.is_to_one = true;
        field.variable_type = VariableType::Mutable;
    } else {
        field.field_type_string = NativeType::type_string(field.field_type);
    }
    Some(field)
}
