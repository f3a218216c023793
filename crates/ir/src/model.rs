// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Resolved data model
//!
//! [`DataModel`] and [`Field`] are the tables and columns produced by the
//! builder. They are mutable while the build runs and read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::metadata::{FieldKind, VariableType};
use crate::naming;
use crate::relation::Relation;

/// Where a field entry was emitted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldOrigin {
    /// Declared directly on the table's own definition
    Declared,
    /// Declared inside a nested slave definition, or merged back from one
    Slave,
    /// Created while resolving aliases or converted from the catalog
    #[default]
    Derived,
}

/// A resolved column or relation placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: Option<String>,
    pub name: String,
    pub label: Option<String>,
    pub short_label: Option<String>,
    pub field_type: Option<i64>,
    pub value_type: Option<String>,
    pub field_type_string: Option<String>,
    pub related_entities: Option<String>,
    pub related_table_number: Option<i64>,
    pub inverse_name: Option<String>,
    pub related_data_class: Option<String>,
    pub variable_type: VariableType,
    pub is_to_many: Option<bool>,
    pub origin: FieldOrigin,
    pub format: Option<String>,
    pub icon: Option<String>,
    pub kind: Option<FieldKind>,
    pub data_model_id: Option<String>,
    pub path: Option<String>,
    pub sub_fields_for_alias: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            label: None,
            short_label: None,
            field_type: None,
            value_type: None,
            field_type_string: None,
            related_entities: None,
            related_table_number: None,
            inverse_name: None,
            related_data_class: None,
            variable_type: VariableType::Immutable,
            is_to_many: None,
            origin: FieldOrigin::Derived,
            format: None,
            icon: None,
            kind: None,
            data_model_id: None,
            path: None,
            sub_fields_for_alias: Vec::new(),
        }
    }

    /// Foreign-key field backing a many-to-one relation named `relation_name`
    pub fn key_for(relation_name: &str) -> Self {
        let mut key = Field::new(naming::key_field_name(relation_name));
        key.field_type = Some(0);
        key.field_type_string = Some(crate::NativeType::String.as_str().to_string());
        key.variable_type = VariableType::Mutable;
        key
    }

    /// Builder method: set the kind
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Builder method: set the origin
    pub fn with_origin(mut self, origin: FieldOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_alias(&self) -> bool {
        self.kind == Some(FieldKind::Alias)
    }

    pub fn is_image(&self) -> bool {
        self.field_type == Some(3)
    }

    pub fn is_private_relation_field(&self) -> bool {
        naming::is_private_relation_field(&self.name)
    }

    /// Target table of a relation-bearing field
    pub fn related_table(&self) -> Option<&str> {
        self.related_data_class
            .as_deref()
            .or(self.related_entities.as_deref())
    }
}

/// A resolved table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModel {
    pub id: String,
    pub name: String,
    pub label: Option<String>,
    pub short_label: Option<String>,
    pub icon_path: Option<String>,
    /// Validated filter of the table, with double quotes turned into single quotes
    pub query: Option<String>,
    pub is_slave: bool,
    pub fields: Vec<Field>,
    pub relations: Vec<Relation>,
}

impl DataModel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: None,
            short_label: None,
            icon_path: None,
            query: None,
            is_slave: false,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Builder method: mark as discovered through a slave definition
    pub fn as_slave(mut self) -> Self {
        self.is_slave = true;
        self
    }

    /// Short label, then label, then name
    pub fn display_label(&self) -> &str {
        self.short_label
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(&self.name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn has_relation(&self, name: &str) -> bool {
        self.relation(name).is_some()
    }

    /// Append `field` unless a field with the same name exists.
    ///
    /// Returns whether the field was added.
    pub fn add_field_if_absent(&mut self, field: Field) -> bool {
        if self.has_field(&field.name) {
            return false;
        }
        self.fields.push(field);
        true
    }

    /// Append `relation` unless a relation with the same name exists
    pub fn add_relation_if_absent(&mut self, relation: Relation) -> bool {
        if self.has_relation(&relation.name) {
            return false;
        }
        self.relations.push(relation);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_fallbacks() {
        let mut model = DataModel::new("1", "Employee");
        assert_eq!(model.display_label(), "Employee");
        model.label = Some("Employees".to_string());
        assert_eq!(model.display_label(), "Employees");
        model.short_label = Some("Emp".to_string());
        assert_eq!(model.display_label(), "Emp");
    }

    #[test]
    fn test_add_if_absent_by_name() {
        let mut model = DataModel::new("1", "Employee");
        assert!(model.add_field_if_absent(Field::new("name")));
        assert!(!model.add_field_if_absent(Field::new("name").with_origin(FieldOrigin::Slave)));
        assert_eq!(model.fields.len(), 1);
        assert_eq!(model.fields[0].origin, FieldOrigin::Derived);
    }

    #[test]
    fn test_key_field() {
        let key = Field::key_for("manager");
        assert_eq!(key.name, "__managerKey");
        assert!(key.is_private_relation_field());
        assert_eq!(key.variable_type, VariableType::Mutable);
        assert_eq!(key.field_type_string.as_deref(), Some("string"));
    }
}
