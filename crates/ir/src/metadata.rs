// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog metadata types
//!
//! This module defines the ground-truth schema types loaded from a catalog
//! export: tables, their fields, and the classification enums shared by the
//! resolved data model.

use serde::{Deserialize, Serialize};

use crate::model::{Field, FieldOrigin};
use crate::naming;
use crate::relation::Relation;

/// Semantic type behind a numeric field type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeType {
    String,
    Float,
    Int,
    Bool,
    Date,
    Time,
    Photo,
    Object,
    Empty,
}

impl NativeType {
    /// Every native type, in declaration order
    pub const ALL: [NativeType; 9] = [
        NativeType::String,
        NativeType::Float,
        NativeType::Int,
        NativeType::Bool,
        NativeType::Date,
        NativeType::Time,
        NativeType::Photo,
        NativeType::Object,
        NativeType::Empty,
    ];

    /// Semantic classification of a field type code.
    ///
    /// Codes 4 and 11 are dates and times; unknown or absent codes are `Empty`.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(4) => NativeType::Date,
            Some(11) => NativeType::Time,
            other => Self::storage_from_code(other),
        }
    }

    /// Storage classification of a field type code.
    ///
    /// Dates and times are stored as strings, so codes 4 and 11 map to `String`.
    pub fn storage_from_code(code: Option<i64>) -> Self {
        match code {
            Some(0 | 2 | 4 | 11) => NativeType::String,
            Some(1) => NativeType::Float,
            Some(3) => NativeType::Photo,
            Some(6) => NativeType::Bool,
            Some(8 | 9 | 25) => NativeType::Int,
            Some(38) => NativeType::Object,
            _ => NativeType::Empty,
        }
    }

    /// Type name as written in `fieldTypeString`; the empty type is `""`
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeType::String => "string",
            NativeType::Float => "float",
            NativeType::Int => "int",
            NativeType::Bool => "bool",
            NativeType::Date => "date",
            NativeType::Time => "time",
            NativeType::Photo => "photo",
            NativeType::Object => "object",
            NativeType::Empty => "",
        }
    }

    /// Parse a type name back into a native type
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Storage type name for a field type code
    pub fn type_string(code: Option<i64>) -> String {
        Self::storage_from_code(code).as_str().to_string()
    }
}

impl std::fmt::Display for NativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field classification from the `kind` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    #[serde(rename = "storage", alias = "plain")]
    Plain,
    RelatedEntity,
    RelatedEntities,
    Alias,
    Calculated,
}

impl FieldKind {
    /// Parse a `kind` attribute. Unknown kinds are treated as plain storage.
    pub fn from_name(name: &str) -> Self {
        match name {
            "relatedEntity" => FieldKind::RelatedEntity,
            "relatedEntities" => FieldKind::RelatedEntities,
            "alias" => FieldKind::Alias,
            "calculated" => FieldKind::Calculated,
            _ => FieldKind::Plain,
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, FieldKind::RelatedEntity | FieldKind::RelatedEntities)
    }

    /// Alias and calculated fields are resolved in a deferred pass
    pub fn is_deferred(&self) -> bool {
        matches!(self, FieldKind::Alias | FieldKind::Calculated)
    }
}

/// Cardinality of a relation seen from its source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    ManyToOne,
    OneToMany,
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationType::ManyToOne => write!(f, "MANY_TO_ONE"),
            RelationType::OneToMany => write!(f, "ONE_TO_MANY"),
        }
    }
}

/// Whether generated accessors are reassigned after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableType {
    #[default]
    Immutable,
    /// Relation-bearing fields are populated in a later pass
    Mutable,
}

/// A field of a catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogField {
    pub name: String,
    pub id: String,
    /// Table number of the owning table
    pub data_model_id: String,
    pub kind: Option<FieldKind>,
    pub related_data_class: Option<String>,
    pub related_table_number: Option<i64>,
    pub inverse_name: Option<String>,
    pub path: Option<String>,
    pub field_type: Option<i64>,
    pub field_type_string: String,
    pub is_to_one: bool,
    pub is_to_many: bool,
    pub variable_type: VariableType,
}

impl CatalogField {
    /// Create a plain field owned by `data_model_id`
    pub fn new(name: impl Into<String>, data_model_id: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            data_model_id: data_model_id.into(),
            kind: None,
            related_data_class: None,
            related_table_number: None,
            inverse_name: None,
            path: None,
            field_type: None,
            field_type_string: String::new(),
            is_to_one: false,
            is_to_many: false,
            variable_type: VariableType::Immutable,
        }
    }

    /// Builder method: set the field type code and derived type string
    pub fn with_field_type(mut self, code: i64) -> Self {
        self.field_type = Some(code);
        self.field_type_string = NativeType::type_string(Some(code));
        self
    }

    pub fn is_alias(&self) -> bool {
        self.kind == Some(FieldKind::Alias)
    }

    /// Plain storage, whether or not the catalog states a kind
    pub fn is_plain(&self) -> bool {
        matches!(self.kind, None | Some(FieldKind::Plain))
    }

    /// Build the relation this field declares from `current_table`.
    ///
    /// Both `relatedDataClass` and `inverseName` must be present.
    pub fn to_relation(&self, current_table: &str, sub_fields: Vec<Field>) -> Option<Relation> {
        let target = self.related_data_class.as_ref()?;
        let inverse_name = self.inverse_name.as_ref()?;
        let relation_type = if self.is_to_one {
            RelationType::ManyToOne
        } else {
            RelationType::OneToMany
        };
        Some(Relation {
            source: current_table.to_string(),
            target: target.clone(),
            name: self.name.clone(),
            relation_type,
            sub_fields,
            inverse_name: inverse_name.clone(),
            path: self.path.clone().unwrap_or_default(),
            embedded_return_type: target.clone(),
        })
    }

    /// Foreign-key field implied by a many-to-one relation named `relation_name`
    pub fn key_for(relation_name: &str, data_model_id: &str) -> Self {
        let mut key = CatalogField::new(naming::key_field_name(relation_name), data_model_id)
            .with_field_type(0);
        key.variable_type = VariableType::Mutable;
        key
    }

    /// Convert into a resolved-model field
    pub fn to_field(&self) -> Field {
        let mut field = Field::new(self.name.clone());
        field.id = Some(self.id.clone());
        field.field_type = self.field_type;
        field.field_type_string = Some(self.field_type_string.clone());
        field.related_table_number = self.related_table_number;
        field.inverse_name = self.inverse_name.clone();
        field.variable_type = self.variable_type;
        field.kind = self.kind;
        field.data_model_id = Some(self.data_model_id.clone());
        field.path = self.path.clone();
        field.origin = FieldOrigin::Derived;
        field.is_to_many = Some(self.is_to_many);
        field.related_data_class = self.related_data_class.clone();
        if self.is_to_many {
            field.related_entities = self.related_data_class.clone();
        }
        field
    }
}

/// A catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTable {
    pub table_number: i64,
    pub name: String,
    pub fields: Vec<CatalogField>,
    pub relations: Vec<Relation>,
}

impl CatalogTable {
    pub fn new(name: impl Into<String>, table_number: i64) -> Self {
        Self {
            table_number,
            name: name.into(),
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Builder method: set fields
    pub fn with_fields(mut self, fields: Vec<CatalogField>) -> Self {
        self.fields = fields;
        self
    }

    /// Get field by name
    pub fn field(&self, name: &str) -> Option<&CatalogField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get relation by name
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// Table number rendered as a data model id
    pub fn id(&self) -> String {
        self.table_number.to_string()
    }
}
