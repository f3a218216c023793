// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builders for catalog and project-editor JSON documents
//!
//! Provides fluent builders producing `serde_json::Value` trees in the exact
//! shape the loaders read, so tests never hand-write the document skeleton.

use serde_json::{Map, Value, json};

/// Builder for a catalog export document
#[derive(Debug, Clone, Default)]
pub struct CatalogDocumentBuilder {
    definitions: Vec<Value>,
}

impl CatalogDocumentBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table definition
    pub fn table(mut self, table: CatalogTableDef) -> Self {
        self.definitions.push(table.build());
        self
    }

    /// Add a raw table definition
    pub fn raw_table(mut self, definition: Value) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Build `{ "structure": { "definition": [...] } }`
    pub fn build(self) -> Value {
        json!({ "structure": { "definition": self.definitions } })
    }
}

/// Builder for one catalog table definition
#[derive(Debug, Clone)]
pub struct CatalogTableDef {
    name: String,
    table_number: i64,
    fields: Vec<Value>,
}

impl CatalogTableDef {
    pub fn new(name: impl Into<String>, table_number: i64) -> Self {
        Self {
            name: name.into(),
            table_number,
            fields: Vec::new(),
        }
    }

    /// Add a storage field
    pub fn storage(mut self, name: &str, field_type: i64) -> Self {
        self.fields
            .push(json!({ "name": name, "kind": "storage", "fieldType": field_type }));
        self
    }

    /// Add a many-to-one relation field
    pub fn to_one(mut self, name: &str, target: &str, target_number: i64, inverse: &str) -> Self {
        self.fields.push(json!({
            "name": name,
            "kind": "relatedEntity",
            "relatedDataClass": target,
            "relatedTableNumber": target_number,
            "inverseName": inverse,
            "isToOne": true
        }));
        self
    }

    /// Add a one-to-many relation field
    pub fn to_many(mut self, name: &str, target: &str, target_number: i64, inverse: &str) -> Self {
        self.fields.push(json!({
            "name": name,
            "kind": "relatedEntities",
            "relatedDataClass": target,
            "relatedTableNumber": target_number,
            "inverseName": inverse,
            "isToMany": true
        }));
        self
    }

    /// Add an alias of a storage field
    pub fn alias(mut self, name: &str, path: &str, field_type: i64) -> Self {
        self.fields.push(json!({
            "name": name,
            "kind": "alias",
            "path": path,
            "fieldType": field_type
        }));
        self
    }

    /// Add an alias of a relation
    pub fn relation_alias(
        mut self,
        name: &str,
        path: &str,
        target: &str,
        target_number: i64,
        to_many: bool,
    ) -> Self {
        let mut field = json!({
            "name": name,
            "kind": "alias",
            "path": path,
            "relatedDataClass": target,
            "relatedTableNumber": target_number
        });
        let flag = if to_many { "isToMany" } else { "isToOne" };
        field[flag] = Value::Bool(true);
        self.fields.push(field);
        self
    }

    /// Add a raw field
    pub fn field(mut self, field: Value) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Value {
        json!({
            "name": self.name,
            "tableNumber": self.table_number,
            "fields": self.fields
        })
    }
}

/// Builder for a project-editor document
#[derive(Debug, Clone, Default)]
pub struct ProjectDocumentBuilder {
    tables: Map<String, Value>,
}

impl ProjectDocumentBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table under its table number
    pub fn table(mut self, table_number: i64, table: ProjectTableDef) -> Self {
        self.tables.insert(table_number.to_string(), table.build());
        self
    }

    /// Build `{ "project": { "dataModel": {...} } }`
    pub fn build(self) -> Value {
        json!({ "project": { "dataModel": Value::Object(self.tables) } })
    }

    /// Build `{ "dataModel": {...} }`, the database export layout
    pub fn build_database_export(self) -> Value {
        json!({ "dataModel": Value::Object(self.tables) })
    }
}

/// Builder for one project-editor table
#[derive(Debug, Clone)]
pub struct ProjectTableDef {
    meta: Map<String, Value>,
    fields: Map<String, Value>,
}

impl ProjectTableDef {
    pub fn new(name: &str) -> Self {
        let mut meta = Map::new();
        meta.insert("name".to_string(), Value::String(name.to_string()));
        Self {
            meta,
            fields: Map::new(),
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.meta
            .insert("label".to_string(), Value::String(label.to_string()));
        self
    }

    pub fn short_label(mut self, short_label: &str) -> Self {
        self.meta
            .insert("shortLabel".to_string(), Value::String(short_label.to_string()));
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.meta
            .insert("icon".to_string(), Value::String(icon.to_string()));
        self
    }

    pub fn filter(mut self, query: &str, validated: bool) -> Self {
        self.meta.insert(
            "filter".to_string(),
            json!({ "string": query, "validated": validated }),
        );
        self
    }

    /// Add a storage field under `key`
    pub fn storage(mut self, key: &str, name: &str, field_type: i64) -> Self {
        self.fields.insert(
            key.to_string(),
            json!({ "name": name, "kind": "storage", "fieldType": field_type }),
        );
        self
    }

    /// Add a many-to-one relation field
    pub fn to_one(mut self, name: &str, target: &str, target_number: i64, inverse: &str) -> Self {
        self.fields.insert(
            name.to_string(),
            json!({
                "kind": "relatedEntity",
                "relatedDataClass": target,
                "relatedTableNumber": target_number,
                "inverseName": inverse
            }),
        );
        self
    }

    /// Add a one-to-many relation field
    pub fn to_many(mut self, name: &str, target: &str, target_number: i64, inverse: &str) -> Self {
        self.fields.insert(
            name.to_string(),
            json!({
                "kind": "relatedEntities",
                "relatedEntities": target,
                "relatedTableNumber": target_number,
                "inverseName": inverse
            }),
        );
        self
    }

    /// Add an alias field
    pub fn alias(mut self, name: &str, path: &str, field_type: i64) -> Self {
        self.fields.insert(
            name.to_string(),
            json!({ "kind": "alias", "path": path, "fieldType": field_type }),
        );
        self
    }

    /// Add a raw field entry, e.g. one carrying a nested slave definition
    pub fn field(mut self, key: &str, field: Value) -> Self {
        self.fields.insert(key.to_string(), field);
        self
    }

    pub fn build(self) -> Value {
        let mut table = Map::new();
        table.insert(String::new(), Value::Object(self.meta));
        table.extend(self.fields);
        Value::Object(table)
    }
}
