// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for ground-truth schema lookups
//!
//! A catalog exposes two views of the same tables. The *base* view keeps every
//! relation field as a plain field; the *simplified* view additionally carries
//! the relations and the foreign-key fields that many-to-one relations imply.

use mobile_datamodel_ir::{CatalogTable, Relation};

/// Catalog trait for schema abstraction
///
/// Implementors only provide the three collections; every lookup is a
/// provided method and is total.
///
/// # Examples
///
/// ```rust,ignore
/// use mobile_datamodel_catalog::{Catalog, JsonCatalog};
///
/// let catalog = JsonCatalog::parse(&text)?;
/// if let Some(table) = catalog.find_table("Employee") {
///     println!("{} has {} relations", table.name, table.relations.len());
/// }
/// ```
pub trait Catalog: Send + Sync {
    /// Tables with relation fields kept raw
    fn base_tables(&self) -> &[CatalogTable];

    /// Tables with relations and implied key fields materialized
    fn tables(&self) -> &[CatalogTable];

    /// Union of every simplified table's relations
    fn relations(&self) -> &[Relation];

    /// Find a simplified table by name
    fn find_table(&self, name: &str) -> Option<&CatalogTable> {
        self.tables().iter().find(|t| t.name == name)
    }

    /// Find a base table by name
    fn find_base_table(&self, name: &str) -> Option<&CatalogTable> {
        self.base_tables().iter().find(|t| t.name == name)
    }

    /// Find a simplified table by table number
    fn find_table_by_number(&self, table_number: i64) -> Option<&CatalogTable> {
        self.tables().iter().find(|t| t.table_number == table_number)
    }

    /// Find a simplified table by its number rendered as a data model id
    fn find_table_by_id(&self, id: &str) -> Option<&CatalogTable> {
        self.tables().iter().find(|t| t.id() == id)
    }

    /// Find a relation by source table and name
    fn find_relation(&self, source: &str, name: &str) -> Option<&Relation> {
        self.relations()
            .iter()
            .find(|r| r.source == source && r.name == name)
    }

    /// Whether a table with this name exists
    fn is_known_table(&self, name: &str) -> bool {
        self.find_table(name).is_some()
    }

    /// Whether a table with this number exists
    fn is_known_table_number(&self, table_number: i64) -> bool {
        self.find_table_by_number(table_number).is_some()
    }
}
