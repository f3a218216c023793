// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Mobile Data Model - Catalog Layer
//!
//! This crate provides the ground-truth schema for data model resolution.
//! It defines the `Catalog` trait and a JSON-backed implementation used for:
//!
//! - **Table lookups**: by name or by table number, in the base or simplified view
//! - **Relation lookups**: by source table and relation name
//! - **Alias discovery**: alias fields keep their declared path for later resolution
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mobile_datamodel_catalog::{Catalog, JsonCatalog};
//!
//! let catalog = JsonCatalog::from_value(&document)?;
//! for relation in catalog.relations() {
//!     println!("{}.{} -> {}", relation.source, relation.name, relation.target);
//! }
//! ```

pub mod document;
pub mod error;
pub mod r#trait;

// Re-exports
pub use document::JsonCatalog;
pub use error::{CatalogError, CatalogResult};
pub use mobile_datamodel_ir::{
    CatalogField, CatalogTable, FieldKind, NativeType, Relation, RelationType, VariableType,
};
pub use r#trait::Catalog;
