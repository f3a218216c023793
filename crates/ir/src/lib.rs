// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Mobile Data Model - Intermediate Representation
//!
//! This crate provides the types shared by every stage of schema resolution:
//! - Catalog metadata (tables, fields, type codes)
//! - The resolved data model (tables, fields, relations)
//! - Identifier normalization for generated names
//! - Total lookups on loosely typed JSON documents

pub mod json;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod relation;

// Re-export commonly used types
pub use json::{JsonObject, JsonObjectExt};
pub use metadata::{CatalogField, CatalogTable, FieldKind, NativeType, RelationType, VariableType};
pub use model::{DataModel, Field, FieldOrigin};
pub use relation::Relation;
