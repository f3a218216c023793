// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Mobile Data Model - Lowering Layer
//!
//! This crate turns a project document into resolved data models, using a
//! catalog as the ground truth.
//!
//! ## Overview
//!
//! The lowering layer is responsible for:
//! - Reading tables, fields and nested slave definitions (pass 1)
//! - Resolving alias fields through the catalog's relations (pass 2)
//! - Removing duplicates and dangling references
//! - Landing inverse relations on the tables they point at
//!
//! ```text
//! project document + Catalog → ModelBuilder → ResolvedSchema
//! ```
//!
//! ## Error Handling Strategy
//!
//! - **Fatal**: an empty or malformed document, or an alias chain that never
//!   terminates, fails the whole build with a [`LoweringError`]
//! - **Recoverable**: a field or relation that cannot be materialized is left
//!   out and recorded as a [`LoweringWarning`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mobile_datamodel_catalog::JsonCatalog;
//! use mobile_datamodel_lowering::build_data_models;
//!
//! let catalog = JsonCatalog::from_value(&catalog_document)?;
//! let schema = build_data_models(&project_document, &catalog)?;
//!
//! for warning in schema.warnings() {
//!     eprintln!("{warning}");
//! }
//! for field in schema.fields_of("Employee") {
//!     println!("{}: {:?}", field.name, field.field_type_string);
//! }
//! ```

mod alias;
pub mod builder;
pub mod config;
pub mod context;
mod document;
pub mod error;
pub mod output;
mod sanity;
mod structure;

pub use builder::{ModelBuilder, build_data_models, build_data_models_from_str};
pub use config::{DocumentLayout, LoweringConfig};
pub use context::{BuildContext, ContextId, NestingContext, TableRef};
pub use error::{ErrorSeverity, LoweringError, LoweringResult, LoweringWarning};
pub use output::ResolvedSchema;
