// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Mobile Data Model - Semantic Layer
//!
//! This crate sees through aliases in dotted field paths.
//!
//! ## Overview
//!
//! - [`PathResolver`] canonicalizes paths segment by segment against a
//!   [`Catalog`](mobile_datamodel_catalog::Catalog), and answers the derived
//!   queries (destination table, relation cardinality along a path)
//! - [`RelationSynthesizer`] turns a multi-hop path into the relations that
//!   make it navigable
//!
//! ## Example
//!
//! ```rust,ignore
//! use mobile_datamodel_catalog::JsonCatalog;
//! use mobile_datamodel_semantic::PathResolver;
//!
//! let catalog = JsonCatalog::parse(&text)?;
//! let resolver = PathResolver::new(&catalog);
//!
//! // `boss` is an alias of `manager`
//! assert_eq!(resolver.resolve_path("boss.name", "Employee")?, "manager.name");
//! ```
//!
//! Resolution is total: a segment that leads nowhere is reported as
//! [`Resolution::Unresolved`]. The only errors are alias chains that never
//! terminate ([`SemanticError`]).

pub mod error;
pub mod navigation;
pub mod resolution;
pub mod synthesis;

pub use error::{SemanticError, SemanticResult};
pub use resolution::{PathResolver, Resolution, ResolutionConfig};
pub use synthesis::RelationSynthesizer;
