// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for mobile data model resolution
//!
//! This crate provides common testing components including:
//! - Builders for catalog and project-editor documents
//! - YAML scenario files with expected tables
//! - Data model assertions
//! - Test fixtures and sample schemas

pub mod assertions;
pub mod documents;
pub mod fixtures;
pub mod scenario;

// Re-exports for convenience
pub use assertions::ModelAssertions;
pub use documents::{
    CatalogDocumentBuilder, CatalogTableDef, ProjectDocumentBuilder, ProjectTableDef,
};
pub use fixtures::SchemaFixtures;
pub use scenario::{Scenario, load_scenario, parse_scenario, validate_scenario};
