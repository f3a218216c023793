// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Catalog operations
//!
//! This module defines the error types used throughout the catalog layer.
//! Only document-level failures are errors; lookups on a loaded catalog
//! return `Option`.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading a catalog document
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum CatalogError {
    /// The catalog document is empty
    #[error("Catalog document is empty")]
    EmptyInput,

    /// The catalog document is not a JSON object
    #[error("Malformed catalog document: {0}")]
    MalformedJson(String),
}
