// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for path resolution
//!
//! A segment that does not resolve is not an error: it is reported as
//! [`Resolution::Unresolved`](crate::Resolution::Unresolved). Only alias
//! chains that cannot terminate are errors.

use thiserror::Error;

/// Result type alias for semantic operations
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Errors that can occur during path resolution
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// An alias path routes back to a segment already being resolved
    #[error("Cyclic alias '{segment}' on table '{table}': {chain}")]
    CyclicAlias {
        table: String,
        segment: String,
        chain: String,
    },

    /// Alias nesting exceeded the configured depth
    #[error("Alias resolution of '{path}' on table '{table}' exceeded depth {depth}")]
    AliasDepthExceeded {
        table: String,
        path: String,
        depth: usize,
    },
}
