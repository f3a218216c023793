// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types and handling strategy for the lowering layer
//!
//! A build either fails with a single [`LoweringError`] or succeeds. Fields
//! and relations that cannot be materialized are left out of a successful
//! build, and each omission is recorded as a [`LoweringWarning`].

use serde::Serialize;
use thiserror::Error;

use mobile_datamodel_catalog::CatalogError;
use mobile_datamodel_semantic::SemanticError;

/// Result type alias for lowering operations
pub type LoweringResult<T> = Result<T, LoweringError>;

/// Errors that abort a build
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoweringError {
    /// The project document is empty
    #[error("Project document is empty")]
    EmptyInput,

    /// The project document is not a JSON object
    #[error("Malformed project document: {0}")]
    MalformedJson(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An alias chain never terminates
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

/// Omissions recorded while building
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LoweringWarning {
    /// The alias has no counterpart in the catalog, or its source table
    /// cannot be found
    #[error("Alias '{field}' of table '{table}' cannot be resolved")]
    UnresolvableAlias { table: String, field: String },

    /// The sanity pass dropped a reference to a table the catalog does not know
    #[error("Dropped '{reference}' of table '{table}': unknown target '{target}'")]
    UnknownTargetTable {
        table: String,
        /// Name of the dropped field or relation
        reference: String,
        target: String,
    },

    /// A pending inverse relation targets a table that was never built
    #[error("Inverse field '{field}' has no table '{target}' to land on")]
    UnmaterializedInverse { target: String, field: String },
}

impl LoweringWarning {
    /// Get the severity level of this warning
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoweringWarning::UnresolvableAlias { .. } => ErrorSeverity::Warning,
            LoweringWarning::UnknownTargetTable { .. } => ErrorSeverity::Info,
            LoweringWarning::UnmaterializedInverse { .. } => ErrorSeverity::Info,
        }
    }
}

/// Severity level for lowering warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ErrorSeverity {
    /// Expected for schemas that do not use every catalog feature
    Info,
    /// Something the project asked for is missing from the output
    Warning,
}
