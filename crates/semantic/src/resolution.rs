// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Alias-aware path resolution
//!
//! This module resolves dotted relation paths one segment at a time against
//! the simplified catalog view:
//! - Direct relations resolve to their target table
//! - Composed relations (non-empty `path`) resolve to their own path, seen
//!   through from the relation's target
//! - Alias fields resolve to their canonical path, recursively
//! - Anything else is a terminal field name and stays as written
//!
//! Recursion through aliases is guarded by a stack of the `(table, segment)`
//! pairs being resolved and by a configurable depth bound.

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use mobile_datamodel_catalog::Catalog;

use crate::error::{SemanticError, SemanticResult};

/// Outcome of resolving one path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The segment leads to `table`; `path` is its canonical spelling
    Resolved { table: String, path: String },

    /// The segment does not lead to a table.
    ///
    /// `path` is the segment as written, or the canonical path of an alias
    /// whose target table is unknown.
    Unresolved { path: String },
}

impl Resolution {
    /// Canonical path of the segment
    pub fn path(&self) -> &str {
        match self {
            Resolution::Resolved { path, .. } | Resolution::Unresolved { path } => path,
        }
    }

    /// Table reached, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            Resolution::Resolved { table, .. } => Some(table),
            Resolution::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// Configuration for path resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolutionConfig {
    /// Maximum alias nesting before resolution gives up (default: 64)
    pub max_alias_depth: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self { max_alias_depth: 64 }
    }
}

/// Segments currently being resolved, outermost first
type ResolutionStack = Vec<(String, String)>;

/// Path resolver over a catalog
#[derive(Clone, Copy)]
pub struct PathResolver<'a> {
    pub(crate) catalog: &'a dyn Catalog,
    config: ResolutionConfig,
}

impl<'a> PathResolver<'a> {
    /// Create a new resolver with default configuration
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self {
            catalog,
            config: ResolutionConfig::default(),
        }
    }

    /// Builder method: set configuration
    pub fn with_config(mut self, config: ResolutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &'a dyn Catalog {
        self.catalog
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Resolve one segment of a path starting at `source`
    #[instrument(level = "trace", skip(self))]
    pub fn resolve_segment(&self, part: &str, source: &str) -> SemanticResult<Resolution> {
        self.segment(part, source, &mut Vec::new())
    }

    /// Canonicalize a path starting at `source`.
    ///
    /// Segments after the first unresolved one are kept as written.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve_path(&self, path: &str, source: &str) -> SemanticResult<String> {
        self.path(path, source, &mut Vec::new())
    }

    /// Canonicalize a path, dropping every segment that does not resolve.
    ///
    /// The terminal field of a path never resolves to a table, so only the
    /// relation part of the path is returned.
    #[instrument(level = "trace", skip(self))]
    pub fn clean_path(&self, path: &str, source: &str) -> SemanticResult<String> {
        let mut stack = Vec::new();
        let mut table = source.to_string();
        let mut cleaned = String::new();
        for part in path.split('.') {
            if let Resolution::Resolved { table: next, path } =
                self.segment(part, &table, &mut stack)?
            {
                append_segment(&mut cleaned, &path);
                table = next;
            }
        }
        Ok(strip_trailing_dot(cleaned))
    }

    pub(crate) fn segment(
        &self,
        part: &str,
        source: &str,
        stack: &mut ResolutionStack,
    ) -> SemanticResult<Resolution> {
        if stack.iter().any(|(table, segment)| table == source && segment == part) {
            let chain = stack
                .iter()
                .map(|(table, segment)| format!("{table}.{segment}"))
                .chain(std::iter::once(format!("{source}.{part}")))
                .collect::<Vec<_>>()
                .join(" → ");
            return Err(SemanticError::CyclicAlias {
                table: source.to_string(),
                segment: part.to_string(),
                chain,
            });
        }
        if stack.len() >= self.config.max_alias_depth {
            return Err(SemanticError::AliasDepthExceeded {
                table: source.to_string(),
                path: part.to_string(),
                depth: self.config.max_alias_depth,
            });
        }

        stack.push((source.to_string(), part.to_string()));
        let resolution = self.segment_in_frame(part, source, stack);
        stack.pop();

        trace!(part, source, ?resolution, "Resolved segment");
        resolution
    }

    fn segment_in_frame(
        &self,
        part: &str,
        source: &str,
        stack: &mut ResolutionStack,
    ) -> SemanticResult<Resolution> {
        if let Some(relation) = self.catalog.find_relation(source, part) {
            if relation.path.is_empty() {
                return Ok(Resolution::Resolved {
                    table: relation.target.clone(),
                    path: part.to_string(),
                });
            }

            // Composed relation: every segment is seen through from the target
            let mut composed = String::new();
            for name in relation.path.split('.') {
                if let Resolution::Resolved { path, .. } =
                    self.segment(name, &relation.target, stack)?
                {
                    append_segment(&mut composed, &path);
                }
            }
            return Ok(Resolution::Resolved {
                table: relation.target.clone(),
                path: composed,
            });
        }

        let alias = self
            .catalog
            .find_table(source)
            .and_then(|table| table.field(part))
            .filter(|field| field.is_alias());
        let Some(alias) = alias else {
            return Ok(Resolution::Unresolved {
                path: part.to_string(),
            });
        };

        let path = self.path(alias.path.as_deref().unwrap_or_default(), source, stack)?;
        let table = alias
            .related_table_number
            .and_then(|number| self.catalog.find_table_by_number(number))
            .map(|table| table.name.clone());
        Ok(match table {
            Some(table) => Resolution::Resolved { table, path },
            None => Resolution::Unresolved { path },
        })
    }

    pub(crate) fn path(
        &self,
        path: &str,
        source: &str,
        stack: &mut ResolutionStack,
    ) -> SemanticResult<String> {
        let mut table = Some(source.to_string());
        let mut canonical = String::new();
        for part in path.split('.') {
            let resolved = match table.as_deref() {
                Some(current) => self.segment(part, current, stack)?,
                None => Resolution::Unresolved {
                    path: part.to_string(),
                },
            };
            append_segment(&mut canonical, resolved.path());
            table = resolved.table().map(str::to_string);
        }
        Ok(strip_trailing_dot(canonical))
    }
}

/// Join `part` onto a dotted path
pub(crate) fn append_segment(path: &mut String, part: &str) {
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(part);
}

fn strip_trailing_dot(mut path: String) -> String {
    if path.ends_with('.') {
        path.pop();
    }
    path
}
