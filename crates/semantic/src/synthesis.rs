// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Relation synthesis
//!
//! A multi-hop path such as `employee.manager.name` cannot be navigated
//! through a single catalog relation. [`RelationSynthesizer`] produces one
//! relation per remaining prefix of the path:
//!
//! | source     | name                     | path                    |
//! |------------|--------------------------|-------------------------|
//! | `Service`  | `employeeManagerName`    | `employee.manager.name` |
//! | `Employee` | `managerName`            | `manager.name`          |
//!
//! Each relation is named after its own path, so synthesizing the same
//! path twice yields the same relation names.

use tracing::{debug, instrument};

use mobile_datamodel_catalog::Relation;
use mobile_datamodel_ir::naming::{embedded_return_type_name, relation_name_adjustment};

use crate::error::SemanticResult;
use crate::resolution::PathResolver;

/// Builds the relations that materialize a multi-hop path
#[derive(Clone, Copy)]
pub struct RelationSynthesizer<'r, 'a> {
    resolver: &'r PathResolver<'a>,
}

impl<'r, 'a> RelationSynthesizer<'r, 'a> {
    pub fn new(resolver: &'r PathResolver<'a>) -> Self {
        Self { resolver }
    }

    /// First hop of `path` from `source`: the target of the relation named
    /// by the first segment (empty when unknown) and the rest of the path.
    ///
    /// Returns `None` for a single-segment path.
    pub fn first_hop(&self, source: &str, path: &str) -> Option<(String, String)> {
        let (first, rest) = path.split_once('.')?;
        Some((self.first_target(source, first), rest.to_string()))
    }

    /// Nested type name for the relation chain `path` starting at `source`
    pub fn embedded_return_type(&self, source: &str, path: &str) -> String {
        match path.split_once('.') {
            Some((first, rest)) => {
                embedded_return_type_name(&self.first_target(source, first), rest)
            }
            None => self.first_target(source, path),
        }
    }

    /// Relations materializing every multi-segment suffix of `path`.
    ///
    /// A single-segment path needs no synthesized relation.
    #[instrument(level = "debug", skip(self))]
    pub fn synthesize_relations(&self, source: &str, path: &str) -> SemanticResult<Vec<Relation>> {
        let mut relations = Vec::new();
        let mut next_source = source.to_string();
        let mut next_path = path.to_string();

        while let Some((hop_target, remainder)) = self.first_hop(&next_source, &next_path) {
            let target = self
                .resolver
                .destination_before_last_segment(&next_source, Some(&next_path))?;
            let relation = Relation {
                source: next_source.clone(),
                target,
                name: relation_name_adjustment(&next_path),
                relation_type: self
                    .resolver
                    .relation_type_along_path(&next_source, &next_path),
                sub_fields: Vec::new(),
                inverse_name: String::new(),
                path: next_path.clone(),
                embedded_return_type: self.embedded_return_type(&next_source, &next_path),
            };
            debug!(relation = %relation.name, source = %relation.source, target = %relation.target, "Synthesized relation");
            relations.push(relation);

            next_source = hop_target;
            next_path = remainder;
        }

        Ok(relations)
    }

    fn first_target(&self, source: &str, name: &str) -> String {
        self.resolver
            .catalog()
            .find_table(source)
            .and_then(|table| table.relation(name))
            .map(|relation| relation.target.clone())
            .unwrap_or_default()
    }
}
