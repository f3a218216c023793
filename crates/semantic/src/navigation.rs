// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! Path queries derived from segment resolution

use tracing::debug;

use mobile_datamodel_catalog::RelationType;
use mobile_datamodel_ir::naming::last_segment;

use crate::error::SemanticResult;
use crate::resolution::{PathResolver, Resolution};

impl PathResolver<'_> {
    /// Table owning the terminal field of `path`.
    ///
    /// Unresolved segments are skipped, so the last table actually reached
    /// is returned. An absent path stays on `source`.
    pub fn destination_before_last_segment(
        &self,
        source: &str,
        path: Option<&str>,
    ) -> SemanticResult<String> {
        let mut stack = Vec::new();
        let mut table = source.to_string();
        for part in path.into_iter().flat_map(|path| path.split('.')) {
            if let Resolution::Resolved { table: next, .. } =
                self.segment(part, &table, &mut stack)?
            {
                table = next;
            }
        }
        debug!(source, ?path, table, "Destination before last segment");
        Ok(table)
    }

    /// Table reached by following direct relations along `path`.
    ///
    /// When a segment is not a relation, the type string of the path's
    /// terminal field on the current table is returned instead, or an empty
    /// string when that field is unknown.
    pub fn destination_with_field(&self, source: &str, path: &str) -> String {
        let mut table = source.to_string();
        for part in path.split('.') {
            match self.catalog.find_relation(&table, part) {
                Some(relation) => table = relation.target.clone(),
                None => {
                    return self
                        .catalog
                        .find_table(&table)
                        .and_then(|t| t.field(last_segment(path)))
                        .map(|field| field.field_type_string.clone())
                        .unwrap_or_default();
                }
            }
        }
        table
    }

    /// Cardinality of the chain of relations along `path`.
    ///
    /// The first one-to-many hop makes the whole chain one-to-many. A hop
    /// that is not a relation leaves nothing to follow.
    pub fn relation_type_along_path(&self, source: &str, path: &str) -> RelationType {
        let mut table = source.to_string();
        for part in path.split('.') {
            let relation = self.catalog.find_relation(&table, part);
            if relation.is_some_and(|r| r.relation_type == RelationType::OneToMany) {
                return RelationType::OneToMany;
            }
            table = relation.map(|r| r.target.clone()).unwrap_or_default();
        }
        RelationType::ManyToOne
    }
}
