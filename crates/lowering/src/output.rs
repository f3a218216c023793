// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Resolved schema
//!
//! The read-only result of a build: the resolved tables, the warnings
//! recorded on the way, and the catalog views they were resolved against.

use std::fmt;

use mobile_datamodel_catalog::Catalog;
use mobile_datamodel_ir::naming::{
    field_adjustment, last_segment, parent_path, relation_name_adjustment,
};
use mobile_datamodel_ir::{CatalogTable, DataModel, Field, NativeType, Relation};

use crate::error::LoweringWarning;

/// Resolved tables of a project
pub struct ResolvedSchema<'a> {
    models: Vec<DataModel>,
    warnings: Vec<LoweringWarning>,
    catalog: &'a dyn Catalog,
}

impl fmt::Debug for ResolvedSchema<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSchema")
            .field("models", &self.models)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

impl<'a> ResolvedSchema<'a> {
    pub(crate) fn new(
        models: Vec<DataModel>,
        warnings: Vec<LoweringWarning>,
        catalog: &'a dyn Catalog,
    ) -> Self {
        Self {
            models,
            warnings,
            catalog,
        }
    }

    /// Resolved tables in build order
    pub fn models(&self) -> &[DataModel] {
        &self.models
    }

    pub fn into_models(self) -> Vec<DataModel> {
        self.models
    }

    /// Omissions recorded during the build
    pub fn warnings(&self) -> &[LoweringWarning] {
        &self.warnings
    }

    pub fn find_table_by_name(&self, name: &str) -> Option<&DataModel> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Fields of `table`, empty when the table is unknown
    pub fn fields_of(&self, table: &str) -> &[Field] {
        self.find_table_by_name(table)
            .map(|model| model.fields.as_slice())
            .unwrap_or_default()
    }

    /// Relations of `table`, empty when the table is unknown
    pub fn relations_of(&self, table: &str) -> &[Relation] {
        self.find_table_by_name(table)
            .map(|model| model.relations.as_slice())
            .unwrap_or_default()
    }

    /// Whether `type_name` is a non-empty native type name
    pub fn is_known_native_type(&self, type_name: &str) -> bool {
        NativeType::from_name(type_name).is_some_and(|native| native != NativeType::Empty)
    }

    fn navigable_relations(&self, source: &str) -> impl Iterator<Item = &Relation> {
        self.relations_of(source)
            .iter()
            .filter(move |relation| self.find_table_by_name(&relation.target).is_some())
    }

    /// The relation `field` of `source` navigates through.
    ///
    /// Matched by name, then by the field's path against the relation path,
    /// then against the relation name.
    pub fn find_relation(&self, source: &str, field: &Field) -> Option<&Relation> {
        let by_name = self
            .navigable_relations(source)
            .find(|relation| relation.name == field.name);
        by_name.or_else(|| {
            let path = field.path.as_deref()?;
            self.navigable_relations(source)
                .find(|relation| relation.path == path)
                .or_else(|| {
                    self.navigable_relations(source)
                        .find(|relation| relation.name == path)
                })
        })
    }

    /// The relation of `source` named `path`, or else whose path is `path`
    pub fn find_relation_from_path(&self, source: &str, path: &str) -> Option<&Relation> {
        self.navigable_relations(source)
            .find(|relation| relation.name == path)
            .or_else(|| {
                self.navigable_relations(source)
                    .find(|relation| relation.path == path)
            })
    }

    /// Accessor expression reading `field` from its table.
    ///
    /// An alias through `a.b.c` reads as `aB.b.c`: every relation prefix of
    /// the path becomes one relation name, then the terminal field.
    pub fn field_accessor(&self, field: &Field) -> String {
        let path = field
            .path
            .as_deref()
            .filter(|path| field.is_alias() && path.contains('.'));
        let Some(path) = path else {
            return field_adjustment(&field.name);
        };

        let mut accessor = String::new();
        let mut next = parent_path(path);
        while let Some((_, rest)) = next.split_once('.') {
            accessor.push_str(&relation_name_adjustment(next));
            accessor.push('.');
            next = rest;
        }
        accessor.push_str(&relation_name_adjustment(next));
        accessor.push('.');
        accessor.push_str(&field_adjustment(last_segment(path)));
        accessor
    }

    /// Catalog tables with relation fields kept raw
    pub fn base_tables(&self) -> &[CatalogTable] {
        self.catalog.base_tables()
    }

    /// Catalog tables with relations materialized
    pub fn tables(&self) -> &[CatalogTable] {
        self.catalog.tables()
    }

    pub fn catalog_relations(&self) -> &[Relation] {
        self.catalog.relations()
    }
}
