// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Model builder
//!
//! The builder runs in fixed order:
//!
//! ```text
//! structure (pass 1) → aliases (pass 2) → sanity → inverse intents → reorder
//! ```
//!
//! Inverse intents are applied after the sanity pass, so an inverse field is
//! never removed by the duplicate rule.

use serde_json::Value;
use tracing::{debug, instrument, trace};

use mobile_datamodel_catalog::Catalog;
use mobile_datamodel_ir::{DataModel, Field, Relation};
use mobile_datamodel_semantic::PathResolver;

use crate::config::LoweringConfig;
use crate::context::{BuildContext, InverseIntent};
use crate::document::{field_relation, inverse_field, parse_document};
use crate::error::{LoweringError, LoweringResult};
use crate::output::ResolvedSchema;

/// Builds resolved data models from a project document
#[derive(Clone, Copy)]
pub struct ModelBuilder<'a> {
    catalog: &'a dyn Catalog,
    config: LoweringConfig,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(catalog: &'a dyn Catalog, config: LoweringConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }

    /// Build every table of `project`
    #[instrument(skip_all, fields(layout = ?self.config.layout))]
    pub fn build(&self, project: &Value) -> LoweringResult<ResolvedSchema<'a>> {
        match project {
            Value::Null => return Err(LoweringError::EmptyInput),
            Value::Object(object) if object.is_empty() => return Err(LoweringError::EmptyInput),
            Value::Object(_) => {}
            _ => {
                return Err(LoweringError::MalformedJson(
                    "project document is not an object".to_string(),
                ));
            }
        }

        let mut build = Build::new(self.catalog, &self.config);
        match self.config.layout.data_models(project) {
            Some(tables) => build.build_structure(tables)?,
            None => debug!("Project document declares no data model"),
        }
        build.resolve_aliases()?;
        build.sanitize();
        build.apply_intents();
        build.reorder();

        for model in &build.models {
            trace!(
                table = %model.name,
                fields = ?model.fields.iter().map(|f| &f.name).collect::<Vec<_>>(),
                relations = ?model.relations.iter().map(|r| &r.name).collect::<Vec<_>>(),
                "Resolved table"
            );
        }
        Ok(ResolvedSchema::new(
            build.models,
            build.context.into_warnings(),
            self.catalog,
        ))
    }

    /// Build every table of a project document given as text
    pub fn build_from_str(&self, json: &str) -> LoweringResult<ResolvedSchema<'a>> {
        self.build(&parse_document(json)?)
    }
}

/// Build `project` against `catalog` with the default configuration
pub fn build_data_models<'a>(
    project: &Value,
    catalog: &'a dyn Catalog,
) -> LoweringResult<ResolvedSchema<'a>> {
    ModelBuilder::new(catalog, LoweringConfig::default()).build(project)
}

/// Build a project document given as text with the default configuration
pub fn build_data_models_from_str<'a>(
    json: &str,
    catalog: &'a dyn Catalog,
) -> LoweringResult<ResolvedSchema<'a>> {
    ModelBuilder::new(catalog, LoweringConfig::default()).build_from_str(json)
}

/// State of one build
pub(crate) struct Build<'a> {
    pub(crate) catalog: &'a dyn Catalog,
    pub(crate) resolver: PathResolver<'a>,
    pub(crate) models: Vec<DataModel>,
    pub(crate) context: BuildContext,
}

impl<'a> Build<'a> {
    pub(crate) fn new(catalog: &'a dyn Catalog, config: &LoweringConfig) -> Self {
        Self {
            catalog,
            resolver: PathResolver::new(catalog).with_config(config.resolution),
            models: Vec::new(),
            context: BuildContext::new(),
        }
    }

    pub(crate) fn model_index(&self, name: &str) -> Option<usize> {
        self.models.iter().position(|m| m.name == name)
    }

    pub(crate) fn model_mut(&mut self, name: &str) -> Option<&mut DataModel> {
        self.models.iter_mut().find(|m| m.name == name)
    }

    /// Append `field` only if the catalog table `table` has a field of that name
    pub(crate) fn add_with_sanity(&self, fields: &mut Vec<Field>, field: Field, table: &str) {
        let known = self
            .catalog
            .find_table(table)
            .is_some_and(|t| t.field(&field.name).is_some());
        if known {
            fields.push(field);
        } else {
            debug!(table, field = %field.name, "Field not in catalog, skipped");
        }
    }

    /// Queue the many-to-one inverse of the one-to-many `relation`
    pub(crate) fn queue_inverse(
        &mut self,
        relation: &Relation,
        inverse_name: &str,
        source_number: Option<i64>,
    ) {
        let field = inverse_field(
            inverse_name,
            &relation.name,
            &relation.source,
            source_number,
        );
        if let Some(inverse) = field_relation(&field, &relation.target, Vec::new()) {
            debug!(target = %relation.target, inverse = %inverse.name, "Queued inverse relation");
            self.context.queue_inverse(InverseIntent {
                target: relation.target.clone(),
                key_field: Field::key_for(&inverse.name),
                field,
                relation: inverse,
            });
        }
    }
}
