// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! YAML scenario files
//!
//! A scenario bundles a catalog document, a project document and the tables
//! expected after resolution. Documents are written in YAML and handed to the
//! loaders as JSON values. Table and field keys that look like numbers must be
//! quoted so they stay strings.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use mobile_datamodel_ir::DataModel;

use crate::assertions::ModelAssertions;

/// A single resolution scenario
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub description: String,
    pub catalog: Value,
    pub project: Value,
    #[serde(default)]
    pub expect: Vec<TableExpectation>,
}

/// Expected content of one resolved table
#[derive(Debug, Clone, Deserialize)]
pub struct TableExpectation {
    pub table: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub absent_fields: Vec<String>,
    #[serde(default)]
    pub relations: Vec<RelationExpectation>,
}

/// Expected relation of a resolved table
#[derive(Debug, Clone, Deserialize)]
pub struct RelationExpectation {
    pub name: String,
    pub target: String,
    /// `MANY_TO_ONE` or `ONE_TO_MANY`
    #[serde(rename = "type")]
    pub relation_type: Option<String>,
    pub path: Option<String>,
}

/// Scenario parse errors
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Empty scenario file")]
    EmptyFile,
}

/// Parse a scenario file
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let content = std::fs::read_to_string(path)?;
    parse_scenario(&content)
}

/// Parse scenario content from a string
pub fn parse_scenario(content: &str) -> Result<Scenario, ScenarioError> {
    if content.trim().is_empty() {
        return Err(ScenarioError::EmptyFile);
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Check resolved models against the scenario's expectations
pub fn validate_scenario(scenario: &Scenario, models: &[DataModel]) {
    for expected in &scenario.expect {
        ModelAssertions::assert_single_table(models, &expected.table);
        for field in &expected.fields {
            ModelAssertions::assert_field(models, &expected.table, field);
        }
        for field in &expected.absent_fields {
            ModelAssertions::assert_no_field(models, &expected.table, field);
        }
        for relation in &expected.relations {
            let actual = ModelAssertions::assert_relation(models, &expected.table, &relation.name);
            assert_eq!(
                actual.target, relation.target,
                "[{}] relation '{}' target mismatch",
                scenario.description, relation.name
            );
            if let Some(relation_type) = &relation.relation_type {
                assert_eq!(
                    &actual.relation_type.to_string(),
                    relation_type,
                    "[{}] relation '{}' type mismatch",
                    scenario.description,
                    relation.name
                );
            }
            if let Some(path) = &relation.path {
                assert_eq!(
                    &actual.path, path,
                    "[{}] relation '{}' path mismatch",
                    scenario.description, relation.name
                );
            }
        }
    }
}
