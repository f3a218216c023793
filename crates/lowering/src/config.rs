// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Builder configuration
//!
//! ```rust,ignore
//! use mobile_datamodel_lowering::{DocumentLayout, LoweringConfig};
//!
//! let config = LoweringConfig::from_json(&serde_json::json!({
//!     "layout": "databaseExport",
//!     "resolution": { "maxAliasDepth": 16 }
//! }))?;
//! assert_eq!(config.layout, DocumentLayout::DatabaseExport);
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use mobile_datamodel_semantic::ResolutionConfig;

use crate::error::{LoweringError, LoweringResult};

/// Where the table definitions live in the project document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentLayout {
    /// `{ "project": { "dataModel": {...} } }`
    #[default]
    ProjectEditor,

    /// `{ "dataModel": {...} }`
    DatabaseExport,
}

impl DocumentLayout {
    /// Table definitions of `document`, if any
    pub fn data_models<'v>(&self, document: &'v Value) -> Option<&'v Map<String, Value>> {
        let root = match self {
            DocumentLayout::ProjectEditor => document.get("project")?,
            DocumentLayout::DatabaseExport => document,
        };
        root.get("dataModel")?.as_object()
    }
}

/// Builder configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoweringConfig {
    pub layout: DocumentLayout,
    pub resolution: ResolutionConfig,
}

impl LoweringConfig {
    /// Parse a configuration object. Missing keys take their defaults.
    pub fn from_json(value: &Value) -> LoweringResult<Self> {
        Self::deserialize(value).map_err(|e| LoweringError::MalformedJson(e.to_string()))
    }

    /// Builder method: set the document layout
    pub fn with_layout(mut self, layout: DocumentLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Builder method: set path resolution limits
    pub fn with_resolution(mut self, resolution: ResolutionConfig) -> Self {
        self.resolution = resolution;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = LoweringConfig::default();
        assert_eq!(config.layout, DocumentLayout::ProjectEditor);
        assert_eq!(config.resolution.max_alias_depth, 64);
    }

    #[test]
    fn test_from_json() {
        let config = LoweringConfig::from_json(&json!({
            "layout": "databaseExport",
            "resolution": { "maxAliasDepth": 8 }
        }))
        .unwrap();
        assert_eq!(config.layout, DocumentLayout::DatabaseExport);
        assert_eq!(config.resolution.max_alias_depth, 8);

        let partial = LoweringConfig::from_json(&json!({})).unwrap();
        assert_eq!(partial, LoweringConfig::default());
    }

    #[test]
    fn test_from_json_rejects_unknown_layout() {
        let result = LoweringConfig::from_json(&json!({ "layout": "spreadsheet" }));
        assert!(matches!(result, Err(LoweringError::MalformedJson(_))));
    }

    #[test]
    fn test_builder_methods() {
        let config = LoweringConfig::default()
            .with_layout(DocumentLayout::DatabaseExport)
            .with_resolution(ResolutionConfig { max_alias_depth: 3 });
        assert_eq!(config.layout, DocumentLayout::DatabaseExport);
        assert_eq!(config.resolution.max_alias_depth, 3);
    }

    #[test]
    fn test_layout_lookup() {
        let editor = json!({ "project": { "dataModel": { "1": {} } } });
        let export = json!({ "dataModel": { "1": {} } });
        let count = |layout: DocumentLayout, document: &Value| {
            layout.data_models(document).map(Map::len)
        };
        assert_eq!(count(DocumentLayout::ProjectEditor, &editor), Some(1));
        assert_eq!(count(DocumentLayout::ProjectEditor, &export), None);
        assert_eq!(count(DocumentLayout::DatabaseExport, &export), Some(1));
    }
}
