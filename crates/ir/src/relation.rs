// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Navigable relations between tables

use serde::{Deserialize, Serialize};

use crate::metadata::RelationType;
use crate::model::Field;

/// A relation from `source` to `target`.
///
/// Direct schema relations have an empty `path`. A non-empty `path` marks one
/// hop of a multi-hop alias chain, and `embedded_return_type` then names the
/// remaining tail of that chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub source: String,
    pub target: String,
    pub name: String,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    /// Snapshot of the target's fields when the relation was created
    pub sub_fields: Vec<Field>,
    pub inverse_name: String,
    pub path: String,
    pub embedded_return_type: String,
}

impl Relation {
    /// Direct relation with no sub-fields and no inverse
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        name: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        let target = target.into();
        Self {
            source: source.into(),
            embedded_return_type: target.clone(),
            target,
            name: name.into(),
            relation_type,
            sub_fields: Vec::new(),
            inverse_name: String::new(),
            path: String::new(),
        }
    }

    /// Builder method: set the inverse relation name
    pub fn with_inverse_name(mut self, inverse_name: impl Into<String>) -> Self {
        self.inverse_name = inverse_name.into();
        self
    }

    /// Builder method: set sub-fields
    pub fn with_sub_fields(mut self, sub_fields: Vec<Field>) -> Self {
        self.sub_fields = sub_fields;
        self
    }

    /// Whether this relation was synthesized from an alias chain
    pub fn is_synthesized(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn is_one_to_many(&self) -> bool {
        self.relation_type == RelationType::OneToMany
    }
}
