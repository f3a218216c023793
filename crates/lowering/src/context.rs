// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Build context for tracking state across passes

use tracing::warn;

use mobile_datamodel_ir::{Field, Relation};

use crate::error::LoweringWarning;

/// Index of a [`NestingContext`] in the build context's arena
pub type ContextId = usize;

/// A table and the relation field through which it nests another table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub table: String,
    pub field: String,
}

/// One level of slave nesting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingContext {
    pub parent: Option<ContextId>,
    pub via: TableRef,
}

/// An alias or calculated field whose resolution waits for pass 2
#[derive(Debug, Clone)]
pub struct DeferredAlias {
    /// Table that declares the field
    pub table: String,
    pub field: Field,
    /// `None` for a field declared at top level
    pub context: Option<ContextId>,
}

/// A many-to-one inverse to add to `target` once every table exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverseIntent {
    pub target: String,
    pub field: Field,
    pub key_field: Field,
    pub relation: Relation,
}

/// Context for tracking state during a build
///
/// The context maintains:
/// - Warnings for every field or relation left out of the output
/// - The arena of slave nesting contexts
/// - The pass 2 worklist of deferred aliases
/// - Inverse relations waiting for their target table
#[derive(Debug, Default)]
pub struct BuildContext {
    warnings: Vec<LoweringWarning>,
    nesting: Vec<NestingContext>,
    pub(crate) aliases: Vec<DeferredAlias>,
    pub(crate) intents: Vec<InverseIntent>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it
    pub fn add_warning(&mut self, warning: LoweringWarning) {
        warn!(severity = ?warning.severity(), "{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[LoweringWarning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<LoweringWarning> {
        self.warnings
    }

    /// Open a nesting level below `parent`, entered through `field` of `table`
    pub fn enter_slave(
        &mut self,
        parent: Option<ContextId>,
        table: impl Into<String>,
        field: impl Into<String>,
    ) -> ContextId {
        self.nesting.push(NestingContext {
            parent,
            via: TableRef {
                table: table.into(),
                field: field.into(),
            },
        });
        self.nesting.len() - 1
    }

    pub fn nesting(&self, id: ContextId) -> Option<&NestingContext> {
        self.nesting.get(id)
    }

    /// Every level enclosing `id` and `id` itself, outermost first
    pub fn ancestors(&self, id: ContextId) -> Vec<&TableRef> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(context) = current.and_then(|id| self.nesting.get(id)) {
            chain.push(&context.via);
            current = context.parent;
        }
        chain.reverse();
        chain
    }

    /// Defer an alias to pass 2
    pub fn defer_alias(&mut self, table: &str, field: Field, context: Option<ContextId>) {
        self.aliases.push(DeferredAlias {
            table: table.to_string(),
            field,
            context,
        });
    }

    pub fn queue_inverse(&mut self, intent: InverseIntent) {
        self.intents.push(intent);
    }
}
