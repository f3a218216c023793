// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Final passes: duplicate removal, unknown targets, inverses and ordering

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use mobile_datamodel_catalog::Catalog;
use mobile_datamodel_ir::{DataModel, Field, FieldOrigin, Relation};

use crate::builder::Build;
use crate::context::BuildContext;
use crate::error::LoweringWarning;

/// Keep one field per name.
///
/// A single declared copy wins. Without one, a single slave copy wins.
/// Otherwise the first occurrence is kept.
pub(crate) fn dedup_fields(fields: Vec<Field>) -> Vec<Field> {
    let mut counts: HashMap<(&str, FieldOrigin), usize> = HashMap::new();
    for field in &fields {
        *counts.entry((field.name.as_str(), field.origin)).or_default() += 1;
    }
    let count = |name: &str, origin: FieldOrigin| {
        counts.get(&(name, origin)).copied().unwrap_or_default()
    };

    let mut kept_names = HashSet::new();
    let mut kept = Vec::with_capacity(fields.len());
    for field in &fields {
        if kept_names.contains(field.name.as_str()) {
            continue;
        }
        let declared = count(&field.name, FieldOrigin::Declared);
        let slaves = count(&field.name, FieldOrigin::Slave);
        let wins = if declared == 1 {
            field.origin == FieldOrigin::Declared
        } else if declared == 0 && slaves == 1 {
            field.origin == FieldOrigin::Slave
        } else {
            true
        };
        if wins {
            kept_names.insert(field.name.as_str());
            kept.push(field.clone());
        }
    }
    kept
}

/// Keep the first of every set of equal relations
pub(crate) fn dedup_relations(relations: Vec<Relation>) -> Vec<Relation> {
    let mut kept: Vec<Relation> = Vec::with_capacity(relations.len());
    for relation in relations {
        if !kept.contains(&relation) {
            kept.push(relation);
        }
    }
    kept
}

fn targets_known_table(field: &Field, catalog: &dyn Catalog) -> bool {
    field
        .related_table_number
        .is_none_or(|number| catalog.is_known_table_number(number))
}

fn target_number(field: &Field) -> String {
    field
        .related_table_number
        .map(|number| number.to_string())
        .unwrap_or_default()
}

/// Apply the sanity rules to one table
pub(crate) fn sanitize_model(model: &mut DataModel, catalog: &dyn Catalog, context: &mut BuildContext) {
    let mut fields = dedup_fields(std::mem::take(&mut model.fields));
    fields.retain(|field| {
        let known = targets_known_table(field, catalog);
        if !known {
            context.add_warning(LoweringWarning::UnknownTargetTable {
                table: model.name.clone(),
                reference: field.name.clone(),
                target: target_number(field),
            });
        }
        known
    });
    model.fields = fields;

    let mut relations = std::mem::take(&mut model.relations);
    relations.retain(|relation| {
        let known = catalog.is_known_table(&relation.target) || relation.is_synthesized();
        if !known {
            context.add_warning(LoweringWarning::UnknownTargetTable {
                table: model.name.clone(),
                reference: relation.name.clone(),
                target: relation.target.clone(),
            });
        }
        known
    });
    for relation in &mut relations {
        let relation_name = relation.name.as_str();
        relation.sub_fields.retain(|field| {
            let known = targets_known_table(field, catalog);
            if !known {
                context.add_warning(LoweringWarning::UnknownTargetTable {
                    table: model.name.clone(),
                    reference: format!("{relation_name}.{}", field.name),
                    target: target_number(field),
                });
            }
            known
        });
    }
    model.relations = dedup_relations(relations);
}

/// Key fields after all others, then fields without an inverse before those
/// with one. The sort is stable.
pub(crate) fn reorder_fields(fields: &mut [Field]) {
    fields.sort_by(|a, b| {
        (a.is_private_relation_field(), a.inverse_name.as_deref())
            .cmp(&(b.is_private_relation_field(), b.inverse_name.as_deref()))
    });
}

impl Build<'_> {
    #[instrument(skip_all)]
    pub(crate) fn sanitize(&mut self) {
        for model in &mut self.models {
            sanitize_model(model, self.catalog, &mut self.context);
        }
    }

    /// Land every queued inverse relation on its target table
    #[instrument(skip_all, fields(intents = self.context.intents.len()))]
    pub(crate) fn apply_intents(&mut self) {
        let intents = std::mem::take(&mut self.context.intents);
        for intent in intents {
            let Some(index) = self.model_index(&intent.target) else {
                self.context.add_warning(LoweringWarning::UnmaterializedInverse {
                    target: intent.target,
                    field: intent.field.name,
                });
                continue;
            };
            let model = &mut self.models[index];
            debug!(table = %model.name, field = %intent.field.name, "Adding inverse relation");
            model.add_field_if_absent(intent.field);
            model.add_field_if_absent(intent.key_field);
            model.add_relation_if_absent(intent.relation);
        }
    }

    pub(crate) fn reorder(&mut self) {
        for model in &mut self.models {
            reorder_fields(&mut model.fields);
        }
    }
}
