// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Pass 2: alias resolution
//!
//! Each deferred alias is walked segment by segment. Every relation it goes
//! through is materialized on the table it starts from, the tables it reaches
//! are created when missing, and the chain from the alias's own table to its
//! destination is synthesized as relations.

use tracing::{debug, instrument};

use mobile_datamodel_ir::naming::{last_segment, parent_path};
use mobile_datamodel_ir::{DataModel, Field, NativeType, RelationType, VariableType};
use mobile_datamodel_semantic::RelationSynthesizer;

use crate::builder::Build;
use crate::context::DeferredAlias;
use crate::document::field_relation;
use crate::error::{LoweringResult, LoweringWarning};

impl Build<'_> {
    #[instrument(skip_all, fields(aliases = self.context.aliases.len()))]
    pub(crate) fn resolve_aliases(&mut self) -> LoweringResult<()> {
        let aliases = std::mem::take(&mut self.context.aliases);
        for alias in &aliases {
            self.resolve_alias(alias)?;
        }
        Ok(())
    }

    fn unresolvable(&mut self, alias: &DeferredAlias) {
        self.context.add_warning(LoweringWarning::UnresolvableAlias {
            table: alias.table.clone(),
            field: alias.field.name.clone(),
        });
    }

    fn resolve_alias(&mut self, alias: &DeferredAlias) -> LoweringResult<()> {
        if !alias.field.is_alias() {
            debug!(table = %alias.table, field = %alias.field.name, "Calculated field, nothing to resolve");
            return Ok(());
        }

        let catalog = self.catalog;
        let resolver = self.resolver;
        let Some(table) = alias
            .field
            .data_model_id
            .as_deref()
            .and_then(|id| catalog.find_table_by_id(id))
        else {
            self.unresolvable(alias);
            return Ok(());
        };
        let Some(catalog_field) = table.field(&alias.field.name) else {
            self.unresolvable(alias);
            return Ok(());
        };

        let cleaned = resolver.clean_path(alias.field.path.as_deref().unwrap_or_default(), &table.name)?;
        let mut next = Some(table.name.clone());
        for segment in cleaned.split('.') {
            next = self.materialize_segment(next.as_deref(), segment);
        }

        let target = catalog_field
            .related_data_class
            .clone()
            .unwrap_or_else(|| NativeType::type_string(catalog_field.field_type));
        let reaches_table = catalog.is_known_table(&target);

        if !reaches_table {
            let declared = catalog_field.path.as_deref();
            if let Some(declared) = declared {
                let destination = resolver.destination_before_last_segment(&table.name, Some(declared))?;
                self.create_missing_field(&destination, last_segment(declared));
            }
            let canonical = resolver.resolve_path(declared.unwrap_or_default(), &table.name)?;
            let destination = resolver.destination_before_last_segment(&table.name, Some(&canonical))?;
            self.create_missing_field(&destination, last_segment(&canonical));
        }

        let scope = match alias.context {
            Some(context) => {
                let ancestors = self.context.ancestors(context);
                let prefix = ancestors
                    .iter()
                    .map(|level| level.field.as_str())
                    .collect::<Vec<_>>()
                    .join(".");
                ancestors.first().map(|outermost| {
                    let path = format!(
                        "{prefix}.{}",
                        catalog_field.path.as_deref().unwrap_or_default()
                    );
                    (outermost.table.clone(), path)
                })
            }
            None => Some((
                table.name.clone(),
                alias.field.path.clone().unwrap_or_default(),
            )),
        };
        let Some((source, full_path)) = scope.filter(|(source, _)| catalog.is_known_table(source))
        else {
            self.unresolvable(alias);
            return Ok(());
        };

        let canonical = resolver.resolve_path(&full_path, &source)?;
        let chain = if reaches_table {
            canonical.as_str()
        } else {
            parent_path(&canonical)
        };
        let relations = RelationSynthesizer::new(&resolver).synthesize_relations(&source, chain)?;
        debug!(
            table = %alias.table,
            alias = %alias.field.name,
            path = chain,
            relations = relations.len(),
            "Resolved alias"
        );
        for relation in relations {
            match self.model_mut(&relation.source) {
                Some(model) => {
                    model.add_relation_if_absent(relation);
                }
                None => debug!(table = %relation.source, relation = %relation.name, "No table for synthesized relation"),
            }
        }
        Ok(())
    }

    /// Materialize `segment` on the table `current`, returning the table the
    /// segment leads to when it is a relation
    fn materialize_segment(&mut self, current: Option<&str>, segment: &str) -> Option<String> {
        let catalog = self.catalog;
        let base = catalog.find_base_table(current?)?;
        let catalog_field = base.field(segment)?;
        let mut field = catalog_field.to_field();

        let relation = if catalog_field.is_plain() {
            None
        } else {
            Some(field_relation(&field, &base.name, Vec::new())?)
        };

        let index = match self.model_index(&base.name) {
            Some(index) => index,
            None => {
                debug!(table = %base.name, "Creating table reached through an alias");
                self.models
                    .push(DataModel::new(base.id(), base.name.clone()).as_slave());
                self.models.len() - 1
            }
        };

        let Some(relation) = relation else {
            self.models[index].add_field_if_absent(field);
            return None;
        };
        let target = relation.target.clone();
        field.variable_type = VariableType::Mutable;

        let model = &mut self.models[index];
        let relation_type = relation.relation_type;
        model.add_field_if_absent(field.clone());
        if relation_type == RelationType::ManyToOne {
            model.add_field_if_absent(Field::key_for(&relation.name));
        }
        model.add_relation_if_absent(relation.clone());

        if self.model_index(&target).is_none() {
            let id = catalog
                .find_table(&target)
                .map(|table| table.id())
                .or_else(|| field.related_table_number.map(|number| number.to_string()))
                .unwrap_or_default();
            self.models.push(DataModel::new(id, target.clone()).as_slave());
        }

        if relation_type == RelationType::OneToMany {
            if let Some(inverse) = field.inverse_name.as_deref() {
                self.queue_inverse(&relation, inverse, Some(base.table_number));
            }
        }
        Some(target)
    }

    /// Add the catalog field `end` of `table` to its data model, along with
    /// the field its path names
    fn create_missing_field(&mut self, table: &str, end: &str) {
        let catalog = self.catalog;
        let Some(catalog_table) = catalog.find_table(table) else {
            return;
        };
        let Some(end_field) = catalog_table.field(end) else {
            return;
        };
        let Some(model) = self.model_mut(table) else {
            return;
        };
        if model.add_field_if_absent(end_field.to_field()) {
            debug!(table, field = end, "Added field reached through an alias");
        }
        let path_field = end_field
            .path
            .as_deref()
            .filter(|path| !path.is_empty())
            .and_then(|path| catalog_table.field(path));
        if let Some(path_field) = path_field {
            model.add_field_if_absent(path_field.to_field());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobile_datamodel_catalog::JsonCatalog;
    use mobile_datamodel_ir::{CatalogField, CatalogTable, FieldKind};

    use crate::config::LoweringConfig;

    fn catalog() -> JsonCatalog {
        let mut label = CatalogField::new("label", "3");
        label.kind = Some(FieldKind::Alias);
        label.path = Some("name".to_string());
        let office = CatalogTable::new("Office", 3).with_fields(vec![
            CatalogField::new("name", "3").with_field_type(0),
            label,
        ]);
        JsonCatalog::from_tables(vec![office.clone()], vec![office])
    }

    #[test]
    fn test_segment_without_relation_creates_no_table() {
        let catalog = catalog();
        let mut build = Build::new(&catalog, &LoweringConfig::default());

        assert_eq!(build.materialize_segment(Some("Office"), "label"), None);
        assert!(build.models.is_empty());
    }

    #[test]
    fn test_plain_segment_lands_on_its_table() {
        let catalog = catalog();
        let mut build = Build::new(&catalog, &LoweringConfig::default());

        assert_eq!(build.materialize_segment(Some("Office"), "name"), None);
        assert_eq!(build.models.len(), 1);
        assert!(build.models[0].has_field("name"));
        assert!(build.models[0].is_slave);
    }
}
