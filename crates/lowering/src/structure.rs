// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Pass 1: tables, declared fields and direct relations
//!
//! Every table of the project document becomes a [`DataModel`]. Alias and
//! calculated fields are kept on their table and deferred to pass 2. Nested
//! slave definitions (a relation field carrying `relatedDataClass` and
//! `relatedTableNumber` plus its own field entries) produce slave tables, two
//! levels deep at most.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use mobile_datamodel_ir::naming::relation_name_adjustment;
use mobile_datamodel_ir::{
    DataModel, Field, FieldOrigin, JsonObject, JsonObjectExt, Relation, RelationType,
};
use mobile_datamodel_semantic::RelationSynthesizer;

use crate::builder::Build;
use crate::context::ContextId;
use crate::document::{
    FieldReader, META_KEY, apply_table_metadata, field_relation, object_entries,
};
use crate::error::LoweringResult;

/// Fields and relations of an earlier slave emission of a table, merged back
/// once the table's own definition is read
#[derive(Default)]
struct Saved {
    fields: Vec<Field>,
    relations: Vec<Relation>,
}

/// Fields found in a second-level slave definition
struct NestedSlave {
    table: String,
    id: String,
    fields: Vec<Field>,
}

fn nested_table(object: &JsonObject) -> Option<(&str, i64)> {
    Some((
        object.get_str("relatedDataClass")?,
        object.get_i64("relatedTableNumber")?,
    ))
}

/// Name a field contributes to a composed path
fn path_part(field: &Field) -> &str {
    match field.path.as_deref() {
        Some(path) if field.is_alias() => path,
        _ => &field.name,
    }
}

fn is_deferred(field: &Field) -> bool {
    field.kind.is_some_and(|kind| kind.is_deferred())
}

impl Build<'_> {
    #[instrument(skip_all, fields(tables = tables.len()))]
    pub(crate) fn build_structure(&mut self, tables: &Map<String, Value>) -> LoweringResult<()> {
        for (table_key, definition) in object_entries(tables) {
            let name = definition
                .get_object(META_KEY)
                .and_then(|meta| meta.get_str("name"));
            match name {
                Some(name) => self.build_table(table_key, name, definition)?,
                None => debug!(table_key, "Table has no name, skipped"),
            }
        }
        Ok(())
    }

    fn build_table(
        &mut self,
        table_key: &str,
        name: &str,
        definition: &JsonObject,
    ) -> LoweringResult<()> {
        let mut saved = Saved::default();
        if let Some(index) = self.model_index(name) {
            let earlier = self.models.remove(index);
            debug!(table = name, "Replacing slave emission with declared table");
            saved.fields = earlier.fields;
            saved.relations = earlier.relations;
        }

        let mut model = DataModel::new(table_key, name);
        if let Some(meta) = definition.get_object(META_KEY) {
            apply_table_metadata(&mut model, meta);
        }

        let resolver = self.resolver;
        let reader = FieldReader::new(&resolver);
        let table_number = table_key.parse::<i64>().ok();

        for (key, entry) in object_entries(definition).filter(|(key, _)| *key != META_KEY) {
            let mut field = reader.read_field(entry, key, Some(table_key), name)?;
            let sub_table = field.related_table().unwrap_or(name).to_string();
            let mut sub_fields = reader.read_sub_fields(entry, &sub_table)?;

            if is_deferred(&field) {
                for sub_field in &mut sub_fields {
                    sub_field.related_table_number = field.related_table_number;
                    sub_field.data_model_id = field.related_data_class.clone();
                }
                field.sub_fields_for_alias = sub_fields;
                self.add_with_sanity(&mut model.fields, field.clone(), name);
                self.context.defer_alias(name, field, None);
                continue;
            }

            field.origin = FieldOrigin::Declared;
            self.add_with_sanity(&mut model.fields, field.clone(), name);
            if let Some(relation) = field_relation(&field, name, sub_fields) {
                match relation.relation_type {
                    RelationType::ManyToOne => model.fields.push(Field::key_for(&relation.name)),
                    RelationType::OneToMany => {
                        if let Some(inverse) = field.inverse_name.as_deref() {
                            self.queue_inverse(&relation, inverse, table_number);
                        }
                    }
                }
                model.relations.push(relation);
            }

            if let Some((slave_name, slave_number)) = nested_table(entry) {
                self.build_slave(&mut model, &field, entry, slave_name, slave_number, &mut saved)?;
            }
        }

        for mut field in saved.fields {
            if !model.has_field(&field.name) {
                field.origin = FieldOrigin::Slave;
                model.fields.push(field);
            }
        }
        for relation in saved.relations {
            model.add_relation_if_absent(relation);
        }

        debug!(
            table = name,
            fields = model.fields.len(),
            relations = model.relations.len(),
            "Built table"
        );
        self.models.push(model);
        Ok(())
    }

    /// Read the slave definition nested under `parent` of the table being built
    fn build_slave(
        &mut self,
        top: &mut DataModel,
        parent: &Field,
        definition: &JsonObject,
        slave_name: &str,
        slave_number: i64,
        saved: &mut Saved,
    ) -> LoweringResult<()> {
        let slave_id = slave_number.to_string();
        let context = self.context.enter_slave(None, top.name.clone(), parent.name.clone());
        let mut slave = DataModel::new(slave_id.clone(), slave_name).as_slave();
        let mut nested = Vec::new();

        let resolver = self.resolver;
        let reader = FieldReader::new(&resolver);
        let synthesizer = RelationSynthesizer::new(&resolver);

        for (key, entry) in object_entries(definition) {
            let mut field = reader.read_field(entry, key, Some(&slave_id), slave_name)?;
            let sub_table = field.related_table().unwrap_or(slave_name).to_string();
            let mut sub_fields = reader.read_sub_fields(entry, &sub_table)?;

            if is_deferred(&field) {
                for sub_field in &mut sub_fields {
                    sub_field.related_table_number = field.related_table_number;
                    sub_field.data_model_id = field.related_data_class.clone();
                }
                field.sub_fields_for_alias = sub_fields;
                self.context.defer_alias(slave_name, field.clone(), Some(context));
                slave.fields.push(field.clone());
            } else {
                field.origin = FieldOrigin::Slave;
                self.add_with_sanity(&mut slave.fields, field.clone(), slave_name);
                if let Some(relation) = field_relation(&field, slave_name, sub_fields) {
                    match relation.relation_type {
                        RelationType::ManyToOne => {
                            slave.fields.push(Field::key_for(&relation.name))
                        }
                        RelationType::OneToMany => {
                            if let Some(inverse) = field.inverse_name.as_deref() {
                                self.queue_inverse(&relation, inverse, Some(slave_number));
                            }
                        }
                    }

                    // The enclosing table reaches the target through the slave
                    let path = format!("{}.{}", path_part(parent), path_part(&field));
                    top.relations.push(Relation {
                        source: top.name.clone(),
                        target: relation.target.clone(),
                        name: relation_name_adjustment(&path),
                        relation_type: relation.relation_type,
                        sub_fields: relation.sub_fields.clone(),
                        inverse_name: String::new(),
                        embedded_return_type: synthesizer.embedded_return_type(&top.name, &path),
                        path,
                    });
                    slave.relations.push(relation);
                }
            }

            if let Some((table, number)) = nested_table(entry) {
                let fields = self.read_nested_slave(context, slave_name, &field, entry, table, number)?;
                nested.push(NestedSlave {
                    table: table.to_string(),
                    id: number.to_string(),
                    fields,
                });
            }
        }

        for level_two in nested {
            self.merge_nested_slave(top, &mut slave, level_two);
        }
        self.merge_slave(top, slave, saved);
        Ok(())
    }

    /// Scalar and alias fields of a second-level slave definition
    fn read_nested_slave(
        &mut self,
        parent_context: ContextId,
        slave_name: &str,
        via: &Field,
        definition: &JsonObject,
        table: &str,
        number: i64,
    ) -> LoweringResult<Vec<Field>> {
        let id = number.to_string();
        let context = self
            .context
            .enter_slave(Some(parent_context), slave_name, via.name.clone());

        let resolver = self.resolver;
        let reader = FieldReader::new(&resolver);
        let mut fields = Vec::new();
        for (key, entry) in object_entries(definition) {
            let mut field = reader.read_field(entry, key, Some(&id), table)?;
            if is_deferred(&field) {
                self.context.defer_alias(table, field.clone(), Some(context));
            } else {
                field.origin = FieldOrigin::Slave;
            }
            fields.push(field);
        }
        Ok(fields)
    }

    fn merge_nested_slave(&mut self, top: &mut DataModel, slave: &mut DataModel, nested: NestedSlave) {
        if let Some(existing) = self.model_mut(&nested.table) {
            for field in nested.fields {
                existing.add_field_if_absent(field);
            }
        } else if nested.table == top.name {
            top.fields.extend(nested.fields);
        } else if nested.table == slave.name {
            slave.fields.extend(nested.fields);
        } else {
            let mut model = DataModel::new(nested.id, nested.table).as_slave();
            model.fields = nested.fields;
            self.models.push(model);
        }
    }

    fn merge_slave(&mut self, top: &DataModel, slave: DataModel, saved: &mut Saved) {
        if let Some(existing) = self.model_mut(&slave.name) {
            for field in slave.fields {
                existing.add_field_if_absent(field);
            }
            for relation in slave.relations {
                existing.add_relation_if_absent(relation);
            }
        } else if slave.name == top.name {
            saved.fields.extend(slave.fields);
            saved.relations.extend(slave.relations);
        } else {
            debug!(table = %slave.name, fields = slave.fields.len(), "New slave table");
            self.models.push(slave);
        }
    }
}
