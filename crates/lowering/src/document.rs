// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Reading tables and fields out of the project document

use serde_json::Value;
use tracing::trace;

use mobile_datamodel_catalog::{FieldKind, NativeType, Relation, RelationType, VariableType};
use mobile_datamodel_ir::naming::{correct_icon_path, table_name_adjustment};
use mobile_datamodel_ir::{DataModel, Field, FieldOrigin, JsonObject, JsonObjectExt};
use mobile_datamodel_semantic::{PathResolver, SemanticResult};

use crate::error::{LoweringError, LoweringResult};

/// Key of the table metadata entry
pub(crate) const META_KEY: &str = "";

/// Type string of a to-many relation onto `table`
pub(crate) fn entities_type(table: &str) -> String {
    format!("Entities<{}>", table_name_adjustment(table))
}

/// Object-valued entries of a table or field definition
pub(crate) fn object_entries(object: &JsonObject) -> impl Iterator<Item = (&str, &JsonObject)> {
    object
        .iter()
        .filter_map(|(key, value)| Some((key.as_str(), value.as_object()?)))
}

/// Copy label, short label, icon and validated filter from the metadata entry
pub(crate) fn apply_table_metadata(model: &mut DataModel, meta: &JsonObject) {
    model.label = meta.get_string("label");
    model.short_label = meta.get_string("shortLabel");
    model.icon_path = meta
        .get_str("icon")
        .filter(|icon| icon.contains('.'))
        .map(correct_icon_path);
    model.query = meta
        .get_object("filter")
        .filter(|filter| filter.get_bool("validated") == Some(true))
        .and_then(|filter| filter.get_str("string"))
        .map(|query| query.replace('"', "'"));
}

/// Reads project field definitions, seeing through aliases on the way
pub(crate) struct FieldReader<'r, 'a> {
    resolver: &'r PathResolver<'a>,
}

impl<'r, 'a> FieldReader<'r, 'a> {
    pub(crate) fn new(resolver: &'r PathResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Parse the field stored under `key` of `table`
    pub(crate) fn read_field(
        &self,
        object: &JsonObject,
        key: &str,
        data_model_id: Option<&str>,
        table: &str,
    ) -> SemanticResult<Field> {
        let mut field = Field::new("");
        field.label = object.get_string("label");
        field.short_label = object.get_string("shortLabel");
        field.field_type = object.get_i64("fieldType");
        field.value_type = object.get_string("valueType");
        field.related_table_number = object.get_i64("relatedTableNumber");
        field.inverse_name = object.get_string("inverseName");

        if let Some(name) = object.get_str("name") {
            field.name = name.to_string();
            field.id = Some(key.to_string());
            field.field_type_string = Some(NativeType::type_string(field.field_type));
        }
        if let Some(kind) = object.get_str("kind").map(FieldKind::from_name) {
            field.kind = Some(kind);
            if kind.is_deferred() {
                field.name = key.to_string();
                field.field_type_string = Some(NativeType::type_string(field.field_type));
            }
        }
        field.format = object.get_string("format");
        if let Some(icon) = object.get_str("icon").filter(|icon| icon.contains('.')) {
            field.icon = Some(correct_icon_path(icon));
        }

        // Nested slave definitions carry `isToMany`
        match object.get_bool("isToMany") {
            Some(is_to_many) => {
                field.name = key.to_string();
                field.variable_type = VariableType::Mutable;
                if let Some(target) = object.get_str("relatedDataClass") {
                    field.is_to_many = Some(is_to_many);
                    if is_to_many {
                        field.related_entities = Some(target.to_string());
                        field.field_type_string = Some(entities_type(target));
                    } else {
                        field.related_data_class = Some(target.to_string());
                        field.field_type_string = Some(target.to_string());
                    }
                }
            }
            None => {
                if let Some(target) = object.get_str("relatedDataClass") {
                    field.name = key.to_string();
                    field.is_to_many = Some(false);
                    field.related_data_class = Some(target.to_string());
                    field.field_type_string = Some(target.to_string());
                    field.variable_type = VariableType::Mutable;
                }
                if let Some(target) = object.get_str("relatedEntities") {
                    field.name = key.to_string();
                    field.is_to_many = Some(true);
                    field.related_entities = Some(target.to_string());
                    field.field_type_string = Some(entities_type(target));
                    field.variable_type = VariableType::Mutable;
                }
            }
        }

        field.data_model_id = data_model_id.map(str::to_string);
        if let Some(path) = object.get_str("path").filter(|_| field.is_alias()) {
            self.read_alias_path(&mut field, path, table)?;
        }

        if field.label.as_deref().is_none_or(str::is_empty) {
            field.label = Some(field.name.clone());
        }
        if field.short_label.as_deref().is_none_or(str::is_empty) {
            field.short_label = Some(field.name.clone());
        }

        trace!(table, key, name = %field.name, "Read field");
        Ok(field)
    }

    /// Store the canonical path of an alias and derive its type
    fn read_alias_path(&self, field: &mut Field, path: &str, table: &str) -> SemanticResult<()> {
        let canonical = self.resolver.resolve_path(path, table)?;

        // A single unchanged segment may name a relation of the table itself
        if path == canonical && !canonical.contains('.') {
            let relation = self
                .resolver
                .catalog()
                .find_table(table)
                .and_then(|t| t.relation(&canonical));
            if let Some(relation) = relation {
                field.related_data_class = Some(relation.target.clone());
                field.inverse_name = Some(relation.inverse_name.clone());
                field.field_type = None;
                field.variable_type = VariableType::Mutable;
                match relation.relation_type {
                    RelationType::ManyToOne => {
                        field.field_type_string = Some(relation.target.clone());
                        field.is_to_many = Some(false);
                    }
                    RelationType::OneToMany => {
                        field.field_type_string = Some(entities_type(&relation.target));
                        field.is_to_many = Some(true);
                    }
                }
            }
        }

        if field.field_type_string.as_deref().is_none_or(str::is_empty) {
            let destination = self.resolver.destination_with_field(table, &canonical);
            let type_string = match self.resolver.relation_type_along_path(table, &canonical) {
                RelationType::OneToMany => format!("Entities<{destination}>"),
                RelationType::ManyToOne => destination,
            };
            field.field_type_string = Some(type_string);
        }

        field.path = Some(canonical);
        Ok(())
    }

    /// Fields declared inside a nested definition of `table`.
    ///
    /// Relation and alias entries keep their own nested fields in
    /// `sub_fields_for_alias`.
    pub(crate) fn read_sub_fields(
        &self,
        object: &JsonObject,
        table: &str,
    ) -> SemanticResult<Vec<Field>> {
        let mut sub_fields = Vec::new();
        for (key, entry) in object_entries(object) {
            let mut field = self.read_field(entry, key, None, table)?;
            field.origin = FieldOrigin::Slave;
            let nests = field
                .kind
                .is_some_and(|kind| kind.is_relation() || kind == FieldKind::Alias);
            if nests {
                if let Some(target) = field.related_data_class.clone() {
                    field.sub_fields_for_alias = self.read_sub_fields(entry, &target)?;
                }
            }
            sub_fields.push(field);
        }
        Ok(sub_fields)
    }
}

/// Relation declared by a relation field of `table`.
///
/// Sub-fields are re-homed onto the relation's target.
pub(crate) fn field_relation(
    field: &Field,
    table: &str,
    mut sub_fields: Vec<Field>,
) -> Option<Relation> {
    let (target, relation_type) = match field.kind? {
        FieldKind::RelatedEntity => {
            let target = field.related_data_class.as_deref()?;
            for sub_field in &mut sub_fields {
                sub_field.related_table_number = field.related_table_number;
                sub_field.data_model_id = Some(target.to_string());
            }
            (target, RelationType::ManyToOne)
        }
        FieldKind::RelatedEntities => {
            let target = field.related_entities.as_deref()?;
            for sub_field in &mut sub_fields {
                sub_field.data_model_id = Some(target.to_string());
            }
            (target, RelationType::OneToMany)
        }
        _ => return None,
    };

    Some(
        Relation::new(table, target, field.name.clone(), relation_type)
            .with_inverse_name(field.inverse_name.clone().unwrap_or_default())
            .with_sub_fields(sub_fields),
    )
}

/// Many-to-one field pointing back at `source` for a one-to-many relation
pub(crate) fn inverse_field(
    name: &str,
    inverse_of: &str,
    source: &str,
    source_number: Option<i64>,
) -> Field {
    let mut field = Field::new(name).with_kind(FieldKind::RelatedEntity);
    field.inverse_name = Some(inverse_of.to_string());
    field.related_data_class = Some(source.to_string());
    field.field_type_string = Some(source.to_string());
    field.related_table_number = source_number;
    field.variable_type = VariableType::Mutable;
    field
}

/// Parse a project document from text
pub(crate) fn parse_document(json: &str) -> LoweringResult<Value> {
    if json.trim().is_empty() {
        return Err(LoweringError::EmptyInput);
    }
    serde_json::from_str(json).map_err(|e| LoweringError::MalformedJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobile_datamodel_catalog::JsonCatalog;
    use serde_json::json;

    fn catalog() -> JsonCatalog {
        let document = json!({ "structure": { "definition": [
            {
                "name": "Employee",
                "tableNumber": 1,
                "fields": [
                    { "name": "name", "kind": "storage", "fieldType": 0 },
                    {
                        "name": "manager",
                        "kind": "relatedEntity",
                        "relatedDataClass": "Employee",
                        "relatedTableNumber": 1,
                        "inverseName": "reports",
                        "isToOne": true
                    },
                    {
                        "name": "reports",
                        "kind": "relatedEntities",
                        "relatedDataClass": "Employee",
                        "relatedTableNumber": 1,
                        "inverseName": "manager",
                        "isToMany": true
                    }
                ]
            }
        ] } });
        JsonCatalog::from_value(&document).unwrap()
    }

    fn object(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_table_metadata() {
        let mut model = DataModel::new("1", "Employee");
        apply_table_metadata(
            &mut model,
            &object(json!({
                "name": "Employee",
                "label": "Employees",
                "icon": "QMobile/Icons/Person.png",
                "filter": { "string": "name = \"Smith\"", "validated": true }
            })),
        );
        assert_eq!(model.label.as_deref(), Some("Employees"));
        assert_eq!(model.icon_path.as_deref(), Some("person"));
        assert_eq!(model.query.as_deref(), Some("name = 'Smith'"));
    }

    #[test]
    fn test_unvalidated_filter_and_bare_icon_are_ignored() {
        let mut model = DataModel::new("1", "Employee");
        apply_table_metadata(
            &mut model,
            &object(json!({
                "icon": "person",
                "filter": { "string": "name = 1", "validated": false }
            })),
        );
        assert_eq!(model.icon_path, None);
        assert_eq!(model.query, None);
    }

    #[test]
    fn test_read_storage_field() {
        let catalog = catalog();
        let resolver = PathResolver::new(&catalog);
        let reader = FieldReader::new(&resolver);

        let field = reader
            .read_field(
                &object(json!({ "name": "name", "kind": "storage", "fieldType": 0 })),
                "1",
                Some("1"),
                "Employee",
            )
            .unwrap();
        assert_eq!(field.name, "name");
        assert_eq!(field.id.as_deref(), Some("1"));
        assert_eq!(field.kind, Some(FieldKind::Plain));
        assert_eq!(field.field_type_string.as_deref(), Some("string"));
        assert_eq!(field.label.as_deref(), Some("name"));
        assert_eq!(field.data_model_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_read_relation_fields() {
        let catalog = catalog();
        let resolver = PathResolver::new(&catalog);
        let reader = FieldReader::new(&resolver);

        let to_many = reader
            .read_field(
                &object(json!({ "kind": "relatedEntities", "relatedEntities": "Employee" })),
                "reports",
                Some("1"),
                "Employee",
            )
            .unwrap();
        assert_eq!(to_many.name, "reports");
        assert_eq!(to_many.is_to_many, Some(true));
        assert_eq!(to_many.field_type_string.as_deref(), Some("Entities<Employee>"));
        assert_eq!(to_many.variable_type, VariableType::Mutable);

        let nested = reader
            .read_field(
                &object(json!({ "relatedDataClass": "Employee", "isToMany": false })),
                "manager",
                None,
                "Employee",
            )
            .unwrap();
        assert_eq!(nested.related_data_class.as_deref(), Some("Employee"));
        assert_eq!(nested.is_to_many, Some(false));
    }

    #[test]
    fn test_read_alias_of_relation() {
        let catalog = catalog();
        let resolver = PathResolver::new(&catalog);
        let reader = FieldReader::new(&resolver);

        let alias = reader
            .read_field(
                &object(json!({ "kind": "alias", "path": "reports" })),
                "team",
                Some("1"),
                "Employee",
            )
            .unwrap();
        assert_eq!(alias.name, "team");
        assert_eq!(alias.path.as_deref(), Some("reports"));
        assert_eq!(alias.related_data_class.as_deref(), Some("Employee"));
        assert_eq!(alias.inverse_name.as_deref(), Some("manager"));
        assert_eq!(alias.field_type_string.as_deref(), Some("Entities<Employee>"));
    }

    #[test]
    fn test_read_untyped_alias_takes_destination_type() {
        let catalog = catalog();
        let resolver = PathResolver::new(&catalog);
        let reader = FieldReader::new(&resolver);

        let alias = reader
            .read_field(
                &object(json!({ "kind": "alias", "path": "manager.name" })),
                "managerName",
                Some("1"),
                "Employee",
            )
            .unwrap();
        assert_eq!(alias.field_type_string.as_deref(), Some("string"));

        let alias = reader
            .read_field(
                &object(json!({ "kind": "alias", "path": "reports.manager" })),
                "teamManagers",
                Some("1"),
                "Employee",
            )
            .unwrap();
        assert_eq!(alias.field_type_string.as_deref(), Some("Entities<Employee>"));
    }

    #[test]
    fn test_field_relation_rehomes_sub_fields() {
        let mut field = Field::new("manager").with_kind(FieldKind::RelatedEntity);
        field.related_data_class = Some("Employee".to_string());
        field.related_table_number = Some(1);
        field.inverse_name = Some("reports".to_string());

        let relation = field_relation(&field, "Employee", vec![Field::new("name")]).unwrap();
        assert_eq!(relation.relation_type, RelationType::ManyToOne);
        assert_eq!(relation.inverse_name, "reports");
        assert_eq!(relation.sub_fields[0].related_table_number, Some(1));
        assert_eq!(relation.sub_fields[0].data_model_id.as_deref(), Some("Employee"));

        let plain = Field::new("name").with_kind(FieldKind::Plain);
        assert!(field_relation(&plain, "Employee", Vec::new()).is_none());
    }

    #[test]
    fn test_parse_document() {
        assert_eq!(parse_document(" "), Err(LoweringError::EmptyInput));
        assert!(matches!(
            parse_document("{"),
            Err(LoweringError::MalformedJson(_))
        ));
        assert!(parse_document("{}").is_ok());
    }
}
