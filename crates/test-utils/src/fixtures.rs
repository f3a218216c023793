// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample schema documents
//!
//! The office schema has three tables:
//! - `Employee` (1): `name`, `salary`, a self relation `manager`/`reports`,
//!   `services` to `Service`, `office` to `Office` and several aliases
//! - `Service` (2): `name`, `employee` back to `Employee`, a two-hop alias
//! - `Office` (3): `name`, `address`, `employees` back to `Employee`

use serde_json::{Value, json};

use crate::documents::{
    CatalogDocumentBuilder, CatalogTableDef, ProjectDocumentBuilder, ProjectTableDef,
};

pub const EMPLOYEE: i64 = 1;
pub const SERVICE: i64 = 2;
pub const OFFICE: i64 = 3;

/// Canned schema documents
pub struct SchemaFixtures;

impl SchemaFixtures {
    // ===== Catalogs =====

    /// The office catalog
    pub fn office_catalog() -> Value {
        CatalogDocumentBuilder::new()
            .table(
                CatalogTableDef::new("Employee", EMPLOYEE)
                    .storage("name", 0)
                    .storage("salary", 1)
                    .to_one("manager", "Employee", EMPLOYEE, "reports")
                    .to_many("reports", "Employee", EMPLOYEE, "manager")
                    .to_many("services", "Service", SERVICE, "employee")
                    .to_one("office", "Office", OFFICE, "employees")
                    .alias("managerName", "manager.name", 0)
                    .alias("officeAddress", "office.address", 0)
                    .alias("managerOfficeAddress", "manager.office.address", 0)
                    .relation_alias("boss", "manager", "Employee", EMPLOYEE, false),
            )
            .table(
                CatalogTableDef::new("Service", SERVICE)
                    .storage("name", 0)
                    .to_one("employee", "Employee", EMPLOYEE, "services")
                    .alias("employeeManagerName", "employee.manager.name", 0),
            )
            .table(
                CatalogTableDef::new("Office", OFFICE)
                    .storage("name", 0)
                    .storage("address", 0)
                    .to_many("employees", "Employee", EMPLOYEE, "office"),
            )
            .build()
    }

    /// A catalog whose alias routes back to itself
    pub fn cyclic_catalog() -> Value {
        CatalogDocumentBuilder::new()
            .table(
                CatalogTableDef::new("Node", 1)
                    .storage("name", 0)
                    .relation_alias("loop", "loop", "Node", 1, false),
            )
            .build()
    }

    // ===== Projects =====

    /// `Employee.managerName` declared as an alias of `manager.name`
    pub fn alias_project() -> Value {
        ProjectDocumentBuilder::new()
            .table(
                EMPLOYEE,
                ProjectTableDef::new("Employee")
                    .storage("1", "name", 0)
                    .alias("managerName", "manager.name", 0),
            )
            .build()
    }

    /// `Employee.services` one-to-many, with `Service` declared bare
    pub fn inverse_project() -> Value {
        ProjectDocumentBuilder::new()
            .table(
                EMPLOYEE,
                ProjectTableDef::new("Employee")
                    .storage("1", "name", 0)
                    .to_many("services", "Service", SERVICE, "employee"),
            )
            .table(
                SERVICE,
                ProjectTableDef::new("Service").storage("1", "name", 0),
            )
            .build()
    }

    /// `Office` declared at top level and nested as a slave of `Employee.office`
    pub fn office_project(office_first: bool) -> Value {
        let employee = ProjectTableDef::new("Employee")
            .storage("1", "name", 0)
            .field(
                "office",
                json!({
                    "kind": "relatedEntity",
                    "relatedDataClass": "Office",
                    "relatedTableNumber": OFFICE,
                    "inverseName": "employees",
                    "2": { "name": "address", "kind": "storage", "fieldType": 0 }
                }),
            );
        let office = ProjectTableDef::new("Office").storage("1", "name", 0);

        let builder = ProjectDocumentBuilder::new();
        let builder = if office_first {
            builder.table(OFFICE, office).table(EMPLOYEE, employee)
        } else {
            builder.table(EMPLOYEE, employee).table(OFFICE, office)
        };
        builder.build()
    }

    /// Every table with every field and alias of the office catalog
    pub fn full_office_project() -> Value {
        ProjectDocumentBuilder::new()
            .table(
                EMPLOYEE,
                ProjectTableDef::new("Employee")
                    .label("Employees")
                    .short_label("Staff")
                    .icon("QMobile/Icons/Person.png")
                    .filter("name = \"Smith\"", true)
                    .storage("1", "name", 0)
                    .storage("2", "salary", 1)
                    .to_one("manager", "Employee", EMPLOYEE, "reports")
                    .to_many("reports", "Employee", EMPLOYEE, "manager")
                    .to_many("services", "Service", SERVICE, "employee")
                    .to_one("office", "Office", OFFICE, "employees")
                    .alias("managerName", "manager.name", 0)
                    .alias("managerOfficeAddress", "manager.office.address", 0),
            )
            .table(
                SERVICE,
                ProjectTableDef::new("Service")
                    .storage("1", "name", 0)
                    .to_one("employee", "Employee", EMPLOYEE, "services")
                    .alias("employeeManagerName", "employee.manager.name", 0),
            )
            .table(
                OFFICE,
                ProjectTableDef::new("Office")
                    .storage("1", "name", 0)
                    .storage("2", "address", 0),
            )
            .build()
    }
}
