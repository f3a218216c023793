// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Total lookups on JSON objects
//!
//! Schema documents are loosely typed: a missing key, a `null` and a value of
//! the wrong type are all treated as absent.

use serde_json::{Map, Value};

/// JSON object alias used across the loaders
pub type JsonObject = Map<String, Value>;

/// Typed, non-failing accessors for JSON objects
pub trait JsonObjectExt {
    fn get_str(&self, key: &str) -> Option<&str>;
    fn get_string(&self, key: &str) -> Option<String>;
    /// Integers may also be written as numeric strings or whole floats
    fn get_i64(&self, key: &str) -> Option<i64>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_object(&self, key: &str) -> Option<&JsonObject>;
    fn get_array(&self, key: &str) -> Option<&Vec<Value>>;
}

impl JsonObjectExt for JsonObject {
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get_str(key).map(str::to_string)
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn get_object(&self, key: &str) -> Option<&JsonObject> {
        self.get(key).and_then(Value::as_object)
    }

    fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }
}
