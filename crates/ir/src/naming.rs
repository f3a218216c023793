// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Identifier normalization
//!
//! Free-form table, field and relation names coming from the schema documents
//! are turned into valid identifiers for generated code. Synthesized relation
//! names and foreign-key names are derived here, so every component that
//! compares names must go through the same functions.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Words that cannot be used verbatim as generated identifiers
pub const RESERVED_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in", "is",
    "null", "object", "package", "return", "super", "this", "throw", "true", "try", "typealias",
    "typeof", "val", "var", "when", "while", "by", "catch", "constructor", "delegate", "dynamic",
    "field", "file", "finally", "get", "import", "init", "param", "property", "receiver", "set",
    "setparam", "where", "actual", "abstract", "annotation", "companion", "const", "crossinline",
    "data", "enum", "expect", "external", "final", "infix", "inline", "inner", "internal",
    "lateinit", "noinline", "open", "operator", "out", "override", "private", "protected",
    "public", "reified", "sealed", "suspend", "tailrec", "vararg", "it",
];

/// Prefix protecting reserved words
pub const RESERVED_PREFIX: &str = "qmobile_";

/// System properties that keep their exact spelling
const CUSTOM_PROPERTIES: &[&str] = &["__KEY", "__STAMP", "__GlobalStamp", "__TIMESTAMP"];

fn is_reserved(word: &str) -> bool {
    RESERVED_KEYWORDS.contains(&word)
}

/// Normalize a name into a table (type) identifier
pub fn table_name_adjustment(name: &str) -> String {
    let adjusted = replace_special_chars(&capitalize(&condense(name)));
    capitalize(&validate_word(&first_char_for_table(&adjusted)))
}

/// Normalize a name into a field identifier
pub fn field_adjustment(name: &str) -> String {
    let adjusted = lower_custom_properties(&replace_special_chars(&condense(name)));
    validate_word_decapitalized(&adjusted)
}

/// Normalize a dotted relation path into a single relation name.
///
/// `service.manager` becomes `serviceManager`.
pub fn relation_name_adjustment(path: &str) -> String {
    let joined: String = path.split('.').map(table_name_adjustment).collect();
    decapitalize(&table_name_adjustment(&joined))
}

/// Normalize each segment of a dotted relation path
pub fn relation_path_adjustment(path: &str) -> String {
    path.split('.')
        .map(relation_name_adjustment)
        .collect::<Vec<_>>()
        .join(".")
}

/// Protect reserved words in every segment
pub fn validate_word(name: &str) -> String {
    name.split('.')
        .map(|segment| {
            if is_reserved(segment) {
                format!("{RESERVED_PREFIX}{segment}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Lower the first two characters (except for `ID`) and protect reserved words
pub fn validate_word_decapitalized(name: &str) -> String {
    let lowered = if name == "ID" {
        name.to_string()
    } else {
        decapitalize_two(name)
    };
    lowered
        .split('.')
        .map(|segment| match segment {
            s if is_reserved(s) => format!("{RESERVED_PREFIX}{s}"),
            "ID" => "__ID".to_string(),
            s => s.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Name of the foreign-key field implied by a many-to-one relation
pub fn key_field_name(relation_name: &str) -> String {
    format!("__{}Key", validate_word_decapitalized(relation_name))
}

/// Whether `name` is a synthesized foreign-key field
pub fn is_private_relation_field(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("Key")
}

/// Nested type name for a relation chain starting at `first_target`
pub fn embedded_return_type_name(first_target: &str, tail_path: &str) -> String {
    format!(
        "{}Relation{}",
        table_name_adjustment(first_target),
        table_name_adjustment(&relation_name_adjustment(tail_path))
    )
}

/// Turn an icon file path into a resource-style name
pub fn correct_icon_path(icon_path: &str) -> String {
    let without_ext = icon_path
        .rfind('.')
        .map_or(icon_path, |index| &icon_path[..index]);
    let file_name = without_ext.rsplit('/').next().unwrap_or(without_ext);

    let mut corrected = String::with_capacity(file_name.len());
    let mut in_separator = false;
    for c in file_name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            corrected.push(c);
            in_separator = false;
        } else if !in_separator {
            corrected.push('_');
            in_separator = true;
        }
    }
    corrected
}

/// Last segment of a dotted path
pub fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Everything before the last dot, or the whole path when there is none
pub fn parent_path(path: &str) -> &str {
    path.rfind('.').map_or(path, |index| &path[..index])
}

/// Upper-case the first character
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize_two(name: &str) -> String {
    let head: String = name.chars().take(2).collect();
    let tail: String = name.chars().skip(2).collect();
    head.to_lowercase() + &tail
}

fn condense(name: &str) -> String {
    if name.starts_with("Map<") {
        name.to_string()
    } else {
        name.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

fn first_char_for_table(name: &str) -> String {
    if name.starts_with('_') {
        format!("Q{name}")
    } else {
        name.to_string()
    }
}

fn lower_custom_properties(name: &str) -> String {
    if CUSTOM_PROPERTIES.contains(&name) || name == "ID" {
        return name.to_string();
    }
    match name.strip_suffix("Key") {
        Some(stem) if name.starts_with("__") => decapitalize_two(stem) + "Key",
        _ => decapitalize_two(name),
    }
}

fn replace_special_chars(name: &str) -> String {
    let extra: &[char] = if name.contains("Entities<") {
        &['<', '>']
    } else if name.contains("Map<") {
        &['<', '>', ',', ' ']
    } else {
        &[]
    };
    unaccent(name)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || extra.contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Strip diacritics by dropping the combining marks of the canonical
/// decomposition
fn unaccent(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_adjustment() {
        assert_eq!(table_name_adjustment("employee"), "Employee");
        assert_eq!(table_name_adjustment("My Table"), "MyTable");
        assert_eq!(table_name_adjustment("_private"), "Q_private");
        assert_eq!(table_name_adjustment("Société"), "Societe");
        assert_eq!(table_name_adjustment("a-b"), "A_b");
    }

    #[test]
    fn test_reserved_words() {
        assert_eq!(validate_word("class"), "qmobile_class");
        assert_eq!(validate_word("a.in.b"), "a.qmobile_in.b");
        assert_eq!(validate_word_decapitalized("Class"), "qmobile_class");
        assert_eq!(validate_word_decapitalized("ID"), "__ID");
    }

    #[test]
    fn test_relation_name_adjustment() {
        assert_eq!(relation_name_adjustment("service.manager"), "serviceManager");
        assert_eq!(relation_name_adjustment("manager"), "manager");
        assert_eq!(
            relation_path_adjustment("service.manager"),
            "service.manager"
        );
    }

    #[test]
    fn test_field_adjustment() {
        assert_eq!(field_adjustment("First Name"), "firstName");
        assert_eq!(field_adjustment("__KEY"), "__KEY");
        assert_eq!(field_adjustment("__managerKey"), "__managerKey");
        assert_eq!(field_adjustment("ID"), "__ID");
        assert_eq!(field_adjustment("URL"), "urL");
    }

    #[test]
    fn test_key_field_name() {
        assert_eq!(key_field_name("manager"), "__managerKey");
        assert_eq!(key_field_name("Employee"), "__employeeKey");
        assert!(is_private_relation_field("__employeeKey"));
        assert!(!is_private_relation_field("__KEY"));
        assert!(!is_private_relation_field("employeeKey"));
    }

    #[test]
    fn test_embedded_return_type_name() {
        assert_eq!(
            embedded_return_type_name("Service", "manager.name"),
            "ServiceRelationManagerName"
        );
    }

    #[test]
    fn test_wrapped_types_keep_brackets() {
        assert_eq!(replace_special_chars("Entities<Service>"), "Entities<Service>");
        assert_eq!(replace_special_chars("Map<String, Int>"), "Map<String, Int>");
        assert_eq!(replace_special_chars("a<b>"), "a_b_");
    }

    #[test]
    fn test_accents_outside_latin_1_are_folded() {
        assert_eq!(table_name_adjustment("Tiếng"), "Tieng");
        assert_eq!(field_adjustment("pǎge"), "page");
        assert_eq!(replace_special_chars("Dvořák"), "Dvorak");
    }

    #[test]
    fn test_correct_icon_path() {
        assert_eq!(correct_icon_path("QMobile/Tables/My Icon.png"), "my_icon");
        assert_eq!(correct_icon_path("/user.svg"), "user");
        assert_eq!(correct_icon_path("plain"), "plain");
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(last_segment("manager.name"), "name");
        assert_eq!(last_segment("name"), "name");
        assert_eq!(parent_path("service.manager.name"), "service.manager");
        assert_eq!(parent_path("name"), "name");
    }
}
