//! Core types shared by the builder and edit scripts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keyword holding a node's property sub-schemas.
pub const PROPERTIES: &str = "properties";

/// Keyword holding a node's required property names.
pub const REQUIRED: &str = "required";

/// Indirection keyword. Never resolved, only detected.
pub const REF_MARKER: &str = "$ref";

/// Keywords whose change alters the projected type of a node.
pub const SHAPE_KEYWORDS: &[&str] = &[
    "type",
    "properties",
    "required",
    "items",
    "enum",
    "const",
    "anyOf",
    "oneOf",
    "additionalProperties",
    "$ref",
];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Which properties an operation addresses.
///
/// A name list matches keys exactly. A pattern matches any key it finds a
/// match in (the pattern is not anchored).
#[derive(Debug, Clone)]
pub enum Selector {
    Names(Vec<String>),
    Pattern(Regex),
}

impl Selector {
    /// Compile a name pattern.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Selector::Pattern)
    }

    /// Returns true if `key` is addressed by this selector.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Selector::Names(names) => names.iter().any(|n| n == key),
            Selector::Pattern(re) => re.is_match(key),
        }
    }
}

impl From<Vec<String>> for Selector {
    fn from(names: Vec<String>) -> Self {
        Selector::Names(names)
    }
}

impl From<Vec<&str>> for Selector {
    fn from(names: Vec<&str>) -> Self {
        Selector::Names(names.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Selector {
    fn from(names: &[&str]) -> Self {
        Selector::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(names: [&str; N]) -> Self {
        Selector::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Regex> for Selector {
    fn from(re: Regex) -> Self {
        Selector::Pattern(re)
    }
}

/// Options for operations that remove properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Drop removed property names from `required`. Defaults to true.
    pub remove_required: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            remove_required: true,
        }
    }
}

impl FilterOptions {
    /// Set whether removed names are dropped from `required`.
    pub fn remove_required(mut self, remove_required: bool) -> Self {
        self.remove_required = remove_required;
        self
    }
}

/// Options for `add_props`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddOptions {
    /// Append the added key to `required`.
    pub required: bool,
}

impl AddOptions {
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// How `no_ref` decides that a property sub-schema holds a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefDetection {
    /// Search the serialized sub-schema for the `$ref` marker. Text that
    /// merely contains the marker (a description, an enum value) also counts.
    #[default]
    Substring,
    /// Only an actual `$ref` key, at any depth, counts.
    Structural,
}

/// Options for `no_ref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoRefOptions {
    /// Drop removed property names from `required`. Defaults to true.
    pub remove_required: bool,
    pub detection: RefDetection,
}

impl Default for NoRefOptions {
    fn default() -> Self {
        Self {
            remove_required: true,
            detection: RefDetection::Substring,
        }
    }
}

impl NoRefOptions {
    pub fn remove_required(mut self, remove_required: bool) -> Self {
        self.remove_required = remove_required;
        self
    }

    pub fn detection(mut self, detection: RefDetection) -> Self {
        self.detection = detection;
        self
    }
}
