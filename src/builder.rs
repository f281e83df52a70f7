//! Schema builder - chainable structural edits over one schema tree.
//!
//! Every operation takes the builder by value, edits the owned tree in place
//! and hands the builder back, so intermediate trees are never shared. Use
//! `clone()` to branch an edit history.
//!
//! Shape mismatches never fail: on a boolean schema, a node without
//! `properties`, or an unknown property name, an operation applies whatever
//! part of the edit still makes sense and otherwise returns the builder as is.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use tracing::{debug, trace};

use crate::error::CheckError;
use crate::shape::TypeShape;
use crate::types::{
    AddOptions, FilterOptions, NoRefOptions, RefDetection, Selector, PROPERTIES, REF_MARKER,
    REQUIRED, SHAPE_KEYWORDS,
};
use crate::validator::check_schema;

/// A schema tree plus its projected type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaBuilder {
    schema: Value,
    shape: TypeShape,
    /// Field types recorded by `set_props_type`, kept across re-projection.
    overrides: BTreeMap<String, TypeShape>,
    /// Set by `with_type`: the shape no longer follows the tree.
    relabelled: bool,
}

/// Wrap a copy of `schema`. The caller's value is never touched by later edits.
pub fn build(schema: &Value) -> SchemaBuilder {
    SchemaBuilder::new(schema.clone())
}

impl SchemaBuilder {
    /// Take ownership of `schema` and derive its type.
    pub fn new(schema: Value) -> Self {
        let shape = TypeShape::from_schema(&schema);
        Self {
            schema,
            shape,
            overrides: BTreeMap::new(),
            relabelled: false,
        }
    }

    /// Current schema tree.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn into_schema(self) -> Value {
        self.schema
    }

    /// Current projected type.
    pub fn type_shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Check that the current tree compiles as a JSON Schema.
    pub fn check(&self) -> Result<(), CheckError> {
        check_schema(&self.schema)
    }

    // === Property membership ===

    /// Keep only the selected properties.
    pub fn pick(self, selector: impl Into<Selector>, options: FilterOptions) -> Self {
        let selector = selector.into();
        self.remove_properties("pick", options.remove_required, |key, _| {
            !selector.matches(key)
        })
    }

    /// Remove the selected properties.
    pub fn omit(self, selector: impl Into<Selector>, options: FilterOptions) -> Self {
        let selector = selector.into();
        self.remove_properties("omit", options.remove_required, |key, _| {
            selector.matches(key)
        })
    }

    /// Remove every property whose sub-schema holds a `$ref`.
    ///
    /// The default detection searches the serialized sub-schema, so a
    /// description mentioning `$ref` also gets the property removed.
    pub fn no_ref(self, options: NoRefOptions) -> Self {
        self.remove_properties("no_ref", options.remove_required, |_, sub| {
            contains_ref(sub, options.detection)
        })
    }

    fn remove_properties(
        mut self,
        op: &'static str,
        remove_required: bool,
        mut doomed: impl FnMut(&str, &Value) -> bool,
    ) -> Self {
        let Some(props) = self.properties_mut() else {
            trace!(op, "no properties to filter");
            return self;
        };

        let mut removed = Vec::new();
        props.retain(|key, sub| {
            if doomed(key, sub) {
                removed.push(key.clone());
                false
            } else {
                true
            }
        });

        if remove_required {
            self.retain_required(|name| !removed.iter().any(|r| r == name));
        }
        self.overrides.retain(|key, _| !removed.contains(key));
        self.sync_shape(|shape, _| shape.remove_fields(&removed, !remove_required));

        debug!(op, removed = ?removed, "removed properties");
        self
    }

    // === Keywords and property sub-schemas ===

    /// Replace a top-level keyword.
    pub fn set(self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.set_with(key, |_| value)
    }

    /// Replace a top-level keyword with the result of `update`, which receives
    /// the current value (`None` when absent).
    ///
    /// Writing a keyword the type projection reads drops any `with_type`
    /// label; replacing `properties` also drops `set_props_type` overrides.
    pub fn set_with(mut self, key: &str, update: impl FnOnce(Option<Value>) -> Value) -> Self {
        let Some(map) = self.schema.as_object_mut() else {
            trace!(key, "boolean schema; keyword not set");
            return self;
        };

        let current = map.get(key).cloned();
        map.insert(key.to_string(), update(current));

        if key == PROPERTIES {
            self.overrides.clear();
        }
        if SHAPE_KEYWORDS.contains(&key) {
            self.relabelled = false;
            self.sync_shape(|_, _| {});
        }
        debug!(key, "set keyword");
        self
    }

    /// Write the sub-schema at `properties[key]`.
    pub fn set_props(self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.set_props_with(key, |_| value)
    }

    /// Write the result of `update` at `properties[key]`. `update` receives
    /// the current sub-schema (`None` for a new key).
    pub fn set_props_with(
        mut self,
        key: &str,
        update: impl FnOnce(Option<Value>) -> Value,
    ) -> Self {
        self.write_property(key, update, None);
        self
    }

    /// Write `value` at `properties[key]` but record `shape` as the field's
    /// type instead of projecting it from `value`. The recorded type holds
    /// until the property is written again or removed.
    pub fn set_props_type(mut self, key: &str, value: impl Into<Value>, shape: TypeShape) -> Self {
        let value = value.into();
        self.write_property(key, |_| value, Some(shape));
        self
    }

    /// Add (or replace) a property, optionally marking it required.
    pub fn add_props(self, key: &str, value: impl Into<Value>, options: AddOptions) -> Self {
        let value = value.into();
        self.add_props_with(key, |_| value, options)
    }

    pub fn add_props_with(
        mut self,
        key: &str,
        update: impl FnOnce(Option<Value>) -> Value,
        options: AddOptions,
    ) -> Self {
        if self.write_property(key, update, None) && options.required {
            return self.required([key]);
        }
        self
    }

    /// Returns false when there is no `properties` map to write into.
    fn write_property(
        &mut self,
        key: &str,
        update: impl FnOnce(Option<Value>) -> Value,
        shape: Option<TypeShape>,
    ) -> bool {
        let Some(props) = self.properties_mut() else {
            trace!(key, "no properties map; property not written");
            return false;
        };

        let sub = update(props.get(key).cloned());
        let projected = TypeShape::from_schema(&sub);
        props.insert(key.to_string(), sub);

        let field = match shape {
            Some(shape) => {
                self.overrides.insert(key.to_string(), shape.clone());
                shape
            }
            None => {
                self.overrides.remove(key);
                projected
            }
        };
        self.sync_shape(|shape, _| shape.set_field(key, &field));

        debug!(key, "wrote property");
        true
    }

    // === Required set ===

    /// Drop names from `required`. Never creates the keyword.
    pub fn optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let declared = self.property_keys().unwrap_or_default();

        let Some(list) = self.schema.get_mut(REQUIRED).and_then(Value::as_array_mut) else {
            trace!("no required list");
            return self;
        };
        list.retain(|v| v.as_str().map_or(true, |s| !names.iter().any(|n| n == s)));

        self.sync_shape(|shape, _| shape.mark_optional(&names, &declared));
        debug!(names = ?names, "made optional");
        self
    }

    /// Merge names into `required`, collapsing duplicates. Names are not
    /// checked against `properties`.
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let Some(map) = self.schema.as_object_mut() else {
            trace!("boolean schema; required unchanged");
            return self;
        };

        let entry = map
            .entry(REQUIRED)
            .or_insert_with(|| Value::Array(Vec::new()));
        let Some(list) = entry.as_array_mut() else {
            trace!("required is not an array");
            return self;
        };

        let mut merged: Vec<Value> = Vec::with_capacity(list.len() + names.len());
        for name in list
            .drain(..)
            .chain(names.iter().cloned().map(Value::String))
        {
            if !merged.contains(&name) {
                merged.push(name);
            }
        }
        *list = merged;

        self.sync_shape(|shape, _| shape.mark_required(&names));
        debug!(names = ?names, "made required");
        self
    }

    /// Require exactly the keys currently in `properties`.
    pub fn all_required(mut self) -> Self {
        let Some(keys) = self.property_keys() else {
            trace!("no properties; required unchanged");
            return self;
        };
        let Some(map) = self.schema.as_object_mut() else {
            return self;
        };

        map.insert(
            REQUIRED.to_string(),
            Value::Array(keys.iter().cloned().map(Value::String).collect()),
        );
        self.sync_shape(|shape, _| shape.require_exactly(&keys));
        debug!(keys = ?keys, "required all properties");
        self
    }

    /// Remove `required` from this node. With `deep`, every `required` array
    /// anywhere in the tree goes too, whether or not the object holding it is
    /// a schema.
    pub fn all_optional(mut self, deep: bool) -> Self {
        let Some(map) = self.schema.as_object_mut() else {
            trace!("boolean schema; nothing to make optional");
            return self;
        };

        map.retain(|key, _| key != REQUIRED);
        if deep {
            strip_required_arrays(&mut self.schema);
        }

        self.sync_shape(|shape, node| shape.make_optional(node, deep));
        debug!(deep, "made all optional");
        self
    }

    // === Structure ===

    /// A new builder over `{ "type": "array", "items": <this schema> }`.
    /// The receiver is left as it was.
    ///
    /// The item type carries over as it stands, recorded overrides and
    /// labels included.
    pub fn to_array(&self) -> SchemaBuilder {
        SchemaBuilder {
            schema: json!({
                "type": "array",
                "items": self.schema.clone(),
            }),
            shape: TypeShape::Array(Box::new(self.shape.clone())),
            overrides: BTreeMap::new(),
            relabelled: self.relabelled || !self.overrides.is_empty(),
        }
    }

    /// Relabel the projected type. The tree is untouched.
    ///
    /// Later edits are mirrored onto the label instead of re-projecting it,
    /// until a keyword the projection reads is replaced with `set`.
    pub fn with_type(mut self, shape: TypeShape) -> Self {
        self.shape = shape;
        self.relabelled = true;
        self
    }

    // --- Internal helpers ---

    /// Bring the shape up to date after a tree edit. A tracked shape is
    /// re-projected from the tree; a relabelled one gets `mirror` applied,
    /// which also sees the edited tree.
    fn sync_shape(&mut self, mirror: impl FnOnce(&mut TypeShape, &Value)) {
        if self.relabelled {
            mirror(&mut self.shape, &self.schema);
        } else {
            self.shape = TypeShape::project(&self.schema, &self.overrides);
        }
    }

    fn properties_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.schema.get_mut(PROPERTIES)?.as_object_mut()
    }

    fn property_keys(&self) -> Option<Vec<String>> {
        self.schema
            .get(PROPERTIES)?
            .as_object()
            .map(|props| props.keys().cloned().collect())
    }

    fn retain_required(&mut self, mut keep: impl FnMut(&str) -> bool) {
        if let Some(list) = self.schema.get_mut(REQUIRED).and_then(Value::as_array_mut) {
            list.retain(|v| v.as_str().map_or(true, &mut keep));
        }
    }
}

impl From<Value> for SchemaBuilder {
    fn from(schema: Value) -> Self {
        SchemaBuilder::new(schema)
    }
}

/// Returns true if `sub` holds a reference under the given detection mode.
pub fn contains_ref(sub: &Value, detection: RefDetection) -> bool {
    match detection {
        RefDetection::Substring => serde_json::to_string(sub)
            .map(|text| text.contains(REF_MARKER))
            .unwrap_or(false),
        RefDetection::Structural => has_ref_key(sub),
    }
}

fn has_ref_key(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key(REF_MARKER) || map.values().any(has_ref_key),
        Value::Array(arr) => arr.iter().any(has_ref_key),
        _ => false,
    }
}

fn strip_required_arrays(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, child| !(key == REQUIRED && child.is_array()));
            for child in map.values_mut() {
                strip_required_arrays(child);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                strip_required_arrays(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::FieldShape;

    fn person() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "integer" },
                "email": { "type": "string" },
                "address": {
                    "type": "object",
                    "properties": {
                        "street": { "type": "string" },
                        "city": { "type": "string" }
                    },
                    "required": ["street", "city"]
                }
            },
            "required": ["name", "age", "email", "address"]
        })
    }

    fn keys(value: &Value) -> Vec<&str> {
        value["properties"]
            .as_object()
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    // === pick / omit ===

    #[test]
    fn pick_single_property() {
        let schema = build(&person()).pick(["name"], FilterOptions::default()).into_schema();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": { "name": { "type": "string" } },
                "required": ["name"]
            })
        );
    }

    #[test]
    fn pick_nothing_leaves_empty_maps() {
        let schema = build(&person())
            .pick(Vec::<String>::new(), FilterOptions::default())
            .into_schema();
        assert_eq!(
            schema,
            json!({ "type": "object", "properties": {}, "required": [] })
        );
    }

    #[test]
    fn pick_by_pattern() {
        let schema = build(&person())
            .pick(Selector::pattern("^(name|e)").unwrap(), FilterOptions::default())
            .into_schema();
        assert_eq!(keys(&schema), vec!["name", "email"]);
        assert_eq!(schema["required"], json!(["name", "email"]));
    }

    #[test]
    fn pick_keeps_required_when_asked() {
        let schema = build(&person())
            .pick(["name"], FilterOptions::default().remove_required(false))
            .into_schema();
        assert_eq!(keys(&schema), vec!["name"]);
        assert_eq!(schema["required"], json!(["name", "age", "email", "address"]));
    }

    #[test]
    fn pick_unknown_name_is_ignored() {
        let schema = build(&person())
            .pick(["name", "nickname"], FilterOptions::default())
            .into_schema();
        assert_eq!(keys(&schema), vec!["name"]);
    }

    #[test]
    fn omit_removes_and_filters_required() {
        let schema = build(&person())
            .omit(["age", "address"], FilterOptions::default())
            .into_schema();
        assert_eq!(keys(&schema), vec!["name", "email"]);
        assert_eq!(schema["required"], json!(["name", "email"]));
    }

    #[test]
    fn omit_preserves_property_order() {
        let schema = build(&person())
            .omit(["age"], FilterOptions::default())
            .into_schema();
        assert_eq!(keys(&schema), vec!["name", "email", "address"]);
    }

    #[test]
    fn pick_without_properties_is_noop() {
        let original = json!({ "type": "string", "required": ["x"] });
        let schema = build(&original)
            .pick(["x"], FilterOptions::default())
            .into_schema();
        assert_eq!(schema, original);
    }

    // === set ===

    #[test]
    fn set_replaces_keyword() {
        let schema = build(&person())
            .set("description", "A person")
            .set("type", "object")
            .into_schema();
        assert_eq!(schema["description"], "A person");
        assert_eq!(schema["required"], person()["required"]);
    }

    #[test]
    fn set_with_receives_current_value() {
        let mut seen = None;
        let schema = build(&json!({ "type": "object", "title": "Old" }))
            .set_with("title", |current| {
                seen = current.clone();
                json!("New")
            })
            .set_with("description", |current| {
                assert!(current.is_none());
                json!("added")
            })
            .into_schema();
        assert_eq!(seen, Some(json!("Old")));
        assert_eq!(schema["title"], "New");
        assert_eq!(schema["description"], "added");
    }

    #[test]
    fn set_type_keyword_reprojects() {
        let builder = build(&json!({ "type": "string" })).set("type", "integer");
        assert_eq!(builder.type_shape(), &TypeShape::Integer);
    }

    // === setProps / addProps / setPropsType ===

    #[test]
    fn set_props_adds_and_overwrites() {
        let schema = build(&person())
            .set_props("gender", json!({ "type": "string" }))
            .set_props("name", json!({ "type": "number" }))
            .into_schema();
        assert_eq!(schema["properties"]["gender"], json!({ "type": "string" }));
        assert_eq!(schema["properties"]["name"], json!({ "type": "number" }));
        assert_eq!(schema["required"], person()["required"]);
    }

    #[test]
    fn set_props_with_refines_existing() {
        let schema = build(&person())
            .set_props_with("age", |current| {
                let mut sub = current.unwrap_or_else(|| json!({}));
                sub["minimum"] = json!(0);
                sub["maximum"] = json!(120);
                sub
            })
            .into_schema();
        assert_eq!(
            schema["properties"]["age"],
            json!({ "type": "integer", "minimum": 0, "maximum": 120 })
        );
    }

    #[test]
    fn set_props_without_properties_is_noop() {
        let original = json!({ "type": "object" });
        let schema = build(&original)
            .set_props("name", json!({ "type": "string" }))
            .into_schema();
        assert_eq!(schema, original);
    }

    #[test]
    fn add_props_required_appends_once() {
        let schema = build(&person())
            .add_props("gender", json!({ "type": "string" }), AddOptions::default().required(true))
            .add_props("name", json!({ "type": "string" }), AddOptions::default().required(true))
            .into_schema();
        assert_eq!(
            schema["required"],
            json!(["name", "age", "email", "address", "gender"])
        );
    }

    #[test]
    fn add_props_without_properties_skips_required() {
        let original = json!({ "type": "object" });
        let schema = build(&original)
            .add_props("x", json!({}), AddOptions::default().required(true))
            .into_schema();
        assert_eq!(schema, original);
    }

    #[test]
    fn set_props_type_records_given_shape() {
        let builder = build(&person()).set_props_type(
            "email",
            json!({ "type": "string", "format": "email" }),
            TypeShape::literals(["a@example.com", "b@example.com"]),
        );
        assert_eq!(builder.schema()["properties"]["email"]["format"], "email");
        assert_eq!(
            builder.type_shape().field("email"),
            Some(&FieldShape::new(
                TypeShape::literals(["a@example.com", "b@example.com"]),
                true
            ))
        );
    }

    // === required / optional ===

    #[test]
    fn required_merges_without_duplicates() {
        let schema = build(&json!({ "type": "object", "properties": {}, "required": ["name"] }))
            .required(["name", "email"])
            .required(["name"])
            .into_schema();
        assert_eq!(schema["required"], json!(["name", "email"]));
    }

    #[test]
    fn required_creates_list() {
        let schema = build(&json!({ "type": "object" }))
            .required(["id"])
            .into_schema();
        assert_eq!(schema["required"], json!(["id"]));
    }

    #[test]
    fn optional_removes_names() {
        let builder = build(&person()).optional(["age", "unknown"]);
        assert_eq!(builder.schema()["required"], json!(["name", "email", "address"]));
        assert!(!builder.type_shape().field("age").unwrap().required);
    }

    #[test]
    fn optional_never_creates_required() {
        let original = json!({ "type": "object", "properties": { "a": {} } });
        let schema = build(&original).optional(["a"]).into_schema();
        assert_eq!(schema, original);
    }

    #[test]
    fn all_required_uses_property_keys() {
        let schema = build(&json!({
            "type": "object",
            "properties": { "a": {}, "b": {} },
            "required": ["ghost"]
        }))
        .all_required()
        .into_schema();
        assert_eq!(schema["required"], json!(["a", "b"]));
    }

    #[test]
    fn all_optional_shallow_keeps_nested() {
        let schema = build(&person()).all_optional(false).into_schema();
        assert!(schema.get("required").is_none());
        assert_eq!(
            schema["properties"]["address"]["required"],
            json!(["street", "city"])
        );
    }

    #[test]
    fn all_optional_deep_sweeps_everything() {
        let schema = build(&json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "properties": { "city": { "type": "string" } },
                    "required": ["city"]
                },
                "required": { "type": "boolean" }
            },
            "examples": [{ "required": ["payload"] }],
            "required": ["address"]
        }))
        .all_optional(true)
        .into_schema();

        assert!(schema.get("required").is_none());
        assert!(schema["properties"]["address"].get("required").is_none());
        // Payload values lose their required arrays too.
        assert_eq!(schema["examples"], json!([{}]));
        // A property that happens to be named "required" is a schema, not an array.
        assert_eq!(schema["properties"]["required"], json!({ "type": "boolean" }));
    }

    // === noRef ===

    #[test]
    fn no_ref_removes_reference_properties() {
        let schema = build(&json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "addr": { "$ref": "#/defs/Addr" },
                "items": { "type": "array", "items": { "$ref": "#/defs/Item" } }
            },
            "required": ["name", "addr"]
        }))
        .no_ref(NoRefOptions::default())
        .into_schema();
        assert_eq!(keys(&schema), vec!["name"]);
        assert_eq!(schema["required"], json!(["name"]));
    }

    #[test]
    fn no_ref_substring_matches_text() {
        let original = json!({
            "type": "object",
            "properties": {
                "note": { "type": "string", "description": "may hold a $ref" }
            }
        });
        let substring = build(&original).no_ref(NoRefOptions::default()).into_schema();
        assert_eq!(substring["properties"], json!({}));

        let structural = build(&original)
            .no_ref(NoRefOptions::default().detection(RefDetection::Structural))
            .into_schema();
        assert_eq!(structural, original);
    }

    // === toArray / clone / withType ===

    #[test]
    fn to_array_wraps_and_leaves_receiver() {
        let builder = build(&person());
        let array = builder.to_array();
        assert_eq!(array.schema(), &json!({ "type": "array", "items": person() }));
        assert_eq!(builder.schema(), &person());
        assert!(matches!(array.type_shape(), TypeShape::Array(_)));
    }

    #[test]
    fn clone_is_independent() {
        let original = build(&person());
        let branch = original.clone().omit(["name"], FilterOptions::default());
        assert_eq!(original.schema(), &person());
        assert_ne!(branch.schema(), original.schema());
    }

    #[test]
    fn with_type_keeps_tree() {
        let builder = build(&person()).with_type(TypeShape::String);
        assert_eq!(builder.schema(), &person());
        assert_eq!(builder.type_shape(), &TypeShape::String);
    }

    #[test]
    fn set_props_type_survives_required_edits() {
        let builder = build(&person())
            .set_props_type("email", json!({ "type": "string" }), TypeShape::literals(["x"]))
            .optional(["email"])
            .required(["email", "nick"]);
        assert_eq!(
            builder.type_shape().field("email"),
            Some(&FieldShape::new(TypeShape::literals(["x"]), true))
        );

        let rewritten = builder.clone().set_props("email", json!({ "type": "string" }));
        assert_eq!(rewritten.type_shape().field("email").unwrap().shape, TypeShape::String);

        let omitted = builder.omit(["email"], FilterOptions::default()).required(["email"]);
        assert_eq!(
            omitted.type_shape().field("email"),
            Some(&FieldShape::new(TypeShape::Any, true))
        );
    }

    #[test]
    fn with_type_label_follows_edits() {
        let label = TypeShape::union([
            TypeShape::from_schema(&json!({
                "properties": { "name": { "type": "string" }, "age": {} },
                "required": ["name", "age", "ghost"]
            })),
            TypeShape::Null,
        ]);
        let builder = build(&json!({
            "type": "object",
            "properties": { "name": { "type": "string" }, "age": {} },
            "required": ["name", "age", "ghost"]
        }))
        .with_type(label)
        .omit(["age"], FilterOptions::default());
        assert_eq!(
            builder.type_shape().to_string(),
            "{ ghost: unknown; name: string } | null"
        );

        let builder = builder.all_optional(false);
        assert_eq!(builder.type_shape().to_string(), "{ name?: string } | null");
    }

    #[test]
    fn set_shape_keyword_drops_label() {
        let builder = build(&person())
            .with_type(TypeShape::String)
            .set("description", "still labelled");
        assert_eq!(builder.type_shape(), &TypeShape::String);

        let builder = builder.set("type", "object");
        assert_eq!(builder.type_shape(), &TypeShape::from_schema(builder.schema()));
    }

    #[test]
    fn build_copies_input() {
        let mut original = person();
        let builder = build(&original);
        original["type"] = json!("string");
        assert_eq!(builder.schema()["type"], "object");
    }

    // === boolean schemas ===

    #[test]
    fn boolean_schemas_are_opaque() {
        for value in [json!(true), json!(false)] {
            let schema = build(&value)
                .pick(["a"], FilterOptions::default())
                .omit(["a"], FilterOptions::default())
                .set("type", "object")
                .set_props("a", json!({}))
                .add_props("b", json!({}), AddOptions::default().required(true))
                .required(["a"])
                .optional(["a"])
                .all_required()
                .all_optional(true)
                .no_ref(NoRefOptions::default())
                .into_schema();
            assert_eq!(schema, value);
        }
    }

    #[test]
    fn contains_ref_modes() {
        let sub = json!({ "allOf": [{ "$ref": "#/a" }] });
        assert!(contains_ref(&sub, RefDetection::Substring));
        assert!(contains_ref(&sub, RefDetection::Structural));

        let text = json!({ "enum": ["$ref"] });
        assert!(contains_ref(&text, RefDetection::Substring));
        assert!(!contains_ref(&text, RefDetection::Structural));
    }
}
