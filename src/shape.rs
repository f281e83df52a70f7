//! Type projection of a schema.
//!
//! A [`TypeShape`] describes the value shape a schema accepts. The builder
//! re-projects it from the tree after every edit, so the shape a caller
//! reasons about stays in step with what the schema would validate. A shape
//! relabelled with `with_type` no longer follows the tree; edits are then
//! mirrored onto it field by field. References are never followed: a node
//! holding `$ref` projects to [`TypeShape::Any`].

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::types::{PROPERTIES, REF_MARKER, REQUIRED};

/// Projected value shape of a schema node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeShape {
    /// Accepts anything (`true`, `{}`, or an unresolved reference).
    #[default]
    Any,
    /// Accepts nothing (`false`).
    Never,
    Null,
    Boolean,
    Integer,
    Number,
    String,
    /// A single permitted value (`const`, or one `enum` member).
    Literal(Value),
    Union(Vec<TypeShape>),
    Array(Box<TypeShape>),
    Object(ObjectShape),
}

/// Fields of an object shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectShape {
    pub fields: BTreeMap<String, FieldShape>,
    /// Keys beyond `fields` are accepted (`additionalProperties` is not `false`).
    pub open: bool,
}

/// One named field of an object shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    pub shape: TypeShape,
    pub required: bool,
}

impl FieldShape {
    pub fn new(shape: TypeShape, required: bool) -> Self {
        Self { shape, required }
    }
}

impl TypeShape {
    /// Project a schema node.
    pub fn from_schema(schema: &Value) -> TypeShape {
        TypeShape::project(schema, &BTreeMap::new())
    }

    /// Project a schema node, taking the shapes of the node's own properties
    /// from `overrides` where given. Nested nodes are projected plainly.
    pub(crate) fn project(schema: &Value, overrides: &BTreeMap<String, TypeShape>) -> TypeShape {
        match schema {
            Value::Bool(true) => TypeShape::Any,
            Value::Bool(false) => TypeShape::Never,
            Value::Object(map) => from_object(map, overrides),
            _ => TypeShape::Any,
        }
    }

    /// Build a union, flattening nested unions and collapsing duplicates.
    ///
    /// An empty union is [`TypeShape::Never`]; a single variant is returned as is.
    pub fn union(variants: impl IntoIterator<Item = TypeShape>) -> TypeShape {
        let mut flat: Vec<TypeShape> = Vec::new();
        for variant in variants {
            let parts = match variant {
                TypeShape::Union(inner) => inner,
                other => vec![other],
            };
            for part in parts {
                if !flat.contains(&part) {
                    flat.push(part);
                }
            }
        }
        match flat.len() {
            0 => TypeShape::Never,
            1 => flat.remove(0),
            _ => TypeShape::Union(flat),
        }
    }

    /// Union of string literals, the usual way to tighten a string field.
    pub fn literals<I, S>(values: I) -> TypeShape
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeShape::union(
            values
                .into_iter()
                .map(|v| TypeShape::Literal(Value::String(v.into()))),
        )
    }

    pub fn as_object(&self) -> Option<&ObjectShape> {
        match self {
            TypeShape::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Look up a field of an object shape.
    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.as_object().and_then(|obj| obj.fields.get(name))
    }

    // --- Edits mirrored onto relabelled shapes. ---
    //
    // Each edit reaches the shape itself when it is an object, or every object
    // variant of a union (`"type": ["object", "null"]`). Other shapes are left
    // alone.

    fn for_each_object(&mut self, mut edit: impl FnMut(&mut ObjectShape)) {
        match self {
            TypeShape::Object(obj) => edit(obj),
            TypeShape::Union(variants) => {
                for variant in variants {
                    if let TypeShape::Object(obj) = variant {
                        edit(obj);
                    }
                }
            }
            _ => {}
        }
    }

    /// Drop fields whose properties were removed.
    ///
    /// With `keep_required`, a removed field that was required stays as a
    /// required field of unknown shape: the name is still in `required`.
    pub(crate) fn remove_fields(&mut self, removed: &[String], keep_required: bool) {
        self.for_each_object(|obj| {
            for key in removed {
                let still_required =
                    keep_required && obj.fields.get(key).is_some_and(|f| f.required);
                if still_required {
                    obj.fields
                        .insert(key.clone(), FieldShape::new(TypeShape::Any, true));
                } else {
                    obj.fields.remove(key);
                }
            }
        });
    }

    /// Set a field's shape, keeping its current requiredness.
    pub(crate) fn set_field(&mut self, key: &str, shape: &TypeShape) {
        self.for_each_object(|obj| {
            let required = obj.fields.get(key).is_some_and(|f| f.required);
            obj.fields
                .insert(key.to_string(), FieldShape::new(shape.clone(), required));
        });
    }

    /// Mark fields required. Names without a field become required unknowns.
    pub(crate) fn mark_required(&mut self, names: &[String]) {
        self.for_each_object(|obj| {
            for name in names {
                obj.fields
                    .entry(name.clone())
                    .and_modify(|f| f.required = true)
                    .or_insert_with(|| FieldShape::new(TypeShape::Any, true));
            }
        });
    }

    /// Mark fields optional. `declared` lists the keys present in `properties`;
    /// fields that only existed because of `required` disappear.
    pub(crate) fn mark_optional(&mut self, names: &[String], declared: &[String]) {
        self.for_each_object(|obj| {
            for name in names {
                if declared.contains(name) {
                    if let Some(field) = obj.fields.get_mut(name) {
                        field.required = false;
                    }
                } else {
                    obj.fields.remove(name);
                }
            }
        });
    }

    /// Require exactly the given keys; other fields are dropped.
    pub(crate) fn require_exactly(&mut self, keys: &[String]) {
        self.for_each_object(|obj| {
            obj.fields.retain(|k, _| keys.contains(k));
            for field in obj.fields.values_mut() {
                field.required = true;
            }
        });
    }

    /// Make every field optional, recursing into nested shapes when `deep`.
    ///
    /// `node` is the schema node this shape describes after `required` was
    /// stripped from it. Where it has a `properties` map, fields it does not
    /// declare are dropped, since only a `required` entry kept them alive.
    pub(crate) fn make_optional(&mut self, node: &Value, deep: bool) {
        match self {
            TypeShape::Array(inner) if deep => inner.make_optional(&node["items"], true),
            TypeShape::Union(variants) if deep => {
                for variant in variants {
                    variant.make_optional(node, true);
                }
            }
            _ => self.for_each_object(|obj| obj.make_optional(node, deep)),
        }
    }
}

impl ObjectShape {
    fn make_optional(&mut self, node: &Value, deep: bool) {
        if let Some(declared) = node.get(PROPERTIES).and_then(Value::as_object) {
            self.fields.retain(|key, _| declared.contains_key(key));
        }
        for (key, field) in self.fields.iter_mut() {
            field.required = false;
            if deep {
                field.shape.make_optional(&node[PROPERTIES][key.as_str()], true);
            }
        }
    }
}

fn from_object(map: &Map<String, Value>, overrides: &BTreeMap<String, TypeShape>) -> TypeShape {
    if map.contains_key(REF_MARKER) {
        return TypeShape::Any;
    }
    if let Some(value) = map.get("const") {
        return TypeShape::Literal(value.clone());
    }
    if let Some(Value::Array(values)) = map.get("enum") {
        return TypeShape::union(values.iter().cloned().map(TypeShape::Literal));
    }
    for key in ["anyOf", "oneOf"] {
        if let Some(Value::Array(branches)) = map.get(key) {
            return TypeShape::union(branches.iter().map(TypeShape::from_schema));
        }
    }

    match map.get("type") {
        Some(Value::String(name)) => from_type_name(name, map, overrides),
        Some(Value::Array(names)) => TypeShape::union(
            names
                .iter()
                .filter_map(Value::as_str)
                .map(|name| from_type_name(name, map, overrides)),
        ),
        _ if map.contains_key(PROPERTIES) || map.contains_key(REQUIRED) => {
            object_shape(map, overrides)
        }
        _ => TypeShape::Any,
    }
}

fn from_type_name(
    name: &str,
    map: &Map<String, Value>,
    overrides: &BTreeMap<String, TypeShape>,
) -> TypeShape {
    match name {
        "null" => TypeShape::Null,
        "boolean" => TypeShape::Boolean,
        "integer" => TypeShape::Integer,
        "number" => TypeShape::Number,
        "string" => TypeShape::String,
        "array" => TypeShape::Array(Box::new(
            map.get("items")
                .map(TypeShape::from_schema)
                .unwrap_or_default(),
        )),
        "object" => object_shape(map, overrides),
        _ => TypeShape::Any,
    }
}

fn object_shape(map: &Map<String, Value>, overrides: &BTreeMap<String, TypeShape>) -> TypeShape {
    let required: Vec<&str> = map
        .get(REQUIRED)
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut fields = BTreeMap::new();
    if let Some(Value::Object(props)) = map.get(PROPERTIES) {
        for (key, sub) in props {
            let shape = overrides
                .get(key)
                .cloned()
                .unwrap_or_else(|| TypeShape::from_schema(sub));
            let field = FieldShape::new(shape, required.contains(&key.as_str()));
            fields.insert(key.clone(), field);
        }
    }
    // A required name without a property still has to be present.
    for name in required {
        fields
            .entry(name.to_string())
            .or_insert_with(|| FieldShape::new(TypeShape::Any, true));
    }

    let open = !matches!(map.get("additionalProperties"), Some(Value::Bool(false)));
    TypeShape::Object(ObjectShape { fields, open })
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Any => write!(f, "unknown"),
            TypeShape::Never => write!(f, "never"),
            TypeShape::Null => write!(f, "null"),
            TypeShape::Boolean => write!(f, "boolean"),
            TypeShape::Integer => write!(f, "integer"),
            TypeShape::Number => write!(f, "number"),
            TypeShape::String => write!(f, "string"),
            TypeShape::Literal(value) => write!(f, "{}", value),
            TypeShape::Union(variants) => {
                for (i, variant) in variants.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", variant)?;
                }
                Ok(())
            }
            TypeShape::Array(inner) => match inner.as_ref() {
                TypeShape::Union(_) => write!(f, "({})[]", inner),
                _ => write!(f, "{}[]", inner),
            },
            TypeShape::Object(obj) => {
                if obj.fields.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, (key, field)) in obj.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    let marker = if field.required { "" } else { "?" };
                    write!(f, "{}{}: {}", key, marker, field.shape)?;
                }
                write!(f, " }}")
            }
        }
    }
}
