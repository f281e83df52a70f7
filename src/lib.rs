//! Schema Builder
//!
//! Chainable structural edits over JSON Schema documents.
//!
//! A [`SchemaBuilder`] owns one schema tree and a projected [`TypeShape`]
//! describing the values that schema accepts. Each operation edits the tree
//! and re-projects the shape, so the shape never drifts from what the schema
//! would validate. `set_props_type` and `with_type` are the deliberate,
//! unchecked exceptions.
//!
//! # Example
//!
//! ```
//! use schema_builder::{build, FilterOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": "integer" }
//!     },
//!     "required": ["name", "age"]
//! });
//!
//! let picked = build(&schema).pick(["name"], FilterOptions::default());
//!
//! assert_eq!(
//!     picked.schema(),
//!     &json!({
//!         "type": "object",
//!         "properties": { "name": { "type": "string" } },
//!         "required": ["name"]
//!     })
//! );
//! assert_eq!(picked.type_shape().to_string(), "{ name: string }");
//! ```
//!
//! # Operations
//!
//! | Operation | Effect on `properties` | Effect on `required` |
//! |-----------|------------------------|----------------------|
//! | `pick` / `omit` | Keep / remove selected keys | Drop removed names |
//! | `no_ref` | Remove keys whose sub-schema holds `$ref` | Drop removed names |
//! | `set_props` / `add_props` | Write one sub-schema | `add_props` may append |
//! | `required` / `optional` | - | Merge / drop names |
//! | `all_required` / `all_optional` | - | All keys / none |
//!
//! Boolean schemas (`true`, `false`) pass through every operation unchanged.

mod builder;
mod error;
mod loader;
mod script;
mod shape;
mod types;
mod validator;

pub use builder::{build, contains_ref, SchemaBuilder};
pub use error::{CheckError, CliError, LoadError, ScriptError};
pub use loader::{is_url, load_json, load_json_auto, load_json_str, load_schema};
pub use script::{apply_script, Script, Step};
pub use shape::{FieldShape, ObjectShape, TypeShape};
pub use types::{
    json_type_name, AddOptions, FilterOptions, NoRefOptions, RefDetection, Selector,
};
pub use validator::check_schema;

#[cfg(feature = "remote")]
pub use loader::load_json_url;
