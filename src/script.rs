//! Edit scripts - builder operations as a JSON document.
//!
//! A script is an array of steps, each naming the builder operation in `op`:
//!
//! ```json
//! [
//!   { "op": "pick", "props": ["name", "email"] },
//!   { "op": "setProps", "key": "email", "value": { "format": "email" }, "merge": true },
//!   { "op": "required", "props": ["email"] },
//!   { "op": "toArray" }
//! ]
//! ```
//!
//! Updater functions have no JSON form; `merge: true` covers the common case of
//! refining an existing sub-schema by shallow-merging `value` into it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::builder::SchemaBuilder;
use crate::error::ScriptError;
use crate::types::{
    json_type_name, AddOptions, FilterOptions, NoRefOptions, RefDetection, Selector,
};

fn default_true() -> bool {
    true
}

/// One builder operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Step {
    Pick {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        props: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        #[serde(default = "default_true")]
        remove_required: bool,
    },
    Omit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        props: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        #[serde(default = "default_true")]
        remove_required: bool,
    },
    Set {
        key: String,
        value: Value,
    },
    SetProps {
        key: String,
        value: Value,
        #[serde(default)]
        merge: bool,
    },
    AddProps {
        key: String,
        value: Value,
        #[serde(default)]
        merge: bool,
        #[serde(default)]
        required: bool,
    },
    Optional {
        props: Vec<String>,
    },
    Required {
        props: Vec<String>,
    },
    AllOptional {
        #[serde(default)]
        deep: bool,
    },
    AllRequired,
    NoRef {
        #[serde(default = "default_true")]
        remove_required: bool,
        #[serde(default)]
        detection: RefDetection,
    },
    ToArray,
}

impl Step {
    /// Operation name as written in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Pick { .. } => "pick",
            Step::Omit { .. } => "omit",
            Step::Set { .. } => "set",
            Step::SetProps { .. } => "setProps",
            Step::AddProps { .. } => "addProps",
            Step::Optional { .. } => "optional",
            Step::Required { .. } => "required",
            Step::AllOptional { .. } => "allOptional",
            Step::AllRequired => "allRequired",
            Step::NoRef { .. } => "noRef",
            Step::ToArray => "toArray",
        }
    }
}

/// An ordered list of steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Parse a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError::InvalidJson` if the text is not a valid script.
    pub fn parse(content: &str) -> Result<Self, ScriptError> {
        let value = serde_json::from_str(content)
            .map_err(|source| ScriptError::InvalidJson { source })?;
        Self::from_value(value)
    }

    /// Interpret an already-loaded JSON value as a script.
    pub fn from_value(value: Value) -> Result<Self, ScriptError> {
        if !value.is_array() {
            return Err(ScriptError::NotAList {
                actual: json_type_name(&value).to_string(),
            });
        }
        serde_json::from_value(value).map_err(|source| ScriptError::InvalidJson { source })
    }

    /// Run every step in order.
    ///
    /// # Errors
    ///
    /// Returns `ScriptError` if a step names both or neither of `props` and
    /// `pattern`, or if a pattern does not compile.
    pub fn apply(&self, builder: SchemaBuilder) -> Result<SchemaBuilder, ScriptError> {
        self.steps
            .iter()
            .enumerate()
            .try_fold(builder, |builder, (index, step)| {
                debug!(index, op = step.name(), "applying step");
                apply_step(builder, step, index)
            })
    }
}

/// Run `script` over `builder`.
pub fn apply_script(builder: SchemaBuilder, script: &Script) -> Result<SchemaBuilder, ScriptError> {
    script.apply(builder)
}

fn apply_step(
    builder: SchemaBuilder,
    step: &Step,
    index: usize,
) -> Result<SchemaBuilder, ScriptError> {
    let next = match step {
        Step::Pick {
            props,
            pattern,
            remove_required,
        } => {
            let selector = selector(index, props, pattern)?;
            builder.pick(selector, FilterOptions::default().remove_required(*remove_required))
        }
        Step::Omit {
            props,
            pattern,
            remove_required,
        } => {
            let selector = selector(index, props, pattern)?;
            builder.omit(selector, FilterOptions::default().remove_required(*remove_required))
        }
        Step::Set { key, value } => builder.set(key, value.clone()),
        Step::SetProps { key, value, merge } => {
            builder.set_props_with(key, |current| merged(current, value, *merge))
        }
        Step::AddProps {
            key,
            value,
            merge,
            required,
        } => builder.add_props_with(
            key,
            |current| merged(current, value, *merge),
            AddOptions::default().required(*required),
        ),
        Step::Optional { props } => builder.optional(props.iter().cloned()),
        Step::Required { props } => builder.required(props.iter().cloned()),
        Step::AllOptional { deep } => builder.all_optional(*deep),
        Step::AllRequired => builder.all_required(),
        Step::NoRef {
            remove_required,
            detection,
        } => builder.no_ref(
            NoRefOptions::default()
                .remove_required(*remove_required)
                .detection(*detection),
        ),
        Step::ToArray => builder.to_array(),
    };
    Ok(next)
}

fn selector(
    index: usize,
    props: &Option<Vec<String>>,
    pattern: &Option<String>,
) -> Result<Selector, ScriptError> {
    match (props, pattern) {
        (Some(props), None) => Ok(Selector::Names(props.clone())),
        (None, Some(pattern)) => {
            Selector::pattern(pattern).map_err(|source| ScriptError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        }
        (Some(_), Some(_)) => Err(ScriptError::InvalidStep {
            index,
            message: "give either props or pattern, not both".to_string(),
        }),
        (None, None) => Err(ScriptError::InvalidStep {
            index,
            message: "missing props or pattern".to_string(),
        }),
    }
}

/// Shallow-merge `value` into `current` when both are objects and `merge` is set.
fn merged(current: Option<Value>, value: &Value, merge: bool) -> Value {
    match (current, value) {
        (Some(Value::Object(mut base)), Value::Object(patch)) if merge => {
            for (k, v) in patch {
                base.insert(k.clone(), v.clone());
            }
            Value::Object(base)
        }
        _ => value.clone(),
    }
}
