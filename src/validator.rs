//! Well-formedness check for edited schemas.
//!
//! Only the schema document itself is compiled; no instance data is validated.

use serde_json::Value;

use crate::error::CheckError;

/// Check that `schema` compiles as a JSON Schema.
///
/// # Errors
///
/// Returns `CheckError::InvalidSchema` with the compiler's message.
pub fn check_schema(schema: &Value) -> Result<(), CheckError> {
    jsonschema::validator_for(schema)
        .map(|_| ())
        .map_err(|e| CheckError::InvalidSchema {
            message: e.to_string(),
        })
}
