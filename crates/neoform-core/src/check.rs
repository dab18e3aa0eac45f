//! Runtime type checking of property values against declared types.

use crate::error::{NeoformError, Result};
use crate::schema::PropDef;
use crate::types::{NeoValue, SchemaType};

/// Verify that `value` carries exactly the `expected` type tag.
///
/// Equality is by tag identity: a `Date[]` is never accepted where a
/// `String[]` is declared, even when the list is empty.
pub fn check_type(key: &str, value: &NeoValue, expected: SchemaType) -> Result<()> {
    let actual = value.schema_type();
    if actual != expected {
        return Err(NeoformError::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Resolve a descriptor to its bare type and check `value` against it.
pub fn check_prop_def(key: &str, value: &NeoValue, prop_def: &PropDef) -> Result<()> {
    check_type(key, value, prop_def.schema_type())
}
