// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::output::convert::{convert, ConvertOptions};
use crate::output::error::TransferError;
use crate::record::TestRecord;

/// Expands a destination path template against a record.
///
/// The record is flattened to a JSON-safe mapping with the given exclude
/// set and `{name}` placeholders are substituted with the matching
/// top-level field. Lookup is explicit: a placeholder naming a field that
/// is absent fails with [`TransferError::UnknownTemplateField`] instead of
/// producing a partial path. `{{` and `}}` are literal braces.
///
/// No escaping or sanitization of the produced segments is performed;
/// callers must ensure template fields cannot contain path-breaking
/// characters when the destination is a filesystem.
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeSet;
/// # use htf_transfer::output::*;
/// # use htf_transfer::record::*;
/// let record = TestRecord::builder("station-1", Outcome::Pass)
///     .dut_id("DUT42")
///     .build();
/// let path = resolve_path("{dut_id}_{outcome}.json", &record, &BTreeSet::new())?;
/// assert_eq!(path, "DUT42_PASS.json");
/// # Ok::<(), TransferError>(())
/// ```
pub fn resolve_path(
    template: &str,
    record: &TestRecord,
    exclude_keys: &BTreeSet<String>,
) -> Result<String, TransferError> {
    // Path formatting never cares about strict JSON; a NaN measurement
    // buried in an excluded subtree must not block resolution.
    let options = ConvertOptions {
        exclude_keys: exclude_keys.clone(),
        allow_non_finite: true,
    };
    let flattened = convert(record, &options)?;

    let mut resolved = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                resolved.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                resolved.push('}');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => field.push(c),
                        None => {
                            return Err(TransferError::MalformedTemplate(format!(
                                "unterminated placeholder `{{{field}`"
                            )))
                        }
                    }
                }
                resolved.push_str(&render_field(&flattened, &field)?);
            }
            c => resolved.push(c),
        }
    }

    Ok(resolved)
}

fn render_field(flattened: &Value, field: &str) -> Result<String, TransferError> {
    let value =
        flattened
            .get(field)
            .ok_or_else(|| TransferError::UnknownTemplateField {
                field: field.to_owned(),
            })?;

    Ok(match value {
        // strings render bare, everything else as its JSON text
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
