// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::output::error::TransferError;
use crate::record::TestRecord;

/// Replaces each attachment placeholder in a converted tree with the
/// base64 text encoding of the attachment's original binary payload.
///
/// Phases and attachments are paired with the source record by an explicit
/// join on phase name and attachment name. A converted phase count that
/// differs from the record, or a name present on one side and absent from
/// the other, is reported as [`TransferError::StructuralMismatch`]; both
/// indicate the converter output and the record have diverged.
///
/// A tree converted with `phases` excluded is left untouched. The record
/// is read-only; the tree is mutated in place.
pub fn inline_attachments(tree: &mut Value, record: &TestRecord) -> Result<(), TransferError> {
    let Some(phases) = tree.get_mut("phases") else {
        return Ok(());
    };
    let Some(phases) = phases.as_array_mut() else {
        return Err(TransferError::StructuralMismatch(
            "converted `phases` is not a sequence".to_owned(),
        ));
    };

    if phases.len() != record.phases().len() {
        return Err(TransferError::StructuralMismatch(format!(
            "converted tree has {} phases, record has {}",
            phases.len(),
            record.phases().len()
        )));
    }

    for phase in phases.iter_mut() {
        let Some(name) = phase.get("name").and_then(Value::as_str) else {
            return Err(TransferError::StructuralMismatch(
                "converted phase is missing its name".to_owned(),
            ));
        };
        let name = name.to_owned();

        let Some(original) = record.phases().iter().find(|p| p.name() == name) else {
            return Err(TransferError::StructuralMismatch(format!(
                "converted phase `{name}` is absent from the record"
            )));
        };

        let Some(attachments) = phase.get_mut("attachments").and_then(Value::as_object_mut)
        else {
            continue;
        };

        for (attachment_name, entry) in attachments.iter_mut() {
            let Some(attachment) = original.attachments().get(attachment_name) else {
                return Err(TransferError::StructuralMismatch(format!(
                    "attachment `{attachment_name}` of phase `{name}` is absent from the record"
                )));
            };

            let encoded = BASE64_STANDARD.encode(attachment.data());
            let Some(entry) = entry.as_object_mut() else {
                return Err(TransferError::StructuralMismatch(format!(
                    "converted attachment `{attachment_name}` is not a mapping"
                )));
            };
            entry.insert("data".to_owned(), Value::String(encoded));
        }
    }

    Ok(())
}
