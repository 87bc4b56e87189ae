// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use htf_transfer::output::{convert, inline_attachments, ConvertOptions, TransferError};
use htf_transfer::record::{Attachment, Outcome, Phase, TestRecord};

use super::fixture::sample_record;

#[test]
fn test_inlined_tree_keeps_phase_count() -> Result<()> {
    let record = sample_record();

    let mut tree = convert(&record, &ConvertOptions::new())?;
    inline_attachments(&mut tree, &record)?;

    assert_eq!(
        tree["phases"].as_array().map(Vec::len),
        Some(record.phases().len())
    );
    Ok(())
}

#[test]
fn test_every_attachment_round_trips_through_base64() -> Result<()> {
    let payloads: [(&str, &[u8]); 3] = [
        ("readme.txt", b"hello"),
        ("empty.bin", b""),
        ("blob.bin", &[0xff, 0x00, 0x7f, 0x80]),
    ];

    let mut phase = Phase::builder("phase1");
    for (name, payload) in payloads {
        phase = phase.add_attachment(
            name,
            Attachment::new(payload.to_vec(), mime::APPLICATION_OCTET_STREAM),
        );
    }
    let record = TestRecord::builder("station-1", Outcome::Pass)
        .add_phase(phase.build())
        .build();

    let mut tree = convert(&record, &ConvertOptions::new())?;
    inline_attachments(&mut tree, &record)?;

    for (name, payload) in payloads {
        let encoded = tree["phases"][0]["attachments"][name]["data"]
            .as_str()
            .unwrap();
        assert_eq!(BASE64_STANDARD.decode(encoded)?, payload);
    }

    Ok(())
}

#[test]
fn test_known_base64_encoding() -> Result<()> {
    let record = sample_record();

    let mut tree = convert(&record, &ConvertOptions::new())?;
    inline_attachments(&mut tree, &record)?;

    // base64("hello")
    assert_eq!(
        tree["phases"][0]["attachments"]["log.txt"]["data"],
        "aGVsbG8="
    );
    Ok(())
}

#[test]
fn test_mismatched_record_is_a_reported_error() -> Result<()> {
    let record = sample_record();
    let unrelated = TestRecord::builder("station-1", Outcome::Pass)
        .add_phase(Phase::builder("different_phase").build())
        .build();

    let mut tree = convert(&record, &ConvertOptions::new())?;
    let actual = inline_attachments(&mut tree, &unrelated);

    assert!(matches!(actual, Err(TransferError::StructuralMismatch(_))));
    Ok(())
}
