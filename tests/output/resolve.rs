// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use anyhow::Result;

use htf_transfer::output::{resolve_path, TransferError};
use htf_transfer::record::{Measurement, MeasurementOutcome, Outcome, Phase, TestRecord};

use super::fixture::sample_record;

#[test]
fn test_resolve_formats_identifying_fields() -> Result<()> {
    let path = resolve_path("{dut_id}_{outcome}.json", &sample_record(), &BTreeSet::new())?;
    assert_eq!(path, "DUT42_PASS.json");
    Ok(())
}

#[test]
fn test_resolve_with_timestamp_template() -> Result<()> {
    let path = resolve_path(
        "{dut_id}_{start_time_millis}_{outcome}.json",
        &sample_record(),
        &BTreeSet::new(),
    )?;
    assert_eq!(path, "DUT42_1700000000000_PASS.json");
    Ok(())
}

#[test]
fn test_resolve_missing_field_is_a_format_error() {
    let actual = resolve_path("{missing_field}.json", &sample_record(), &BTreeSet::new());
    assert!(matches!(
        actual,
        Err(TransferError::UnknownTemplateField { ref field }) if field == "missing_field"
    ));
}

#[test]
fn test_resolve_ignores_nan_in_excluded_subtrees() -> Result<()> {
    let record = TestRecord::builder("station-1", Outcome::Error)
        .dut_id("DUT7")
        .add_phase(
            Phase::builder("phase1")
                .add_measurement(
                    "M1",
                    Measurement::builder(MeasurementOutcome::Fail)
                        .value(f64::NAN.into())
                        .build(),
                )
                .build(),
        )
        .build();

    let mut exclude = BTreeSet::new();
    exclude.insert("phases".to_owned());

    // a NaN buried under an excluded subtree must not block path formatting
    let path = resolve_path("{dut_id}_{outcome}.json", &record, &exclude)?;
    assert_eq!(path, "DUT7_ERROR.json");
    Ok(())
}

#[test]
fn test_resolve_renders_missing_dut_as_null() -> Result<()> {
    let record = TestRecord::builder("station-1", Outcome::Aborted).build();

    let path = resolve_path("{dut_id}.json", &record, &BTreeSet::new())?;
    assert_eq!(path, "null.json");
    Ok(())
}
