// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

use serde_json::{Map, Number, Value};

use crate::output::error::TransferError;
use crate::record::{
    Attachment, CodeInfo, LogRecord, Measurement, Phase, RecordValue, TestRecord,
};

/// Options controlling record conversion.
#[derive(Debug, Default, Clone)]
pub struct ConvertOptions {
    /// Field names omitted from the output mapping at whatever level they
    /// occur.
    pub exclude_keys: BTreeSet<String>,
    /// Permit NaN and infinite floats, encoded as explicit text tokens.
    /// When false, a non-finite value fails the whole conversion.
    pub allow_non_finite: bool,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_key(mut self, key: &str) -> Self {
        self.exclude_keys.insert(key.to_owned());
        self
    }

    pub fn allow_non_finite(mut self, value: bool) -> Self {
        self.allow_non_finite = value;
        self
    }
}

/// Converts a [`TestRecord`] into a JSON-safe tree of mappings, sequences
/// and scalars.
///
/// The conversion is a closed set of rules, one function per record type;
/// there is no reflection-style attribute walking. Binary attachment
/// payloads become structural placeholders holding only metadata, see
/// [`crate::output::inline_attachments`] for the encoding step.
///
/// Pure function of its inputs; the record is never mutated.
///
/// # Examples
///
/// ```
/// # use htf_transfer::output::*;
/// # use htf_transfer::record::*;
/// let record = TestRecord::builder("station-1", Outcome::Pass)
///     .dut_id("DUT42")
///     .build();
/// let tree = convert(&record, &ConvertOptions::new())?;
/// assert_eq!(tree["outcome"], "PASS");
/// # Ok::<(), TransferError>(())
/// ```
pub fn convert(record: &TestRecord, options: &ConvertOptions) -> Result<Value, TransferError> {
    let mut map = Map::new();

    put(
        &mut map,
        "dut_id",
        match &record.dut_id {
            Some(id) => Value::String(id.clone()),
            None => Value::Null,
        },
        options,
    );
    put(
        &mut map,
        "station_id",
        Value::String(record.station_id.clone()),
        options,
    );
    put(
        &mut map,
        "outcome",
        Value::String(record.outcome.as_str().to_owned()),
        options,
    );
    put(
        &mut map,
        "start_time_millis",
        Value::from(record.start_time_millis),
        options,
    );
    put(
        &mut map,
        "end_time_millis",
        Value::from(record.end_time_millis),
        options,
    );

    if !options.exclude_keys.contains("metadata") {
        let mut metadata = Map::new();
        for (key, value) in &record.metadata {
            if options.exclude_keys.contains(key) {
                continue;
            }
            metadata.insert(key.clone(), convert_value(value, key, options)?);
        }
        map.insert("metadata".to_owned(), Value::Object(metadata));
    }

    if !options.exclude_keys.contains("phases") {
        let phases = record
            .phases
            .iter()
            .map(|phase| convert_phase(phase, options))
            .collect::<Result<Vec<_>, _>>()?;
        map.insert("phases".to_owned(), Value::Array(phases));
    }

    if !options.exclude_keys.contains("code_info") {
        let code_info = match &record.code_info {
            Some(info) => convert_code_info(info, options),
            None => Value::Null,
        };
        map.insert("code_info".to_owned(), code_info);
    }

    if !options.exclude_keys.contains("log_records") {
        let log_records = record
            .log_records
            .iter()
            .map(|log| convert_log_record(log, options))
            .collect();
        map.insert("log_records".to_owned(), Value::Array(log_records));
    }

    Ok(Value::Object(map))
}

fn put(map: &mut Map<String, Value>, key: &str, value: Value, options: &ConvertOptions) {
    if !options.exclude_keys.contains(key) {
        map.insert(key.to_owned(), value);
    }
}

fn convert_phase(phase: &Phase, options: &ConvertOptions) -> Result<Value, TransferError> {
    let mut map = Map::new();

    put(&mut map, "name", Value::String(phase.name.clone()), options);
    put(
        &mut map,
        "outcome",
        Value::String(phase.outcome.as_str().to_owned()),
        options,
    );
    put(
        &mut map,
        "start_time_millis",
        Value::from(phase.start_time_millis),
        options,
    );
    put(
        &mut map,
        "end_time_millis",
        Value::from(phase.end_time_millis),
        options,
    );

    if !options.exclude_keys.contains("measurements") {
        let mut measurements = Map::new();
        for (name, measurement) in &phase.measurements {
            if options.exclude_keys.contains(name) {
                continue;
            }
            measurements.insert(name.clone(), convert_measurement(measurement, name, options)?);
        }
        map.insert("measurements".to_owned(), Value::Object(measurements));
    }

    if !options.exclude_keys.contains("attachments") {
        let mut attachments = Map::new();
        for (name, attachment) in &phase.attachments {
            if options.exclude_keys.contains(name) {
                continue;
            }
            attachments.insert(name.clone(), convert_attachment(attachment));
        }
        map.insert("attachments".to_owned(), Value::Object(attachments));
    }

    Ok(Value::Object(map))
}

fn convert_measurement(
    measurement: &Measurement,
    name: &str,
    options: &ConvertOptions,
) -> Result<Value, TransferError> {
    let mut map = Map::new();

    put(
        &mut map,
        "outcome",
        Value::String(measurement.outcome.as_str().to_owned()),
        options,
    );

    if !options.exclude_keys.contains("measured_value") {
        let value = match &measurement.measured_value {
            Some(value) => convert_value(value, name, options)?,
            None => Value::Null,
        };
        map.insert("measured_value".to_owned(), value);
    }

    if !options.exclude_keys.contains("units") {
        let units = match &measurement.units {
            Some(units) => {
                let mut unit_map = Map::new();
                unit_map.insert("name".to_owned(), Value::String(units.name.clone()));
                unit_map.insert("suffix".to_owned(), Value::String(units.suffix.clone()));
                Value::Object(unit_map)
            }
            None => Value::Null,
        };
        map.insert("units".to_owned(), units);
    }

    Ok(Value::Object(map))
}

// The placeholder keeps this stage attachment-encoding-agnostic: metadata
// only, no payload. Inlining fills in the `data` field later.
fn convert_attachment(attachment: &Attachment) -> Value {
    let mut map = Map::new();
    map.insert(
        "mimetype".to_owned(),
        Value::String(attachment.content_type.to_string()),
    );
    map.insert("size".to_owned(), Value::from(attachment.data.len()));
    Value::Object(map)
}

fn convert_code_info(info: &CodeInfo, options: &ConvertOptions) -> Value {
    let mut map = Map::new();
    put(&mut map, "name", Value::String(info.name.clone()), options);
    put(
        &mut map,
        "docstring",
        match &info.docstring {
            Some(doc) => Value::String(doc.clone()),
            None => Value::Null,
        },
        options,
    );
    put(
        &mut map,
        "source_file",
        Value::String(info.source_file.clone()),
        options,
    );
    Value::Object(map)
}

fn convert_log_record(log: &LogRecord, options: &ConvertOptions) -> Value {
    let mut map = Map::new();
    put(
        &mut map,
        "level",
        Value::String(log.level.as_str().to_owned()),
        options,
    );
    put(
        &mut map,
        "logger_name",
        Value::String(log.logger_name.clone()),
        options,
    );
    put(
        &mut map,
        "message",
        Value::String(log.message.clone()),
        options,
    );
    put(
        &mut map,
        "timestamp_millis",
        Value::from(log.timestamp_millis),
        options,
    );
    Value::Object(map)
}

fn convert_value(
    value: &RecordValue,
    field: &str,
    options: &ConvertOptions,
) -> Result<Value, TransferError> {
    match value {
        RecordValue::Bool(b) => Ok(Value::Bool(*b)),
        RecordValue::Int(i) => Ok(Value::from(*i)),
        RecordValue::Float(f) => convert_float(*f, field, options),
        RecordValue::Text(s) => Ok(Value::String(s.clone())),
        RecordValue::Sequence(items) => {
            let converted = items
                .iter()
                .map(|item| convert_value(item, field, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(converted))
        }
        RecordValue::Dimensioned(dimensions) => {
            let mut map = Map::new();
            for (dimension, item) in dimensions {
                map.insert(dimension.clone(), convert_value(item, field, options)?);
            }
            Ok(Value::Object(map))
        }
    }
}

fn convert_float(value: f64, field: &str, options: &ConvertOptions) -> Result<Value, TransferError> {
    if let Some(number) = Number::from_f64(value) {
        return Ok(Value::Number(number));
    }

    // serde_json cannot carry non-finite numbers; encode them as explicit
    // text tokens rather than letting them collapse to null.
    if options.allow_non_finite {
        let token = if value.is_nan() {
            "NaN"
        } else if value > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        return Ok(Value::String(token.to_owned()));
    }

    Err(TransferError::NonFiniteNumber {
        field: field.to_owned(),
    })
}
