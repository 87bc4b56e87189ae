// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The test record data model.
//!
//! A [`TestRecord`] is the complete result of one executed hardware test
//! run, as handed to an output callback by the test-execution engine. The
//! types here are the input boundary of this crate: the engine builds and
//! finalizes the record, this crate only reads it.

use std::collections::BTreeMap;

/// Final outcome of a whole test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    Error,
    Timeout,
    Aborted,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::Error => "ERROR",
            Outcome::Timeout => "TIMEOUT",
            Outcome::Aborted => "ABORTED",
        }
    }
}

/// Outcome of a single phase within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    Pass,
    Fail,
    Skip,
    Error,
}

impl PhaseOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseOutcome::Pass => "PASS",
            PhaseOutcome::Fail => "FAIL",
            PhaseOutcome::Skip => "SKIP",
            PhaseOutcome::Error => "ERROR",
        }
    }
}

/// Validation outcome of a single measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementOutcome {
    Pass,
    Fail,
    Unset,
}

impl MeasurementOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementOutcome::Pass => "PASS",
            MeasurementOutcome::Fail => "FAIL",
            MeasurementOutcome::Unset => "UNSET",
        }
    }
}

/// Severity of a captured framework log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warning => "WARNING",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// A scalar or collection value carried by a record field.
///
/// This is the closed set of value shapes a measurement or metadata entry
/// can take. Multi-dimensional measurement results are a mapping keyed by
/// dimension name.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Sequence(Vec<RecordValue>),
    Dimensioned(BTreeMap<String, RecordValue>),
}

impl From<bool> for RecordValue {
    fn from(value: bool) -> Self {
        RecordValue::Bool(value)
    }
}

impl From<i64> for RecordValue {
    fn from(value: i64) -> Self {
        RecordValue::Int(value)
    }
}

impl From<f64> for RecordValue {
    fn from(value: f64) -> Self {
        RecordValue::Float(value)
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        RecordValue::Text(value.to_owned())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Text(value)
    }
}

/// Engineering unit attached to a measurement, with a display suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDescriptor {
    pub(crate) name: String,
    pub(crate) suffix: String,
}

impl UnitDescriptor {
    pub fn new(name: &str, suffix: &str) -> Self {
        UnitDescriptor {
            name: name.to_owned(),
            suffix: suffix.to_owned(),
        }
    }
}

/// A single validated measurement taken during a phase.
///
/// # Examples
///
/// ```
/// # use htf_transfer::record::*;
/// let meas = Measurement::builder(MeasurementOutcome::Pass)
///     .value(3.3.into())
///     .units(UnitDescriptor::new("volt", "V"))
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub(crate) outcome: MeasurementOutcome,
    pub(crate) measured_value: Option<RecordValue>,
    pub(crate) units: Option<UnitDescriptor>,
}

impl Measurement {
    pub fn builder(outcome: MeasurementOutcome) -> MeasurementBuilder {
        MeasurementBuilder::new(outcome)
    }
}

/// This structure builds a [`Measurement`] object.
pub struct MeasurementBuilder {
    outcome: MeasurementOutcome,
    measured_value: Option<RecordValue>,
    units: Option<UnitDescriptor>,
}

impl MeasurementBuilder {
    fn new(outcome: MeasurementOutcome) -> Self {
        MeasurementBuilder {
            outcome,
            measured_value: None,
            units: None,
        }
    }

    pub fn value(mut self, value: RecordValue) -> Self {
        self.measured_value = Some(value);
        self
    }

    pub fn units(mut self, units: UnitDescriptor) -> Self {
        self.units = Some(units);
        self
    }

    pub fn build(self) -> Measurement {
        Measurement {
            outcome: self.outcome,
            measured_value: self.measured_value,
            units: self.units,
        }
    }
}

/// A named binary artifact captured during a phase, e.g. a log file.
///
/// The raw payload only ever exists here, on the original record; the
/// converted tree holds a placeholder until inlining replaces it with a
/// base64 text encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub(crate) data: Vec<u8>,
    pub(crate) content_type: mime::Mime,
}

impl Attachment {
    pub fn new(data: impl Into<Vec<u8>>, content_type: mime::Mime) -> Self {
        Attachment {
            data: data.into(),
            content_type,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn content_type(&self) -> &mime::Mime {
        &self.content_type
    }
}

/// Source details of the test definition that produced a record.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeInfo {
    pub(crate) name: String,
    pub(crate) docstring: Option<String>,
    pub(crate) source_file: String,
}

impl CodeInfo {
    pub fn new(name: &str, source_file: &str) -> Self {
        CodeInfo {
            name: name.to_owned(),
            docstring: None,
            source_file: source_file.to_owned(),
        }
    }

    pub fn docstring(mut self, value: &str) -> Self {
        self.docstring = Some(value.to_owned());
        self
    }
}

/// One framework log line captured during the run.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub(crate) level: LogSeverity,
    pub(crate) logger_name: String,
    pub(crate) message: String,
    pub(crate) timestamp_millis: i64,
}

impl LogRecord {
    pub fn new(level: LogSeverity, logger_name: &str, message: &str, timestamp_millis: i64) -> Self {
        LogRecord {
            level,
            logger_name: logger_name.to_owned(),
            message: message.to_owned(),
            timestamp_millis,
        }
    }
}

/// A named, ordered stage of a test run with its own measurements and
/// attachments.
///
/// # Examples
///
/// ```
/// # use htf_transfer::record::*;
/// let phase = Phase::builder("power_on")
///     .outcome(PhaseOutcome::Pass)
///     .add_measurement(
///         "rail_voltage",
///         Measurement::builder(MeasurementOutcome::Pass)
///             .value(3.3.into())
///             .build(),
///     )
///     .add_attachment("console.log", Attachment::new(b"ok".to_vec(), mime::TEXT_PLAIN))
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub(crate) name: String,
    pub(crate) outcome: PhaseOutcome,
    pub(crate) start_time_millis: i64,
    pub(crate) end_time_millis: i64,
    pub(crate) measurements: BTreeMap<String, Measurement>,
    pub(crate) attachments: BTreeMap<String, Attachment>,
}

impl Phase {
    pub fn builder(name: &str) -> PhaseBuilder {
        PhaseBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attachments(&self) -> &BTreeMap<String, Attachment> {
        &self.attachments
    }
}

/// This structure builds a [`Phase`] object.
pub struct PhaseBuilder {
    name: String,
    outcome: PhaseOutcome,
    start_time_millis: i64,
    end_time_millis: i64,
    measurements: BTreeMap<String, Measurement>,
    attachments: BTreeMap<String, Attachment>,
}

impl PhaseBuilder {
    fn new(name: &str) -> Self {
        PhaseBuilder {
            name: name.to_owned(),
            outcome: PhaseOutcome::Pass,
            start_time_millis: 0,
            end_time_millis: 0,
            measurements: BTreeMap::new(),
            attachments: BTreeMap::new(),
        }
    }

    pub fn outcome(mut self, outcome: PhaseOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn timing(mut self, start_time_millis: i64, end_time_millis: i64) -> Self {
        self.start_time_millis = start_time_millis;
        self.end_time_millis = end_time_millis;
        self
    }

    pub fn add_measurement(mut self, name: &str, measurement: Measurement) -> Self {
        self.measurements.insert(name.to_owned(), measurement);
        self
    }

    pub fn add_attachment(mut self, name: &str, attachment: Attachment) -> Self {
        self.attachments.insert(name.to_owned(), attachment);
        self
    }

    pub fn build(self) -> Phase {
        Phase {
            name: self.name,
            outcome: self.outcome,
            start_time_millis: self.start_time_millis,
            end_time_millis: self.end_time_millis,
            measurements: self.measurements,
            attachments: self.attachments,
        }
    }
}

/// The complete result of one executed hardware test run.
///
/// # Examples
///
/// ```
/// # use htf_transfer::record::*;
/// let record = TestRecord::builder("station-1", Outcome::Pass)
///     .dut_id("DUT42")
///     .timing(1_700_000_000_000, 1_700_000_060_000)
///     .add_phase(Phase::builder("phase1").build())
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub(crate) dut_id: Option<String>,
    pub(crate) station_id: String,
    pub(crate) outcome: Outcome,
    pub(crate) start_time_millis: i64,
    pub(crate) end_time_millis: i64,
    pub(crate) metadata: BTreeMap<String, RecordValue>,
    pub(crate) phases: Vec<Phase>,
    pub(crate) code_info: Option<CodeInfo>,
    pub(crate) log_records: Vec<LogRecord>,
}

impl TestRecord {
    pub fn builder(station_id: &str, outcome: Outcome) -> TestRecordBuilder {
        TestRecordBuilder::new(station_id, outcome)
    }

    pub fn dut_id(&self) -> Option<&str> {
        self.dut_id.as_deref()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }
}

/// This structure builds a [`TestRecord`] object.
pub struct TestRecordBuilder {
    dut_id: Option<String>,
    station_id: String,
    outcome: Outcome,
    start_time_millis: i64,
    end_time_millis: i64,
    metadata: BTreeMap<String, RecordValue>,
    phases: Vec<Phase>,
    code_info: Option<CodeInfo>,
    log_records: Vec<LogRecord>,
}

impl TestRecordBuilder {
    fn new(station_id: &str, outcome: Outcome) -> Self {
        TestRecordBuilder {
            dut_id: None,
            station_id: station_id.to_owned(),
            outcome,
            start_time_millis: 0,
            end_time_millis: 0,
            metadata: BTreeMap::new(),
            phases: Vec::new(),
            code_info: None,
            log_records: Vec::new(),
        }
    }

    pub fn dut_id(mut self, value: &str) -> Self {
        self.dut_id = Some(value.to_owned());
        self
    }

    pub fn timing(mut self, start_time_millis: i64, end_time_millis: i64) -> Self {
        self.start_time_millis = start_time_millis;
        self.end_time_millis = end_time_millis;
        self
    }

    pub fn add_metadata(mut self, key: &str, value: RecordValue) -> Self {
        self.metadata.insert(key.to_owned(), value);
        self
    }

    pub fn add_phase(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn code_info(mut self, code_info: CodeInfo) -> Self {
        self.code_info = Some(code_info);
        self
    }

    pub fn add_log_record(mut self, log_record: LogRecord) -> Self {
        self.log_records.push(log_record);
        self
    }

    pub fn build(self) -> TestRecord {
        TestRecord {
            dut_id: self.dut_id,
            station_id: self.station_id,
            outcome: self.outcome,
            start_time_millis: self.start_time_millis,
            end_time_millis: self.end_time_millis,
            metadata: self.metadata,
            phases: self.phases,
            code_info: self.code_info,
            log_records: self.log_records,
        }
    }
}
