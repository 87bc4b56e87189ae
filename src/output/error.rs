// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Failures raised by the record transfer pipeline.
///
/// All variants propagate synchronously to the caller of the pipeline;
/// nothing is retried or suppressed internally. A failed upload leaves no
/// partial state behind, the only external resource is the HTTP connection
/// which the client layer closes regardless of outcome.
#[derive(Debug, Error)]
pub enum TransferError {
    /// A NaN or infinite float was encountered while strict JSON output
    /// was requested. Aborts the whole pipeline for the record.
    #[error("non-finite number in field `{field}` is not representable in strict JSON")]
    NonFiniteNumber { field: String },

    /// The converted tree no longer aligns with the source record. This is
    /// a caller bug, not a runtime condition to retry.
    #[error("converted tree diverged from source record: {0}")]
    StructuralMismatch(String),

    /// A path template referenced a field absent from the flattened record.
    #[error("path template references unknown field `{field}`")]
    UnknownTemplateField { field: String },

    /// A path template could not be parsed, e.g. an unterminated `{`.
    #[error("malformed path template: {0}")]
    MalformedTemplate(String),

    /// The endpoint answered with a status other than 200 OK.
    #[error("upload rejected with HTTP {status}: {body}")]
    UploadRejected { status: u16, body: String },

    /// Transport-level delivery failure: connection refused, timeout,
    /// DNS failure.
    #[error("upload transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid endpoint address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
