// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::output::error::TransferError;

/// Fixed path suffix of the collection endpoint, appended to the
/// configured server address.
pub const UPLOAD_PATH: &str = "api/logging/LogAdditionalDataRaw";

const USER_AGENT: &str = concat!("HtfFileTransferApiClient/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct Envelope<'a> {
    filepath: &'a str,
    newline: &'a str,
}

/// HTTP client for the file-transfer collection endpoint.
///
/// Performs exactly one POST per delivery; retrying is left to the caller.
pub struct UploadClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl UploadClient {
    /// Builds a client for `server_address`, e.g.
    /// `http://collector.local:46102`. A `timeout` of `None` leaves the
    /// request unbounded.
    pub fn new(server_address: &Url, timeout: Option<Duration>) -> Result<Self, TransferError> {
        let endpoint = server_address.join(UPLOAD_PATH)?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(UploadClient {
            endpoint,
            client: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Delivers one serialized record payload under the given destination
    /// path.
    ///
    /// A 200 response is the sole success signal. Any other status fails
    /// with [`TransferError::UploadRejected`] carrying the response body;
    /// transport failures surface as [`TransferError::Transport`]. Either
    /// way the attempt is atomic, there is no partial-success state.
    pub async fn deliver(&self, filepath: &str, payload: &str) -> Result<(), TransferError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(header::ACCEPT, "*/*")
            .json(&Envelope {
                filepath,
                newline: payload,
            })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "upload failed: {}", body);
            return Err(TransferError::UploadRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
