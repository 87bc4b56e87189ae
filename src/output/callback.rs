// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use crate::output::config::{Config, DEFAULT_PATH_EXCLUDE_KEYS};
use crate::output::convert::{convert, ConvertOptions};
use crate::output::error::TransferError;
use crate::output::inline::inline_attachments;
use crate::output::resolve::resolve_path;
use crate::output::upload::UploadClient;
use crate::record::TestRecord;

/// An output sink for finished test records.
///
/// The test-execution engine invokes every registered callback once per
/// completed record, in registration order, awaiting each to completion.
#[async_trait]
pub trait OutputCallback {
    async fn on_test_record(&self, record: &TestRecord) -> Result<(), TransferError>;
}

/// The file-transfer output callback.
///
/// Pipes a finished record through conversion, attachment inlining and
/// path resolution, then delivers the serialized payload to the collection
/// endpoint. One synchronous sequence runs per record; records completed
/// back-to-back are delivered strictly in completion order because each
/// upload is awaited before the next starts.
///
/// # Examples
///
/// ```no_run
/// # tokio_test::block_on(async {
/// # use htf_transfer::output::*;
/// # use htf_transfer::record::*;
/// # use url::Url;
/// let address = Url::parse("http://collector.local:46102").unwrap();
/// let api = FileTransferApi::new(
///     Config::builder(address, "{dut_id}_{start_time_millis}_{outcome}.json").build(),
/// )?;
///
/// let record = TestRecord::builder("station-1", Outcome::Pass)
///     .dut_id("DUT42")
///     .build();
/// api.upload(&record).await?;
/// # Ok::<(), TransferError>(())
/// # });
/// ```
pub struct FileTransferApi {
    config: Config,
    client: UploadClient,
}

impl FileTransferApi {
    pub fn new(config: Config) -> Result<Self, TransferError> {
        let client = UploadClient::new(&config.server_address, config.timeout)?;
        Ok(FileTransferApi { config, client })
    }

    /// Serializes a record to a single JSON text: full conversion with
    /// attachments inlined as base64.
    pub fn serialize_record(&self, record: &TestRecord) -> Result<String, TransferError> {
        let options = ConvertOptions {
            exclude_keys: BTreeSet::new(),
            allow_non_finite: self.config.allow_non_finite,
        };

        let mut tree = convert(record, &options)?;
        inline_attachments(&mut tree, record)?;

        Ok(serde_json::to_string(&tree)?)
    }

    /// Runs the whole pipeline for one record: resolve the destination
    /// path, serialize, deliver. Exactly one delivery attempt is made.
    pub async fn upload(&self, record: &TestRecord) -> Result<(), TransferError> {
        info!("uploading test record");

        let filepath = resolve_path(
            &self.config.path_template,
            record,
            &self.config.path_exclude_keys,
        )?;
        let payload = self.serialize_record(record)?;

        self.client.deliver(&filepath, &payload).await
    }
}

#[async_trait]
impl OutputCallback for FileTransferApi {
    async fn on_test_record(&self, record: &TestRecord) -> Result<(), TransferError> {
        self.upload(record).await
    }
}

/// Output callback that writes the serialized record to local disk
/// instead of uploading it.
///
/// The filename template is resolved exactly like the upload destination
/// path. The file is written pretty-printed, attachments inlined.
pub struct JsonFileSink {
    filename_template: String,
    exclude_keys: BTreeSet<String>,
}

impl JsonFileSink {
    pub fn new(filename_template: &str) -> Self {
        JsonFileSink {
            filename_template: filename_template.to_owned(),
            exclude_keys: DEFAULT_PATH_EXCLUDE_KEYS
                .iter()
                .map(|k| (*k).to_owned())
                .collect(),
        }
    }

    /// Writes the record and returns the resolved path.
    pub async fn save(&self, record: &TestRecord) -> Result<PathBuf, TransferError> {
        let filename = resolve_path(&self.filename_template, record, &self.exclude_keys)?;

        let mut tree = convert(record, &ConvertOptions::new())?;
        inline_attachments(&mut tree, record)?;
        let serialized = serde_json::to_string_pretty(&tree)?;

        fs::write(&filename, serialized).await?;
        Ok(PathBuf::from(filename))
    }
}

#[async_trait]
impl OutputCallback for JsonFileSink {
    async fn on_test_record(&self, record: &TestRecord) -> Result<(), TransferError> {
        self.save(record).await?;
        Ok(())
    }
}
