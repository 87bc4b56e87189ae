// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;
use std::time::Duration;

use url::Url;

/// Record fields skipped when flattening a record for path resolution.
/// These hold the large nested data; only scalar identifying fields are
/// needed to format a destination path.
pub const DEFAULT_PATH_EXCLUDE_KEYS: [&str; 3] = ["code_info", "phases", "log_records"];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The configuration repository for the transfer pipeline.
pub struct Config {
    pub(crate) server_address: Url,
    pub(crate) path_template: String,
    pub(crate) allow_non_finite: bool,
    pub(crate) path_exclude_keys: BTreeSet<String>,
    pub(crate) timeout: Option<Duration>,
}

impl Config {
    /// Creates a new [`ConfigBuilder`].
    ///
    /// # Examples
    /// ```rust
    /// # use htf_transfer::output::*;
    /// # use url::Url;
    /// let address = Url::parse("http://collector.local:46102").unwrap();
    /// let builder = Config::builder(address, "{dut_id}_{start_time_millis}_{outcome}.json");
    /// ```
    pub fn builder(server_address: Url, path_template: &str) -> ConfigBuilder {
        ConfigBuilder::new(server_address, path_template)
    }
}

/// The builder for the [`Config`] object.
pub struct ConfigBuilder {
    server_address: Url,
    path_template: String,
    allow_non_finite: bool,
    path_exclude_keys: BTreeSet<String>,
    timeout: Option<Duration>,
}

impl ConfigBuilder {
    fn new(server_address: Url, path_template: &str) -> Self {
        Self {
            server_address,
            path_template: path_template.to_owned(),
            // conform strictly to the JSON spec by default
            allow_non_finite: false,
            path_exclude_keys: DEFAULT_PATH_EXCLUDE_KEYS
                .iter()
                .map(|k| (*k).to_owned())
                .collect(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Permit NaN and infinite measurement values in the serialized
    /// payload. They are encoded as the explicit text tokens `"NaN"`,
    /// `"Infinity"` and `"-Infinity"`.
    pub fn allow_non_finite(mut self, value: bool) -> Self {
        self.allow_non_finite = value;
        self
    }

    /// Replace the set of top-level record fields excluded when resolving
    /// the destination path template.
    pub fn path_exclude_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.path_exclude_keys = keys.into_iter().collect();
        self
    }

    /// Set the request timeout for the delivery POST. Defaults to 30
    /// seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Remove the request timeout entirely. An unresponsive endpoint will
    /// then block the upload indefinitely; prefer a generous
    /// [`ConfigBuilder::timeout`] instead.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn build(self) -> Config {
        Config {
            server_address: self.server_address,
            path_template: self.path_template,
            allow_non_finite: self.allow_non_finite,
            path_exclude_keys: self.path_exclude_keys,
            timeout: self.timeout,
        }
    }
}
