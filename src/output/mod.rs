// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod callback;
mod config;
mod convert;
mod error;
mod inline;
mod resolve;
mod upload;

pub use callback::*;
pub use config::*;
pub use convert::*;
pub use error::*;
pub use inline::*;
pub use resolve::*;
pub use upload::*;

pub use serde_json::Value;
