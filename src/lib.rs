// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Serialization and remote delivery of hardware test records.
//!
//! When the test-execution engine completes a run it invokes an output
//! callback with the finished [`record::TestRecord`]. The
//! [`output`] module turns that record into a JSON-safe tree, inlines
//! binary attachments as base64 text, resolves a destination path from
//! record fields and delivers the payload to a file-transfer collection
//! endpoint over HTTP.

pub mod output;
pub mod record;
