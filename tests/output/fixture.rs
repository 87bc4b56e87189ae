// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

use htf_transfer::record::{
    Attachment, Measurement, MeasurementOutcome, Outcome, Phase, TestRecord, UnitDescriptor,
};

/// Canonical record used across the integration tests: one phase with one
/// passing measurement and one small text attachment.
pub fn sample_record() -> TestRecord {
    TestRecord::builder("station-1", Outcome::Pass)
        .dut_id("DUT42")
        .timing(1_700_000_000_000, 1_700_000_060_000)
        .add_phase(
            Phase::builder("phase1")
                .add_measurement(
                    "M1",
                    Measurement::builder(MeasurementOutcome::Pass)
                        .value(1.0.into())
                        .units(UnitDescriptor::new("volt", "V"))
                        .build(),
                )
                .add_attachment("log.txt", Attachment::new(b"hello".to_vec(), mime::TEXT_PLAIN))
                .build(),
        )
        .build()
}

/// One-shot HTTP stub endpoint.
///
/// Accepts a single connection, replies with the canned status and body,
/// and hands back the captured request (start line, headers and body) on
/// the returned channel.
pub async fn stub_endpoint(
    status: u16,
    reply_body: &'static str,
) -> Result<(Url, oneshot::Receiver<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = Url::parse(&format!("http://{}", listener.local_addr()?))?;
    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);

            if let Some(headers_end) = find(&request, b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..headers_end]).to_string();
                let content_length = headers
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        if key.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);

                if request.len() >= headers_end + 4 + content_length {
                    break;
                }
            }
        }

        let reason = match status {
            200 => "OK",
            500 => "Internal Server Error",
            _ => "Error",
        };
        let reply = format!(
            "HTTP/1.1 {} {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            reason,
            reply_body.len(),
            reply_body
        );
        let _ = socket.write_all(reply.as_bytes()).await;
        let _ = socket.shutdown().await;

        let _ = sender.send(String::from_utf8_lossy(&request).to_string());
    });

    Ok((address, receiver))
}

/// Extracts the body of a captured HTTP request.
pub fn request_body(request: &str) -> &str {
    request
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or("")
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
