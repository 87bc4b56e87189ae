// (c) Meta Platforms, Inc. and affiliates.
//
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use anyhow::Result;
use serde_json::Value;
use url::Url;

use htf_transfer::output::{TransferError, UploadClient};

use super::fixture::{request_body, stub_endpoint};

#[tokio::test]
async fn test_deliver_succeeds_on_200() -> Result<()> {
    let (address, request) = stub_endpoint(200, "").await?;
    let client = UploadClient::new(&address, None)?;

    client.deliver("DUT42.json", "{}").await?;

    let captured = request.await?;
    let envelope: Value = serde_json::from_str(request_body(&captured))?;
    assert_eq!(envelope["filepath"], "DUT42.json");
    assert_eq!(envelope["newline"], "{}");

    Ok(())
}

#[tokio::test]
async fn test_deliver_sends_expected_headers() -> Result<()> {
    let (address, request) = stub_endpoint(200, "").await?;
    let client = UploadClient::new(&address, None)?;

    client.deliver("x.json", "{}").await?;

    let captured = request.await?;
    let headers = captured.to_ascii_lowercase();
    assert!(headers.starts_with("post /api/logging/logadditionaldataraw http/1.1\r\n"));
    assert!(headers.contains("content-type: application/json"));
    assert!(headers.contains("accept: */*"));
    assert!(headers.contains("user-agent: htffiletransferapiclient/"));

    Ok(())
}

#[tokio::test]
async fn test_deliver_fails_on_500_with_body_detail() -> Result<()> {
    let (address, _request) = stub_endpoint(500, "server error").await?;
    let client = UploadClient::new(&address, None)?;

    let actual = client.deliver("x.json", "{}").await;

    match actual {
        Err(TransferError::UploadRejected { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("server error"));
        }
        other => panic!("expected UploadRejected, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_deliver_fails_on_non_200_success_status() -> Result<()> {
    // 204 is a success class status but not the endpoint's success signal
    let (address, _request) = stub_endpoint(204, "").await?;
    let client = UploadClient::new(&address, None)?;

    let actual = client.deliver("x.json", "{}").await;
    assert!(matches!(
        actual,
        Err(TransferError::UploadRejected { status: 204, .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_deliver_surfaces_transport_failure() -> Result<()> {
    // bind then drop to get an address nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = Url::parse(&format!("http://{}", listener.local_addr()?))?;
    drop(listener);

    let client = UploadClient::new(&address, None)?;
    let actual = client.deliver("x.json", "{}").await;

    assert!(matches!(actual, Err(TransferError::Transport(_))));
    Ok(())
}
