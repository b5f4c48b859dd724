//! End-to-end tests: stub addon → `AddonWrapper` → parsed streams.

mod common;

use addon_wrapper::{AddonInfo, AddonWrapper, ErrorKind, StreamRequest, StreamType, WrapperConfig};
use serde_json::json;

fn wrapper(base_url: &str) -> AddonWrapper {
    AddonWrapper::new(
        AddonInfo::new("Stub", "stub-addon"),
        &format!("{base_url}/cfg/"),
        &WrapperConfig::default(),
        None,
    )
    .unwrap()
}

#[tokio::test]
async fn normalizes_mixed_stream_list() {
    let body = json!({
        "streams": [
            {
                "name": "Stub\n1080p",
                "description": "Movie.2020.1080p.BluRay.x264-GRP.mkv\n👤 15 💾 8.1 GB ⚙️ 1337x",
                "infoHash": "0123456789abcdef0123456789abcdef01234567",
                "fileIdx": 0
            },
            { "name": "Broken", "fileIdx": "first", "url": "https://cdn.example.com/broken" },
            {
                "name": "[PM+] Stub",
                "description": "Movie.2020.2160p.WEB-DL.mkv",
                "url": "https://cdn.example.com/dl/movie.mkv",
                "behaviorHints": { "notWebReady": true }
            }
        ]
    });
    let stub = common::serve_once("200 OK", body.to_string()).await;

    let result = wrapper(&stub.base_url)
        .get_parsed_streams(&StreamRequest::new("movie", "tt0000001"))
        .await;

    let request = stub.request.await.unwrap();
    assert!(request.starts_with("GET /cfg/stream/movie/tt0000001.json"));

    assert_eq!(result.streams.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Broken"));

    let p2p = &result.streams[0];
    assert_eq!(p2p.stream_type, StreamType::P2p);
    assert_eq!(p2p.torrent.seeders, Some(15));
    assert_eq!(p2p.torrent.file_index, Some(0));
    assert_eq!(p2p.indexers.as_deref(), Some("1337x"));
    assert_eq!(p2p.parsed.quality.as_deref(), Some("BluRay"));

    let debrid = &result.streams[1];
    assert_eq!(debrid.stream_type, StreamType::Debrid);
    assert_eq!(debrid.provider.as_ref().map(|p| p.id.as_str()), Some("premiumize"));
    assert_eq!(debrid.stream.behavior_hints.not_web_ready, Some(true));
    assert_eq!(debrid.addon.id, "stub-addon");
}

#[tokio::test]
async fn http_failure_yields_single_error() {
    let stub = common::serve_once("500 Internal Server Error", r#"{"err":"db down"}"#).await;

    let result = wrapper(&stub.base_url)
        .get_parsed_streams(&StreamRequest::new("movie", "tt1"))
        .await;

    assert!(result.streams.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Stub failed to respond: 500"));
    assert_eq!(result.fetch_error, Some(ErrorKind::HttpStatus));
}
