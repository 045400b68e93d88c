//! Tests for wind texture and coastline loading.

use std::path::PathBuf;
use std::time::Duration;

use test_utils::{ramp_texture, temp_file_with, SAMPLE_COASTLINE_GEOJSON};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use windmap::{Source, WindTextureLoader};
use windmap_common::LoadError;

// ============================================================================
// Helper functions
// ============================================================================

fn loader() -> WindTextureLoader {
    WindTextureLoader::new(Duration::from_secs(5)).expect("HTTP client")
}

/// Serve one canned HTTP response on a loopback port. Returns its URL.
async fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let head = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status_line,
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{}/wind.png", addr)
}

// ============================================================================
// Files
// ============================================================================

#[tokio::test]
async fn test_load_png_file() {
    let fixture = ramp_texture(6, 4);
    let file = temp_file_with(".png", &fixture.to_png());

    let buffer = loader()
        .load(&Source::File(file.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(buffer.width(), 6);
    assert_eq!(buffer.height(), 4);
    assert_eq!(buffer.as_bytes(), fixture.pixels.as_slice());
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let source = Source::File(PathBuf::from("/nonexistent/wind.png"));
    let err = loader().load(&source).await.unwrap_err();
    match err {
        LoadError::Io { path, .. } => assert_eq!(path, "/nonexistent/wind.png"),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_image_is_decode_error() {
    let file = temp_file_with(".png", b"definitely not a png");
    let err = loader()
        .load(&Source::File(file.path().to_path_buf()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }), "{:?}", err);
}

#[test]
fn test_load_coastline_text() {
    let file = temp_file_with(".geojson", SAMPLE_COASTLINE_GEOJSON.as_bytes());
    let text = tokio_test::block_on(loader().load_text(&Source::File(file.path().to_path_buf())))
        .unwrap();
    assert_eq!(text, SAMPLE_COASTLINE_GEOJSON);
}

#[tokio::test]
async fn test_invalid_utf8_text_is_decode_error() {
    let file = temp_file_with(".geojson", &[0xff, 0xfe, 0x00]);
    let err = loader()
        .load_text(&Source::File(file.path().to_path_buf()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }));
}

// ============================================================================
// HTTP
// ============================================================================

#[tokio::test]
async fn test_load_png_over_http() {
    let fixture = ramp_texture(3, 5);
    let url = serve_once("200 OK", fixture.to_png()).await;

    let buffer = loader().load(&Source::parse(&url)).await.unwrap();
    assert_eq!((buffer.width(), buffer.height()), (3, 5));
    assert_eq!(buffer.as_bytes(), fixture.pixels.as_slice());
}

#[tokio::test]
async fn test_http_error_status() {
    let url = serve_once("404 Not Found", Vec::new()).await;

    let err = loader().load(&Source::parse(&url)).await.unwrap_err();
    match err {
        LoadError::HttpStatus { status, url: failed } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let url = format!("http://{}/wind.png", addr);

    let err = loader().load(&Source::parse(&url)).await.unwrap_err();
    assert!(matches!(err, LoadError::Transport { .. }), "{:?}", err);
}
