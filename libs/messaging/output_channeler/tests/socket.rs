//! Socket outputters delivering through the channeler to real listeners

mod common;

use output_channeler::test_utils::test_record;
use output_channeler::{
    ChannelerState, OutputChanneler, OutputError, Outputter, OutputterConfig, RecordFormat,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use types::SyslogMsg;

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Address of a local port nothing is listening on
async fn unused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().to_string()
}

#[tokio::test]
async fn test_tcp_outputter_delivers_rfc3164_lines() {
    common::init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let reader = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let mut received = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            received.push(line);
        }
        received
    });

    let outputter = OutputterConfig::tcp(address).build().unwrap();
    let channeler = OutputChanneler::new(outputter);
    for content in ["alpha", "beta", "gamma"] {
        channeler.send(test_record(content)).await.unwrap();
    }
    channeler.stop().await.unwrap();
    channeler.join().await.unwrap();

    let lines = tokio::time::timeout(TEST_TIMEOUT, reader)
        .await
        .expect("reader timed out")
        .unwrap();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("test-host test[42]: alpha"));
    assert!(lines[1].ends_with("test-host test[42]: beta"));
    assert!(lines[2].ends_with("test-host test[42]: gamma"));
}

#[tokio::test]
async fn test_tcp_outputter_connect_refused() {
    let mut config = OutputterConfig::tcp(unused_address().await);
    config.connect_timeout_secs = 1;
    let mut outputter = config.build().unwrap();

    let result = outputter.connect().await;
    assert!(result.is_err());
    assert!(result.unwrap_err().is_connection_error());
    assert!(!outputter.is_connected());
}

#[tokio::test]
async fn test_channeler_connects_once_listener_appears() {
    common::init_tracing();
    let address = unused_address().await;

    let mut config = OutputterConfig::tcp(address.clone());
    config.retry_interval_secs = 1;
    let channeler = OutputChanneler::new(config.build().unwrap());
    let metrics = channeler.metrics();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(channeler.state(), ChannelerState::Connecting);

    let listener = TcpListener::bind(&address).await.unwrap();
    let reader = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        lines.next_line().await.unwrap()
    });

    tokio::time::timeout(TEST_TIMEOUT, channeler.send(test_record("late sink")))
        .await
        .expect("send timed out")
        .unwrap();

    let line = tokio::time::timeout(TEST_TIMEOUT, reader)
        .await
        .expect("reader timed out")
        .unwrap()
        .expect("connection closed before a line arrived");
    assert!(line.ends_with("late sink"));
    assert!(metrics.snapshot().failed_connects >= 1);

    channeler.stop().await.unwrap();
    channeler.join().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_unix_outputter_delivers_json_lines() {
    use tokio::net::UnixListener;

    common::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sink.sock");
    let listener = UnixListener::bind(&path).unwrap();

    let reader = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let mut received = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            received.push(line);
        }
        received
    });

    let mut config = OutputterConfig::unix(path.to_string_lossy());
    config.format = RecordFormat::Json;
    let channeler = OutputChanneler::new(config.build().unwrap());
    channeler.send(test_record("structured")).await.unwrap();
    channeler.stop().await.unwrap();
    channeler.join().await.unwrap();

    let lines = tokio::time::timeout(TEST_TIMEOUT, reader)
        .await
        .expect("reader timed out")
        .unwrap();
    assert_eq!(lines.len(), 1);

    let record: SyslogMsg = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(record.content, "structured");
    assert_eq!(record.host, "test-host");
}

#[cfg(unix)]
#[tokio::test]
async fn test_unix_outputter_missing_socket() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.sock");
    let mut outputter = OutputterConfig::unix(path.to_string_lossy())
        .build()
        .unwrap();

    assert!(matches!(
        outputter.connect().await,
        Err(OutputError::ConnectionFailed(_))
    ));
}
