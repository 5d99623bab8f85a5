use loadgen_common::LoadgenError;
use loadgen_transport::{ChatTransport, HttpTransport};

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::new(None).unwrap();
    let url = format!("http://{}/v1/chat/completions", addr);
    let err = transport
        .post_json(&url, &serde_json::json!({"model": "m"}))
        .await
        .unwrap_err();
    match err {
        LoadgenError::Transport(msg) => assert!(!msg.is_empty()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn client_builds_with_and_without_timeout() {
    assert!(HttpTransport::new(None).is_ok());
    assert!(HttpTransport::new(Some(std::time::Duration::from_secs(5))).is_ok());
}
