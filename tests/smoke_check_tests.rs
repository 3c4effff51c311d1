// tests/smoke_check_tests.rs
use rate_smoke_check::health::{
    Check, CheckResult, HealthCheck, ReqwestClient, Target, TransportError,
};
use rate_smoke_check::report::Summary;
use rate_smoke_check::runner::{RunOptions, Runner};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

fn target_for(server: &mockito::Server) -> Target {
    Target::parse(&format!("{}/api/rate", server.url())).unwrap()
}

fn health_check(timeout: Duration) -> (HealthCheck<ReqwestClient>, Arc<Summary>) {
    let summary = Arc::new(Summary::new());
    let client = ReqwestClient::new(timeout).unwrap();
    (
        HealthCheck::new(client, Check::status_is(200), summary.clone()),
        summary,
    )
}

#[tokio::test]
async fn test_status_200_with_empty_body_passes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/rate")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let (hc, summary) = health_check(Duration::from_secs(5));

    let result = hc.run(&target_for(&server)).await.unwrap();

    assert_eq!(result, CheckResult { label: "is status 200".into(), pass: true });
    assert_eq!(summary.snapshot()[0].passes, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_200_statuses_fail_the_check() {
    for status in [404, 500, 503] {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/rate")
            .with_status(status)
            .with_body("unavailable")
            .create_async()
            .await;
        let (hc, _summary) = health_check(Duration::from_secs(5));

        let result = hc.run(&target_for(&server)).await.unwrap();

        assert_eq!(
            result,
            CheckResult { label: "is status 200".into(), pass: false },
            "status {}",
            status
        );
    }
}

#[tokio::test]
async fn test_repeated_runs_agree() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/rate")
        .with_status(200)
        .with_body(r#"{"rate":41.5}"#)
        .expect(2)
        .create_async()
        .await;
    let (hc, _summary) = health_check(Duration::from_secs(5));
    let target = target_for(&server);

    let first = hc.run(&target).await.unwrap();
    let second = hc.run(&target).await.unwrap();

    assert_eq!(first.pass, second.pass);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_error() {
    // Grab a free port and release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let target = Target::parse(&format!("http://127.0.0.1:{}/api/rate", port)).unwrap();
    let (hc, summary) = health_check(Duration::from_secs(5));

    let err = hc.run(&target).await.unwrap_err();

    assert!(matches!(err, TransportError::Connect { .. }), "got {:?}", err);
    assert!(summary.is_empty());
}

#[tokio::test]
async fn test_unresolvable_host_is_a_transport_error() {
    let target = Target::parse("http://gw.invalid:8080/api/rate").unwrap();
    let (hc, summary) = health_check(Duration::from_secs(5));

    let err = hc.run(&target).await.unwrap_err();

    assert!(matches!(err, TransportError::Connect { .. }), "got {:?}", err);
    assert!(summary.is_empty());
}

#[tokio::test]
async fn test_truncated_body_is_a_request_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Promise 100 bytes, send 5, hang up
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).await;
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
            .await
            .unwrap();
        stream.shutdown().await.unwrap();
    });
    let target = Target::parse(&format!("http://{}/api/rate", addr)).unwrap();
    let (hc, summary) = health_check(Duration::from_secs(5));

    let err = hc.run(&target).await.unwrap_err();

    assert!(matches!(err, TransportError::Request { .. }), "got {:?}", err);
    assert_eq!(err.kind(), "request");
    assert!(summary.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept and hold connections open without ever answering
    let hold = tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
        }
    });
    let target = Target::parse(&format!("http://{}/api/rate", addr)).unwrap();
    let (hc, _summary) = health_check(Duration::from_millis(200));

    let err = hc.run(&target).await.unwrap_err();

    assert!(matches!(err, TransportError::Timeout { .. }), "got {:?}", err);
    hold.abort();
}

#[tokio::test]
async fn test_runner_against_live_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/rate")
        .with_status(200)
        .expect(6)
        .create_async()
        .await;
    let summary = Arc::new(Summary::new());
    let client = ReqwestClient::new(Duration::from_secs(5)).unwrap();
    let hc = Arc::new(HealthCheck::new(client, Check::status_is(200), summary.clone()));
    let runner = Runner::new(
        hc,
        target_for(&server),
        RunOptions { vus: 2, iterations: 6 },
        summary.clone(),
        summary,
    );
    let (_tx, rx) = watch::channel(false);

    let run = runner.run(rx).await;

    assert_eq!(run.passed, 6);
    assert!(run.is_success());
    mock.assert_async().await;
}
