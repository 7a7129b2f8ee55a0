use std::time::Duration;

use intake_spec::{AnswerSet, GatewayError, PersistenceGateway, to_flat_record};
use intake_store::{RestGateway, insert_endpoint};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves a single HTTP request with a canned response and returns the raw request.
async fn one_shot_server(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let read = socket.read(&mut buf).await.expect("read");
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
            let text = String::from_utf8_lossy(&request);
            if let Some(split) = text.find("\r\n\r\n") {
                let length = text[..split]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= split + 4 + length {
                    break;
                }
            }
        }
        let response = format!(
            "{status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write");
        String::from_utf8_lossy(&request).into_owned()
    });
    (format!("http://{addr}"), handle)
}

fn sample_record() -> intake_spec::FlatRecord {
    to_flat_record(&AnswerSet {
        name: "Asha".into(),
        visit_hours: vec!["morning".into()],
        ..AnswerSet::default()
    })
}

#[test]
fn endpoint_keeps_base_path() {
    let url = insert_endpoint("https://db.example.org/", "questionnaire_responses").expect("url");
    assert_eq!(url.as_str(), "https://db.example.org/rest/v1/questionnaire_responses");
    let url = insert_endpoint("https://proxy.example.org/supabase", "answers").expect("url");
    assert_eq!(url.as_str(), "https://proxy.example.org/supabase/rest/v1/answers");
    assert!(insert_endpoint("ftp://db.example.org", "answers").is_err());
}

#[tokio::test]
async fn posts_single_row_with_auth_headers() {
    let (base, server) = one_shot_server("HTTP/1.1 201 Created", "").await;
    let gateway = RestGateway::new(&base, "questionnaire_responses", "anon-key", Duration::from_secs(5))
        .expect("gateway");

    gateway.insert(&sample_record()).await.expect("insert");

    let request = server.await.expect("server");
    let lowered = request.to_ascii_lowercase();
    assert!(request.starts_with("POST /rest/v1/questionnaire_responses "));
    assert!(lowered.contains("apikey: anon-key"));
    assert!(lowered.contains("authorization: bearer anon-key"));
    assert!(lowered.contains("prefer: return=minimal"));

    let body = &request[request.find("\r\n\r\n").expect("body") + 4..];
    let rows: serde_json::Value = serde_json::from_str(body).expect("json body");
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["name"], "Asha");
    assert_eq!(rows[0]["visit_hours"], r#"["morning"]"#);
}

#[tokio::test]
async fn error_status_is_rejected_with_body() {
    let (base, server) = one_shot_server(
        "HTTP/1.1 400 Bad Request",
        r#"{"message":"column missing"}"#,
    )
    .await;
    let gateway =
        RestGateway::new(&base, "questionnaire_responses", "anon-key", Duration::from_secs(5))
            .expect("gateway");

    let err = gateway.insert(&sample_record()).await.expect_err("rejected");
    server.await.expect("server");
    match err {
        GatewayError::Rejected(reason) => assert!(reason.contains("column missing")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let gateway = RestGateway::new(
        &format!("http://{addr}"),
        "questionnaire_responses",
        "anon-key",
        Duration::from_secs(2),
    )
    .expect("gateway");
    let err = gateway.insert(&sample_record()).await.expect_err("unreachable");
    assert!(matches!(err, GatewayError::Unavailable(_)));
}
