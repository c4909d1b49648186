use leaflens_cli::capture::ImageHandle;
use leaflens_cli::search::{BookSearch, ErrorKind, HttpSearchClient, SearchError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// A request as seen by the test server.
#[derive(Debug)]
struct CapturedRequest {
    request_line: String,
    /// Header block, lowercased
    headers: String,
    body: Vec<u8>,
}

impl CapturedRequest {
    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Test server that answers exactly one request with a canned response.
struct TestServer {
    addr: std::net::SocketAddr,
    captured: oneshot::Receiver<CapturedRequest>,
}

impl TestServer {
    async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                let reason = if status < 400 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {} {}\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\
                     \r\n\
                     {}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                let _ = tx.send(request);
            }
        });

        Self { addr, captured: rx }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    async fn request(self) -> CapturedRequest {
        self.captured.await.expect("server saw no request")
    }
}

async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers ended");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers = lines.collect::<Vec<_>>().join("\n").to_lowercase();

    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let body_start = header_end + 4;

    loop {
        let have = buf.len() - body_start;
        let done = match content_length {
            Some(len) => have >= len,
            // Chunked: the terminating chunk ends the body
            None => buf.ends_with(b"0\r\n\r\n"),
        };
        if done {
            break;
        }
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        request_line,
        headers,
        body: buf[body_start..].to_vec(),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[tokio::test]
async fn test_text_search_posts_json() {
    let server = TestServer::start(
        200,
        r#"{"status":"success","title":"Moby Dick","author":"Herman Melville"}"#,
    )
    .await;
    let client = HttpSearchClient::new(server.url());

    let result = client.search_by_text("the whale swam").await.unwrap();
    assert_eq!(result.title, "Moby Dick");
    assert_eq!(
        result.field("author").and_then(|v| v.as_str()),
        Some("Herman Melville")
    );

    let request = server.request().await;
    assert!(request.request_line.starts_with("POST /text-search "));
    assert!(request.headers.contains("content-type: application/json"));
    assert_eq!(request.body_text(), r#"{"text":"the whale swam"}"#);
}

#[tokio::test]
async fn test_image_search_posts_multipart_file() {
    let server = TestServer::start(
        200,
        r#"{"status":"success","book":"moby_dick.txt","confidence":0.41}"#,
    )
    .await;
    let client = HttpSearchClient::new(format!("{}/", server.url()));

    let image = ImageHandle::from_bytes("page.png", b"PAGEBYTES".to_vec());
    let result = client.search_by_image(image).await.unwrap();
    assert_eq!(result.title, "moby_dick.txt");
    assert_eq!(result.display_text(), "Book Name: Moby Dick");

    let request = server.request().await;
    assert!(request.request_line.starts_with("POST /image-search "));
    assert!(request.headers.contains("multipart/form-data"));

    let body = request.body_text();
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="page.png""#));
    assert!(body.to_lowercase().contains("content-type: image/png"));
    assert!(body.contains("PAGEBYTES"));
}

#[tokio::test]
async fn test_non_success_status_is_service_error() {
    let server = TestServer::start(500, r#"{"detail":"model not loaded"}"#).await;
    let client = HttpSearchClient::new(server.url());

    let err = client.search_by_text("anything").await.unwrap_err();
    match &err {
        SearchError::Service { status, message } => {
            assert_eq!(*status, 500);
            assert!(message.contains("model not loaded"));
        }
        other => panic!("expected service error, got {:?}", other),
    }
    assert_eq!(err.kind(), ErrorKind::Service);
}

#[tokio::test]
async fn test_fail_status_is_no_match() {
    let server = TestServer::start(200, r#"{"status":"fail","reason":"Low confidence"}"#).await;
    let client = HttpSearchClient::new(server.url());

    let err = client.search_by_text("not a real book").await.unwrap_err();
    assert_eq!(err, SearchError::NoMatch("Low confidence".to_string()));
    assert_eq!(err.user_message(), "Low confidence");
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = TestServer::start(200, "<html>surprise</html>").await;
    let client = HttpSearchClient::new(server.url());

    let err = client.search_by_text("hello").await.unwrap_err();
    assert!(matches!(err, SearchError::Malformed(_)));
    assert_eq!(err.kind(), ErrorKind::Service);
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    // Grab a free port, then close it again
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpSearchClient::new(format!("http://{}", addr));
    let err = client.search_by_text("hello").await.unwrap_err();

    assert!(matches!(err, SearchError::Network(_)));
    assert_eq!(err.kind(), ErrorKind::Network);
}
