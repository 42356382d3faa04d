//! End-to-end requests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `PicsmizeClient`
//! with the default ureq transport over real HTTP. Validates that request
//! building, raw response reassembly and interpretation agree with an
//! actual server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};

use mock_server::{REQUEST_ID_HEADER, VALID_API_KEY};
use picsmize::{ClientConfig, Error, PicsmizeClient, ProxyConfig, Reply};

/// Start the mock server on a background runtime and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// Read one request head plus its `Content-Length` body from a raw socket.
fn read_request(reader: &mut BufReader<TcpStream>) -> (String, Vec<u8>) {
    let mut head = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
            break;
        }
        head.push_str(&line);
    }
    let len = header_value(&head, "content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; len];
    reader.read_exact(&mut body).unwrap();
    (head, body)
}

fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().skip(1).find_map(|line| {
        let (n, v) = line.split_once(':')?;
        n.trim().eq_ignore_ascii_case(name).then(|| v.trim().to_string())
    })
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(VALID_API_KEY)
        .endpoint(format!("http://{addr}"))
        .timeout(10)
}

#[test]
fn fetch_and_decode_lifecycle() {
    let addr = start_server();

    // Step 1: successful fetch-mode request.
    let mut client =
        PicsmizeClient::new(config(addr).fetch("https://example.com/cat.png", "resize").decode_json());
    let reply = client
        .request(|result| {
            assert_eq!(result.get("input").unwrap()["process"], "resize");
            result.get("output").unwrap()["src"].as_str().unwrap().to_string()
        })
        .unwrap();
    let src = reply.handled().unwrap();
    assert!(src.starts_with("https://cdn.picsmize.test/"));

    // Step 2: headers of that response are available, in any case.
    assert_eq!(client.header("http_status_code").unwrap(), Some("200"));
    assert_eq!(
        client.header("Content-Type").unwrap(),
        client.header("content-type").unwrap()
    );
    let id = client.header(REQUEST_ID_HEADER).unwrap().unwrap().to_string();
    assert!(src.contains(&id));

    // Step 3: the API rejects a non-http image.
    let mut client =
        PicsmizeClient::new(config(addr).fetch("ftp://example.com/cat.png", "resize").decode_json());
    let err = client.request(|r| r).unwrap_err();
    assert!(matches!(err, Error::Api(ref m) if m == "bad image"), "{err:?}");
    assert_eq!(client.header("http_status_code").unwrap(), Some("422"));

    // Step 4: a wrong key comes back through the status contract.
    let mut cfg = config(addr).fetch("https://example.com/cat.png", "resize").decode_json();
    cfg.api_key = Some("wrong".to_string());
    let mut client = PicsmizeClient::new(cfg);
    let err = client.request(|r| r).unwrap_err();
    assert!(matches!(err, Error::Api(ref m) if m == "Invalid API key"), "{err:?}");
}

#[test]
fn raw_mode_returns_body() {
    let addr = start_server();

    let mut client = PicsmizeClient::new(config(addr));
    let reply = client.request(|_| ()).unwrap();
    let Reply::Raw { headers, body } = reply else {
        panic!("expected raw reply");
    };

    assert_eq!(headers.status_code(), Some(400));
    assert_eq!(headers.status_message(), Some("Bad Request"));
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Missing image input");
}

#[test]
fn missing_key_never_reaches_the_server() {
    let addr = start_server();

    let mut cfg = config(addr).decode_json();
    cfg.api_key = None;
    let mut client = PicsmizeClient::new(cfg);
    assert!(matches!(client.request(|r| r), Err(Error::MissingCredential)));
    assert!(matches!(client.header("content-type"), Err(Error::NoPriorRequest)));
}

#[test]
fn refused_connection_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = PicsmizeClient::new(config(addr).fetch("https://x/y.png", "resize").decode_json());
    let err = client.request(|r| r).unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{err:?}");
    assert!(client.last_headers().is_none());
}

#[test]
fn raw_mode_returns_bodies_over_ten_mib() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let image = vec![0x89u8; 11 * 1024 * 1024];
    let served = image.clone();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        read_request(&mut reader);
        let stream = reader.get_mut();
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\n\r\n",
            served.len()
        )
        .unwrap();
        stream.write_all(&served).unwrap();
    });

    let mut client = PicsmizeClient::new(config(addr).timeout(30));
    let (headers, body) = client.request(|_| ()).unwrap().into_raw().unwrap();
    assert_eq!(headers.get("content-type"), Some("image/png"));
    assert_eq!(body.len(), image.len());
    assert!(body == image);
}

#[test]
fn requests_travel_through_the_configured_proxy() {
    let proxy = TcpListener::bind("127.0.0.1:0").unwrap();
    let proxy_port = proxy.local_addr().unwrap().port();

    // Accepts either a CONNECT tunnel or an absolute-form request, and
    // reports the first request line, its proxy credentials and the line
    // that finally names the API path.
    let handle = std::thread::spawn(move || {
        let (stream, _) = proxy.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let (head, _) = read_request(&mut reader);
        let first_line = head.lines().next().unwrap_or_default().to_string();
        let auth = header_value(&head, "proxy-authorization");

        let target_line = if first_line.starts_with("CONNECT ") {
            reader
                .get_mut()
                .write_all(b"HTTP/1.1 200 Connection established\r\n\r\n")
                .unwrap();
            let (inner, _) = read_request(&mut reader);
            inner.lines().next().unwrap_or_default().to_string()
        } else {
            first_line.clone()
        };
        reader
            .get_mut()
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 15\r\n\r\n{\"status\":true}")
            .unwrap();
        (first_line, auth, target_line)
    });

    let proxy_config = ProxyConfig {
        host: "127.0.0.1".to_string(),
        port: Some(proxy_port),
        user: Some("user".to_string()),
        pass: Some("pass".to_string()),
    };
    let mut client = PicsmizeClient::new(
        ClientConfig::new("k")
            .endpoint("http://127.0.0.1:9")
            .fetch("https://x/y.png", "resize")
            .decode_json()
            .proxy(proxy_config)
            .timeout(10),
    );
    let reply = client.request(|result| result.is_success()).unwrap();
    assert_eq!(reply.handled(), Some(true));

    let (first_line, auth, target_line) = handle.join().unwrap();
    assert_eq!(auth.as_deref(), Some("Basic dXNlcjpwYXNz"));
    assert!(
        first_line.starts_with("CONNECT 127.0.0.1:9 ")
            || first_line.starts_with("POST http://127.0.0.1:9/image/process "),
        "{first_line}"
    );
    assert!(target_line.contains("/image/process"), "{target_line}");
}

#[test]
fn skipping_certificate_checks_still_reaches_plain_http() {
    let addr = start_server();

    let mut client = PicsmizeClient::new(
        config(addr)
            .fetch("https://example.com/cat.png", "crop")
            .decode_json()
            .accept_invalid_certs(true),
    );
    let reply = client.request(|result| result.is_success()).unwrap();
    assert_eq!(reply.handled(), Some(true));
}
