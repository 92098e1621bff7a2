//! Minimal HTTP/1.1 server for renderer tests.
//!
//! Routes:
//! - `/page`: 200 with a complete HTML page
//! - `/redirect`: 302 to `/page`
//! - `/throttled-once`: 429 "Too Many Requests" on the first hit, then a page
//! - `/headers`: 200 echoing the request head (request line and headers)
//! - anything else: 404

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub const PAGE_BODY: &str = "<html><body><h1>hello</h1></body></html>";
pub const THROTTLED_BODY: &str = "<html><body>429 Too Many Requests</body></html>";

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let throttled_hits = Arc::new(AtomicUsize::new(0));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let hits = Arc::clone(&throttled_hits);
            thread::spawn(move || handle(stream, &hits));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: std::net::TcpStream, throttled_hits: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/");

    let response = match path {
        "/page" => ok(PAGE_BODY),
        "/redirect" => {
            "HTTP/1.1 302 Found\r\nLocation: /page\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string()
        }
        "/throttled-once" => {
            if throttled_hits.fetch_add(1, Ordering::SeqCst) == 0 {
                respond("429 Too Many Requests", THROTTLED_BODY)
            } else {
                ok(PAGE_BODY)
            }
        }
        "/headers" => ok(request.split("\r\n\r\n").next().unwrap_or("")),
        _ => respond("404 Not Found", "<html>not found</html>"),
    };
    let _ = stream.write_all(response.as_bytes());
}

fn ok(body: &str) -> String {
    respond("200 OK", body)
}

fn respond(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )
}
