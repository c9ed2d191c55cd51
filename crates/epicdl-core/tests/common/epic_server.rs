//! Minimal HTTP/1.1 server imitating the EPIC feed and archive for integration tests.
//!
//! `/EPIC/api/...` answers with the configured list body; `/EPIC/archive/...`
//! answers with `ASSET:<file name>`. Archive requests naming a token in
//! `drop_tokens` get the connection closed without a response, tokens in
//! `stall_tokens` get no reply for `STALL`, and tokens in `truncate_tokens`
//! get a body shorter than its `Content-Length`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long a stalled request is held open before the server gives up.
pub const STALL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct EpicServerOptions {
    /// JSON served for the feed.
    pub list_body: String,
    /// Status line for the feed (e.g. "200 OK", "500 Internal Server Error").
    pub list_status: &'static str,
    /// Archive requests containing any of these tokens are dropped.
    pub drop_tokens: Vec<String>,
    /// Archive requests containing any of these tokens never get a reply.
    pub stall_tokens: Vec<String>,
    /// Archive requests containing any of these tokens get a short body.
    pub truncate_tokens: Vec<String>,
}

impl EpicServerOptions {
    pub fn with_tokens(tokens: &[&str]) -> Self {
        Self {
            list_body: list_json(tokens),
            list_status: "200 OK",
            drop_tokens: Vec::new(),
            stall_tokens: Vec::new(),
            truncate_tokens: Vec::new(),
        }
    }
}

/// Handle to a running server. Runs until the process exits.
pub struct EpicServer {
    /// API base, e.g. "http://127.0.0.1:12345/EPIC".
    pub base: String,
    requests: Arc<AtomicUsize>,
}

impl EpicServer {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Body every archive request for `file_name` receives.
pub fn asset_body(file_name: &str) -> Vec<u8> {
    format!("ASSET:{}", file_name).into_bytes()
}

/// Feed JSON with one entry per token.
pub fn list_json(tokens: &[&str]) -> String {
    let entries: Vec<String> = tokens
        .iter()
        .map(|t| {
            format!(
                r#"{{"identifier":"{id}","caption":"test","image":"{t}","version":"03",
"centroid_coordinates":{{"lat":1.5,"lon":-2.5}},
"dscovr_j2000_position":{{"x":1.0,"y":2.0,"z":3.0}},
"lunar_j2000_position":{{"x":4.0,"y":5.0,"z":6.0}},
"sun_j2000_position":{{"x":7.0,"y":8.0,"z":9.0}},
"attitude_quaternions":{{"q0":0.1,"q1":0.2,"q2":0.3,"q3":0.4}},
"date":"2020-09-23 00:13:03"}}"#,
                id = t.rsplit('_').next().unwrap_or(t),
                t = t
            )
        })
        .collect();
    format!("[{}]", entries.join(","))
}

pub fn start(opts: EpicServerOptions) -> EpicServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let opts = Arc::new(opts);
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                handle(stream, &opts)
            });
        }
    });
    EpicServer {
        base: format!("http://127.0.0.1:{}/EPIC", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, opts: &EpicServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let path = target.split('?').next().unwrap_or("");

    if !method.eq_ignore_ascii_case("GET") {
        respond(&mut stream, "405 Method Not Allowed", "text/plain", b"");
        return;
    }
    if path.starts_with("/EPIC/api/") {
        respond(
            &mut stream,
            opts.list_status,
            "application/json",
            opts.list_body.as_bytes(),
        );
        return;
    }
    if path.starts_with("/EPIC/archive/") {
        if matches_any(&opts.drop_tokens, path) {
            // connection closed with no reply
            return;
        }
        if matches_any(&opts.stall_tokens, path) {
            thread::sleep(STALL);
            return;
        }
        let file_name = path.rsplit('/').next().unwrap_or("");
        if matches_any(&opts.truncate_tokens, path) {
            let body = asset_body(file_name);
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len() + 100
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
            return;
        }
        respond(&mut stream, "200 OK", "image/png", &asset_body(file_name));
        return;
    }
    respond(&mut stream, "404 Not Found", "text/plain", b"");
}

fn matches_any(tokens: &[String], path: &str) -> bool {
    tokens.iter().any(|t| path.contains(t.as_str()))
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
