//! Static access-log corpora used across harnesses.

/// The reference line: every field present, no filters should drop it.
pub const LINE_REDIRECT: &str =
    r#"35.247.12.10 - - [13/May/2020:20:15:43 +0000] "GET / HTTP/1.1" 301 0 "-" "-""#;

/// A browser request with a real referrer and agent.
pub const LINE_BROWSER: &str = r#"203.0.113.5 - alice [13/May/2020:20:16:02 +0200] "GET /blog/post?id=4 HTTP/2.0" 200 5123 "https://example.org/index.html" "Mozilla/5.0 (X11; Linux x86_64; rv:76.0) Gecko/20100101 Firefox/76.0""#;

/// A scripted client the agent filter knows about.
pub const LINE_PYTHON: &str = r#"198.51.100.23 - - [13/May/2020:20:17:11 +0000] "GET /robots.txt HTTP/1.1" 404 153 "-" "python-requests/2.1""#;

/// An unknown protocol token; must still normalize (version 0).
pub const LINE_HTTP3: &str =
    r#"192.0.2.44 - - [13/May/2020:20:18:00 +0000] "GET /x HTTP/3.0" 200 10 "-" "curl/7.68.0""#;

/// A loopback request, hidden by the built-in deny list.
pub const LINE_LOOPBACK: &str = r#"127.0.0.1 - - [13/May/2020:20:19:30 +0000] "GET /healthz HTTP/1.0" 200 2 "-" "Mozilla/5.0""#;

/// Lines the normalizer accepts.
pub const CORPUS_VALID: &[&str] = &[
    LINE_REDIRECT,
    LINE_BROWSER,
    LINE_PYTHON,
    LINE_HTTP3,
    LINE_LOOPBACK,
];

/// Nine delimited fields, but a field the normalizer rejects.
pub const CORPUS_UNPARSEABLE: &[&str] = &[
    // status
    r#"10.0.0.1 - - [13/May/2020:20:15:43 +0000] "GET / HTTP/1.1" - 0 "-" "-""#,
    // request line with two tokens
    r#"10.0.0.1 - - [13/May/2020:20:15:43 +0000] "GET /" 200 0 "-" "-""#,
    // empty request line
    r#"10.0.0.1 - - [13/May/2020:20:15:43 +0000] "" 400 0 "-" "-""#,
    // ISO timestamp
    r#"10.0.0.1 - - [2020-05-13T20:15:43Z] "GET / HTTP/1.1" 200 0 "-" "-""#,
    // missing zone
    r#"10.0.0.1 - - [13/May/2020:20:15:43] "GET / HTTP/1.1" 200 0 "-" "-""#,
];

/// Lines that do not delimit exactly nine fields.
pub const CORPUS_MALFORMED: &[&str] = &[
    "",
    "garbage",
    // common format: no referrer / agent
    r#"10.0.0.1 - - [13/May/2020:20:15:43 +0000] "GET / HTTP/1.1" 200 0"#,
    // one extra trailing field
    r#"10.0.0.1 - - [13/May/2020:20:15:43 +0000] "GET / HTTP/1.1" 200 0 "-" "-" "extra""#,
    // unquoted agent with spaces
    r#"10.0.0.1 - - [13/May/2020:20:15:43 +0000] "GET / HTTP/1.1" 200 0 "-" Mozilla 5.0"#,
];

/// Join lines with `\n`, with a trailing newline.
pub fn log_text(lines: &[&str]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// `n` valid lines whose paths are `/0`, `/1`, … in order.
pub fn numbered_lines(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                r#"10.0.{}.{} - - [13/May/2020:20:15:43 +0000] "GET /{i} HTTP/1.1" 200 0 "-" "Mozilla/5.0""#,
                i / 256 % 256,
                i % 256
            )
        })
        .collect()
}
