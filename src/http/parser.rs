use crate::http::request::{split_target, Method, Request};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use thiserror::Error;

/// Largest header section accepted before the blank line shows up.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request line needs at least a method and a target")]
    InvalidRequest,
    #[error("unknown method")]
    InvalidMethod,
    #[error("Content-Length is not a number or is declared twice with different values")]
    InvalidContentLength,
    #[error("body of {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { size: usize, limit: usize },
    #[error("header section exceeds 64 KiB")]
    HeadersTooLarge,
    #[error("request is incomplete")]
    Incomplete,
}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied. The body is
/// read by `Content-Length` only; until that many bytes are buffered the
/// result is [`ParseError::Incomplete`]. A declared length above `max_body`
/// is rejected as soon as the headers are complete.
pub fn parse_http_request(buf: &[u8], max_body: usize) -> Result<(Request, usize), ParseError> {
    // Look for header/body separator
    let Some(headers_end) = find_headers_end(buf) else {
        if buf.len() > MAX_HEADER_BYTES {
            return Err(ParseError::HeadersTooLarge);
        }
        return Err(ParseError::Incomplete);
    };
    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let headers_str = std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = headers_str.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut parts = request_line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().unwrap_or("HTTP/1.1");

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    // Headers; lines without ':' carry nothing we need and are skipped
    let mut headers = HashMap::new();
    let mut declared_length: Option<usize> = None;

    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if key.eq_ignore_ascii_case("Content-Length") {
            let length = value
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength)?;
            if declared_length.is_some_and(|previous| previous != length) {
                return Err(ParseError::InvalidContentLength);
            }
            declared_length = Some(length);
        }

        headers.insert(key.to_string(), value.to_string());
    }

    // Body
    let content_length = declared_length.unwrap_or(0);

    if content_length > max_body {
        return Err(ParseError::BodyTooLarge {
            size: content_length,
            limit: max_body,
        });
    }

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let body = body_bytes[..content_length].to_vec();
    let (path, query) = split_target(target);

    let request = Request {
        method,
        path: path.to_string(),
        query: query.map(parse_query).unwrap_or_default(),
        version: version.to_string(),
        headers,
        body,
    };

    let total_consumed = headers_end + 4 + content_length;
    Ok((request, total_consumed))
}

/// Parses a query string (without the leading `?`) into a map.
///
/// This is deliberately lenient:
/// - pairs without `=` or with an empty key are dropped
/// - only the first `=` separates key from value, so `a=b=c` gives `a: "b=c"`
/// - `a=` keeps an empty value
/// - repeated keys keep the last value
/// - keys and values are percent-decoded, `+` becomes a space
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        params.insert(percent_decode(key), percent_decode(value));
    }

    params
}

/// Decodes a query or form component: `+` is a space, `%XX` escapes are
/// decoded, malformed escapes are kept verbatim and invalid UTF-8 is
/// replaced.
pub fn percent_decode(input: &str) -> String {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
