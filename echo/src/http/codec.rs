use bytes::{Bytes, BytesMut};
use http::{header::CONTENT_TYPE, Method};
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    error::{RequestError, ResponseError},
    http::{CONTENT_LENGTH_PREFIX, LINE_DELIMITER},
};

use super::{response::write_response, Request, Response};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Codec for a connection that carries exactly one request and one response.
#[derive(Debug, Default)]
pub struct ConnectionCodec;

impl Decoder for ConnectionCodec {
    type Item = Request;

    type Error = RequestError;

    /// Parses everything buffered so far as a single request. Nothing is
    /// ever left in `src` and no further read is waited for.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let raw = src.split();
        parse(&raw).map(Some)
    }
}

impl Encoder<Response> for ConnectionCodec {
    type Error = ResponseError;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let content_type = match response.headers().get(CONTENT_TYPE) {
            Some(value) => value.to_str()?,
            None => DEFAULT_CONTENT_TYPE,
        };

        write_response(dst, response.status(), content_type, response.body());
        Ok(())
    }
}

/// Parses a raw request.
///
/// Only `Content-Length` is looked at among the headers. When it is
/// positive the single line after the blank line becomes the body, cut
/// down to the declared length. Later lines are dropped.
pub fn parse(raw: &[u8]) -> Result<Request, RequestError> {
    // the buffer is read as a C string
    let mut buf = match memchr::memchr(0, raw) {
        Some(nul) => &raw[..nul],
        None => raw,
    };
    let mut request = Request::default();

    // request line = "METHOD PATH VERSION", version ignored
    if let Some(line) = split_line(&mut buf) {
        let mut tokens = line
            .split(u8::is_ascii_whitespace)
            .filter(|token| !token.is_empty());

        request.method = tokens
            .next()
            .and_then(|method| Method::from_bytes(method).ok());
        request.path = tokens
            .next()
            .map(|path| String::from_utf8_lossy(path).into_owned())
            .unwrap_or_default();
    }

    let mut content_length = 0;
    while let Some(header) = split_line(&mut buf) {
        if header.is_empty() || header == b"\r" {
            break;
        }

        if let Some(value) = header.strip_prefix(CONTENT_LENGTH_PREFIX) {
            content_length = parse_content_length(value)?;
        }
    }

    if content_length > 0 {
        request.body = split_line(&mut buf).map(|line| {
            let line = trim_cr(line);
            Bytes::copy_from_slice(&line[..line.len().min(content_length)])
        });
    }

    Ok(request)
}

/// Leading whitespace and a `+` sign are accepted, anything after the
/// digits is ignored. No digits at all is an error.
fn parse_content_length(value: &[u8]) -> Result<usize, RequestError> {
    let start = value
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(value.len());
    let value = &value[start..];
    let unsigned = value.strip_prefix(b"+").unwrap_or(value);

    let count = unsigned.iter().take_while(|b| b.is_ascii_digit()).count();
    if count == 0 {
        let value = String::from_utf8_lossy(trim_cr(value)).into_owned();
        return Err(RequestError::InvalidContentLength(value));
    }

    let digits = &unsigned[..count];
    digits
        .iter()
        .try_fold(0usize, |len, digit| {
            len.checked_mul(10)?.checked_add(usize::from(digit - b'0'))
        })
        .ok_or_else(|| {
            RequestError::ContentLengthRange(String::from_utf8_lossy(digits).into_owned())
        })
}

#[inline]
fn split_line<'a>(buf: &mut &'a [u8]) -> Option<&'a [u8]> {
    let rest: &'a [u8] = buf;
    if rest.is_empty() {
        return None;
    }

    match memchr::memchr(LINE_DELIMITER, rest) {
        Some(pos) => {
            *buf = &rest[pos + 1..];
            Some(&rest[..pos])
        }
        None => {
            *buf = &[];
            Some(rest)
        }
    }
}

#[inline]
fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
