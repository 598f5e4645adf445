use bytes::{BufMut, Bytes, BytesMut};
use http::{header::CONTENT_TYPE, HeaderValue, StatusCode};

pub type Response = http::Response<Bytes>;

pub trait IntoResponse {
    fn into_response(self) -> Response;
}

/// Serializes a complete response. `Content-Length` is the byte length of
/// `body` and the connection is always announced as closed.
pub fn build(status: StatusCode, content_type: &str, body: &[u8]) -> Bytes {
    let mut dst = BytesMut::new();
    write_response(&mut dst, status, content_type, body);
    dst.freeze()
}

pub(super) fn write_response(dst: &mut BytesMut, status: StatusCode, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
        body.len(),
    );

    dst.reserve(head.len() + body.len());
    dst.put_slice(head.as_bytes());
    dst.put_slice(body);
}

fn with_content_type(body: Bytes, content_type: &'static str) -> Response {
    let mut response = http::Response::new(body);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));

    response
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        with_content_type(Bytes::from(self), mime::TEXT_PLAIN.as_ref())
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        with_content_type(Bytes::from(self), mime::TEXT_PLAIN.as_ref())
    }
}

pub struct Html(pub Bytes);
impl IntoResponse for Html {
    fn into_response(self) -> Response {
        with_content_type(self.0, mime::TEXT_HTML.as_ref())
    }
}

/// Body that is already JSON text; sent as is, without serialization.
pub struct RawJson(pub Bytes);
impl IntoResponse for RawJson {
    fn into_response(self) -> Response {
        with_content_type(self.0, mime::APPLICATION_JSON.as_ref())
    }
}

impl<B: IntoResponse> IntoResponse for (StatusCode, B) {
    fn into_response(self) -> Response {
        let mut response = self.1.into_response();
        *response.status_mut() = self.0;

        response
    }
}
