use bytes::Bytes;
use http::Method;

/// A request as read off a single connection.
///
/// Fields the client did not send are left empty rather than rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    /// `None` when the request line is empty or the token is not a method.
    pub method: Option<Method>,
    /// Request target exactly as sent, query included.
    pub path: String,
    /// First body line, present only when a positive `Content-Length` was declared.
    pub body: Option<Bytes>,
}

impl Request {
    pub fn method_str(&self) -> &str {
        self.method.as_ref().map(Method::as_str).unwrap_or_default()
    }
}
