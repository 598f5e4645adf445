pub const LINE_DELIMITER: u8 = b'\n';
pub const CONTENT_LENGTH_PREFIX: &[u8] = b"Content-Length:";

pub mod buffer;
pub mod codec;
pub mod decode;
mod request;
mod response;

pub use request::Request;
pub use response::{build, Html, IntoResponse, RawJson, Response};
