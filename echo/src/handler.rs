use std::path::Path;

use bytes::Bytes;
use http::{Method, StatusCode};

use crate::{
    http::{decode::decode, Html, IntoResponse, RawJson, Request, Response},
    AppState,
};

const MESSAGE_FIELD: &[u8] = b"message=";
const INDEX_NOT_FOUND: &str = "index.html not found";
const HEALTHCHECK_BODY: &[u8] = br#"{"status": "OK"}"#;

pub async fn route_request(request: Request, app_state: AppState) -> Response {
    macro_rules! routes {
        (
            $($m:ident $p:literal => $f:expr),*
            $(, _ => $wc:expr)?
        ) => {
            $(if request.method == Some(Method::$m) && request.path == $p {
                return $f;
            })*
            $(return $wc;)?
        };
    }

    routes!(
        GET "/" => serve_index(&app_state).await,
        POST "/echo" => echo(request.body.as_deref()),
        GET "/healthcheck" => healthcheck(),
        _ => {
            tracing::info!(
                target: "requests",
                method = request.method_str(),
                path = %request.path,
                "404 Not Found"
            );
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    );
}

async fn serve_index(app_state: &AppState) -> Response {
    let path: &Path = &app_state.static_file;

    match tokio::fs::read(path).await {
        Ok(content) if !content.is_empty() => {
            tracing::info!(target: "requests", ?path, "served static file");
            Html(Bytes::from(content)).into_response()
        }
        Ok(_) => {
            tracing::warn!(target: "requests", ?path, "static file is empty");
            (StatusCode::NOT_FOUND, INDEX_NOT_FOUND).into_response()
        }
        Err(err) => {
            tracing::warn!(target: "requests", ?path, %err, "static file not readable");
            (StatusCode::NOT_FOUND, INDEX_NOT_FOUND).into_response()
        }
    }
}

/// The value is spliced into the JSON text as is. Quotes or backslashes in
/// the message produce invalid JSON.
fn echo(body: Option<&[u8]>) -> Response {
    let message = body
        .and_then(|body| body.strip_prefix(MESSAGE_FIELD))
        .map(decode)
        .unwrap_or_default();

    tracing::info!(
        target: "requests",
        message = %String::from_utf8_lossy(&message),
        "echoed message"
    );

    let mut json = Vec::with_capacity(message.len() + 12);
    json.extend_from_slice(br#"{"echo": ""#);
    json.extend_from_slice(&message);
    json.extend_from_slice(br#""}"#);

    RawJson(Bytes::from(json)).into_response()
}

fn healthcheck() -> Response {
    tracing::debug!(target: "requests", "healthcheck value served");
    RawJson(Bytes::from_static(HEALTHCHECK_BODY)).into_response()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use http::header::CONTENT_TYPE;

    use super::*;

    fn request(method: Method, path: &str, body: Option<&'static [u8]>) -> Request {
        Request {
            method: Some(method),
            path: path.to_owned(),
            body: body.map(Bytes::from_static),
        }
    }

    fn state_without_index() -> AppState {
        AppState::new("/nonexistent/echo/index.html")
    }

    #[tokio::test]
    async fn serves_index() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<h1>hello</h1>").unwrap();

        let response = route_request(request(Method::GET, "/", None), AppState::new(file.path())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(response.body().as_ref(), b"<h1>hello</h1>");
    }

    #[tokio::test]
    async fn missing_index_is_not_found() {
        let response = route_request(request(Method::GET, "/", None), state_without_index()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(response.body().as_ref(), INDEX_NOT_FOUND.as_bytes());
    }

    #[tokio::test]
    async fn empty_index_is_not_found() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let response = route_request(request(Method::GET, "/", None), AppState::new(file.path())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn echoes_decoded_message() {
        let response = route_request(
            request(Method::POST, "/echo", Some(b"message=hello+world")),
            state_without_index(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.body().as_ref(), br#"{"echo": "hello world"}"#);

        let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(json["echo"], "hello world");
    }

    #[tokio::test]
    async fn echoes_empty_without_message_field() {
        for body in [None, Some(&b"text=hi"[..]), Some(&b"a=1&message=hi"[..])] {
            let response =
                route_request(request(Method::POST, "/echo", body), state_without_index()).await;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.body().as_ref(), br#"{"echo": ""}"#);
        }
    }

    #[tokio::test]
    async fn echo_keeps_the_rest_of_the_form() {
        let response = route_request(
            request(Method::POST, "/echo", Some(b"message=a%26b&other=1")),
            state_without_index(),
        )
        .await;

        assert_eq!(response.body().as_ref(), br#"{"echo": "a&b&other=1"}"#);
    }

    #[tokio::test]
    async fn echo_does_not_escape() {
        let response = route_request(
            request(Method::POST, "/echo", Some(b"message=%22quoted%22")),
            state_without_index(),
        )
        .await;

        assert_eq!(response.body().as_ref(), br#"{"echo": ""quoted""}"#);
        assert!(serde_json::from_slice::<serde_json::Value>(response.body()).is_err());
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response =
            route_request(request(Method::GET, "/healthcheck", None), state_without_index()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.body().as_ref(), br#"{"status": "OK"}"#);
    }

    #[tokio::test]
    async fn everything_else_is_not_found() {
        let cases = [
            request(Method::GET, "/nonexistent", None),
            request(Method::POST, "/", None),
            request(Method::GET, "/echo", None),
            request(Method::DELETE, "/echo", None),
            request(Method::GET, "/?page=1", None),
            Request::default(),
        ];

        for case in cases {
            let response = route_request(case, state_without_index()).await;

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(response.body().as_ref(), b"Not Found");
        }
    }
}
