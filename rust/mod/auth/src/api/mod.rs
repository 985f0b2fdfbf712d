mod session;
mod users;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

pub(crate) type AppState = Arc<AuthService>;

pub fn build_router(service: Arc<AuthService>) -> Router {
    Router::new()
        .merge(session::routes())
        .merge(users::routes())
        .with_state(service)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers shared by the handler tests.

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, Response, StatusCode};

    pub const BOUNDARY: &str = "test-boundary";

    /// Build a multipart/form-data body from (name, value) pairs.
    pub fn multipart_body(pairs: &[(&str, &str)]) -> Body {
        let mut body = String::new();
        for (name, value) in pairs {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            ));
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        Body::from(body)
    }

    pub fn form_request(uri: &str, method: &str, pairs: &[(&str, &str)]) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(multipart_body(pairs))
            .unwrap()
    }

    /// Read a response body as the standard envelope, asserting status.
    pub async fn envelope(response: Response<Body>, expect: StatusCode) -> serde_json::Value {
        assert_eq!(response.status(), expect);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
