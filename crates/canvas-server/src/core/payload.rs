//! JSON request body extractor
//!
//! Wraps [`axum::Json`] so a malformed or incomplete body is answered with
//! the regular error envelope instead of axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::Error;

#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());

        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::JsonDataError(_) => "Request body is missing fields or has invalid values",
            _ => "Invalid request body",
        };
        Error::Validation(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Login {
        email: String,
        password: String,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_owned())).unwrap()
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Login, Error> {
        Payload::<Login>::from_request(request(content_type, body), &())
            .await
            .map(|Payload(login)| login)
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let login = extract(
            Some("application/json"),
            r#"{"email":"alice@x.com","password":"Str0ng!pw"}"#,
        )
        .await
        .unwrap();
        assert_eq!(login.email, "alice@x.com");
        assert_eq!(login.password, "Str0ng!pw");
    }

    #[tokio::test]
    async fn test_rejections_become_validation_errors() {
        let cases = [
            (Some("application/json"), r#"{"email":"alice@x.com"}"#),
            (Some("application/json"), r#"{"email":"alice@x.com","#),
            (Some("application/json"), r#"{"email":1,"password":"x"}"#),
            (None, r#"{"email":"alice@x.com","password":"x"}"#),
            (Some("text/plain"), r#"{"email":"alice@x.com","password":"x"}"#),
        ];

        for (content_type, body) in cases {
            let err = extract(content_type, body).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{body}: {err:?}");
            assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
            // serde's internal wording stays out of the response
            assert!(!err.to_string().contains("missing field"));
        }
    }
}
