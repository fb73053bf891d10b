use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::i18n::Locale;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Locale of the current request.
///
/// Resolved from `?lang=`, then `Accept-Language`, then the server default
/// stored in the request extensions, then English.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
    fn from_query(query: &str) -> Option<Locale> {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("lang="))
            .and_then(Locale::from_code)
    }
}

impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .uri
            .query()
            .and_then(Self::from_query)
            .or_else(|| {
                parts
                    .headers
                    .get(header::ACCEPT_LANGUAGE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(Locale::from_accept_language)
            })
            .or_else(|| parts.extensions.get::<Locale>().copied())
            .unwrap_or_default();

        Ok(Self(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn resolve(request: HttpRequest<()>) -> Locale {
        let (mut parts, _) = request.into_parts();
        let RequestLocale(locale) = RequestLocale::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        locale
    }

    #[tokio::test]
    async fn test_query_wins_over_header() {
        let request = HttpRequest::builder()
            .uri("/api/cases?page=2&lang=de")
            .header(header::ACCEPT_LANGUAGE, "en")
            .body(())
            .unwrap();
        assert_eq!(resolve(request).await, Locale::De);
    }

    #[tokio::test]
    async fn test_header_then_server_default() {
        let request = HttpRequest::builder()
            .uri("/api/cases")
            .header(header::ACCEPT_LANGUAGE, "de-AT,de;q=0.9")
            .body(())
            .unwrap();
        assert_eq!(resolve(request).await, Locale::De);

        let mut request = HttpRequest::builder().uri("/api/cases").body(()).unwrap();
        request.extensions_mut().insert(Locale::De);
        assert_eq!(resolve(request).await, Locale::De);

        let request = HttpRequest::builder()
            .uri("/api/cases?lang=fr")
            .body(())
            .unwrap();
        assert_eq!(resolve(request).await, Locale::En);
    }
}
