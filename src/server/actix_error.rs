//! Actix Web error adapter for gateway errors.
//!
//! Maps every [`Error`] variant onto its HTTP status code and renders the
//! JSON envelope callers see. Upstream-passthrough errors additionally carry
//! a truncated `detail` excerpt of the upstream body.

use crate::error::Error;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

/// JSON envelope used for every error reply.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingParameter(_) | Error::InvalidScheme | Error::EmptyBody => {
                StatusCode::BAD_REQUEST
            }
            Error::MissingCredential => StatusCode::UNAUTHORIZED,
            Error::ForbiddenTarget(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::ResponseTooLarge(_) | Error::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::UnsupportedPath(_) | Error::UnsupportedMethod(_) => StatusCode::NOT_IMPLEMENTED,
            Error::UpstreamHttpError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Error::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            Error::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Error::ConfigInvalid(_) | Error::Bind(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            Error::UpstreamHttpError { detail, .. } => Some(detail.as_str()),
            _ => None,
        };

        HttpResponse::build(self.status_code())
            .content_type("application/json")
            .json(ErrorBody {
                error: self.to_string(),
                detail,
            })
    }
}
