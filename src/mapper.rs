//! Protocol status mapper - classification codes to wire statuses.
//!
//! Two independent total lookup tables: one into [`http::StatusCode`], one
//! into [`tonic::Code`]. They are deliberately not derived from each other
//! because the two vocabularies are not isomorphic: HTTP folds dependency
//! failure and timeout into a single 424 while RPC splits them into
//! `FailedPrecondition` and `DeadlineExceeded`, and HTTP's 409 covers both
//! duplicate and state conflict where RPC has a single `AlreadyExists`
//! family.
//!
//! Unrecognized or unclassified codes degrade safely to 500 / `Internal`,
//! never to anything more revealing.

use crate::codes;
use http::StatusCode;
use tonic::Code;

/// HTTP status for a classification code. Total; unknown codes map to 500.
pub fn http_status(code: &str) -> StatusCode {
    match code {
        codes::INVALID_INPUT
        | codes::MISSING_REQUIRED_FIELD
        | codes::INVALID_FORMAT
        | codes::TOO_LARGE => StatusCode::BAD_REQUEST,

        codes::TOO_MANY_REQUESTS => StatusCode::TOO_MANY_REQUESTS,

        codes::UNAUTHORIZED | codes::TOKEN_EXPIRED | codes::INVALID_TOKEN => {
            StatusCode::UNAUTHORIZED
        }

        codes::FORBIDDEN
        | codes::USER_NOT_VERIFIED
        | codes::ACCOUNT_DISABLED
        | codes::INSUFFICIENT_BALANCE => StatusCode::FORBIDDEN,

        codes::NOT_FOUND => StatusCode::NOT_FOUND,

        codes::ALREADY_EXISTS | codes::CONFLICT => StatusCode::CONFLICT,

        codes::DEPENDENCY_FAILURE | codes::TIMEOUT => StatusCode::FAILED_DEPENDENCY,

        codes::SERVICE_UNAVAILABLE => StatusCode::SERVICE_UNAVAILABLE,

        // INTERNAL_FAILURE and everything unrecognized
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// RPC status for a classification code. Total; unknown codes map to
/// [`Code::Internal`].
pub fn rpc_status(code: &str) -> Code {
    match code {
        codes::INVALID_INPUT
        | codes::MISSING_REQUIRED_FIELD
        | codes::INVALID_FORMAT
        | codes::TOO_LARGE => Code::InvalidArgument,

        codes::TOO_MANY_REQUESTS => Code::ResourceExhausted,

        codes::UNAUTHORIZED | codes::TOKEN_EXPIRED | codes::INVALID_TOKEN => Code::Unauthenticated,

        codes::FORBIDDEN
        | codes::USER_NOT_VERIFIED
        | codes::ACCOUNT_DISABLED
        | codes::INSUFFICIENT_BALANCE => Code::PermissionDenied,

        codes::NOT_FOUND => Code::NotFound,

        codes::ALREADY_EXISTS | codes::CONFLICT => Code::AlreadyExists,

        codes::DEPENDENCY_FAILURE => Code::FailedPrecondition,

        codes::TIMEOUT => Code::DeadlineExceeded,

        codes::SERVICE_UNAVAILABLE => Code::Unavailable,

        // INTERNAL_FAILURE and everything unrecognized
        _ => Code::Internal,
    }
}
