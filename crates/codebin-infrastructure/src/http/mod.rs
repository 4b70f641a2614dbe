//! HTTP adapters for the remote collaborators.

mod compile_client;
mod file_store_client;
mod generative_client;

pub use compile_client::HttpCompileClient;
pub use file_store_client::HttpFileStore;
pub use generative_client::GenerativeApiClient;

use codebin_core::error::CodebinError;
use reqwest::StatusCode;

/// Translates a non-2xx backend response into the error taxonomy.
///
/// The server is authoritative: 401/403 mean the caller identity was
/// rejected, 404 means the file is unknown or inaccessible (the backend
/// does not distinguish), 400/422 mean the request itself was invalid
/// (empty name, owner self-revocation). Everything else keeps its status
/// and server-provided text.
pub(crate) fn map_response_error(
    status: StatusCode,
    body: String,
    file_id: Option<&str>,
) -> CodebinError {
    let message = if body.trim().is_empty() {
        status.to_string()
    } else {
        body
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CodebinError::auth(message),
        StatusCode::NOT_FOUND => match file_id {
            Some(id) => CodebinError::not_found("file", id),
            None => CodebinError::server(status.as_u16(), message),
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            CodebinError::validation(message)
        }
        _ => CodebinError::server(status.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_map_to_auth() {
        assert!(map_response_error(StatusCode::UNAUTHORIZED, "no token".into(), None).is_auth());
        assert!(map_response_error(StatusCode::FORBIDDEN, "not yours".into(), Some("f1")).is_auth());
    }

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = map_response_error(StatusCode::NOT_FOUND, String::new(), Some("f1"));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("f1"));
    }

    #[test]
    fn test_not_found_without_context_stays_server_error() {
        let err = map_response_error(StatusCode::NOT_FOUND, "gone".into(), None);
        assert!(err.is_server());
    }

    #[test]
    fn test_bad_request_maps_to_validation() {
        let err = map_response_error(
            StatusCode::BAD_REQUEST,
            "fileName must not be empty".into(),
            None,
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_other_statuses_keep_server_text() {
        let err = map_response_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".into(),
            Some("f1"),
        );
        match err {
            CodebinError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_falls_back_to_status_text() {
        let err = map_response_error(StatusCode::BAD_GATEWAY, "  ".into(), None);
        assert!(err.to_string().contains("502"));
    }
}
