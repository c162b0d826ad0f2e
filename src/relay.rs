//! The pre/post-processing pair around a backend invocation.
//!
//! Both transforms are pure and stateless: the input transform validates the
//! declared content type and decodes the payload before it is sent to the
//! backend, and the output transform checks the backend status and tags the
//! response bytes with the caller's requested content type. Everything in
//! between is an unmodified pass-through.

use axum::body::Bytes;
use axum::http::StatusCode;

use crate::errors::RelayError;

/// The only content type the relay accepts.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Validate and decode an inbound payload before forwarding it to the backend.
///
/// Only `application/json` is accepted. The payload is assumed to be
/// well-formed JSON and is forwarded as-is; an empty body becomes an empty
/// string. Any other content type (including a missing one, reported as
/// `unknown`) fails with [`RelayError::UnsupportedMediaType`]. A body that is
/// not valid UTF-8 cannot be JSON, so it is rejected the same way.
pub fn prepare_input(body: &Bytes, content_type: Option<&str>) -> Result<String, RelayError> {
    match content_type {
        Some(JSON_CONTENT_TYPE) => {
            let payload =
                std::str::from_utf8(body).map_err(|_| RelayError::UnsupportedMediaType {
                    content_type: JSON_CONTENT_TYPE.to_string(),
                })?;
            Ok(payload.to_string())
        }
        other => Err(RelayError::UnsupportedMediaType {
            content_type: other.unwrap_or("unknown").to_string(),
        }),
    }
}

/// Post-process the backend response before it is returned to the caller.
///
/// A non-200 status fails with [`RelayError::Backend`] carrying the decoded
/// response body as the message. On success the bytes are returned unchanged,
/// paired with the caller's accept content type (`application/json` when no
/// accept header was given, or when the caller accepts anything).
pub fn prepare_output(
    status: StatusCode,
    body: Bytes,
    accept: Option<&str>,
) -> Result<(Bytes, String), RelayError> {
    if status != StatusCode::OK {
        return Err(RelayError::Backend {
            message: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    let content_type = match accept {
        None | Some("*/*") => JSON_CONTENT_TYPE,
        Some(accept) => accept,
    };
    Ok((body, content_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn json_payload_passes_through_unchanged() {
        let body = Bytes::from_static(br#"{"instances":[[1,2,3]]}"#);
        let payload = prepare_input(&body, Some("application/json")).unwrap();
        assert_eq!(payload, r#"{"instances":[[1,2,3]]}"#);
    }

    #[test]
    fn empty_json_body_becomes_empty_string() {
        let payload = prepare_input(&Bytes::new(), Some("application/json")).unwrap();
        assert_eq!(payload, "");
    }

    #[rstest]
    #[case::text_plain("text/plain")]
    #[case::csv("text/csv")]
    #[case::octet_stream("application/octet-stream")]
    fn non_json_content_type_is_rejected(#[case] declared: &str) {
        let err = prepare_input(&Bytes::from_static(b"payload"), Some(declared)).unwrap_err();
        match err {
            RelayError::UnsupportedMediaType { content_type } => {
                assert_eq!(content_type, declared)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_content_type_is_reported_as_unknown() {
        let err = prepare_input(&Bytes::from_static(b"{}"), None).unwrap_err();
        match err {
            RelayError::UnsupportedMediaType { content_type } => {
                assert_eq!(content_type, "unknown")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_utf8_body_is_rejected() {
        let body = Bytes::from_static(&[0xff, 0xfe, 0xfd]);
        let err = prepare_input(&body, Some("application/json")).unwrap_err();
        assert!(matches!(err, RelayError::UnsupportedMediaType { .. }));
    }

    #[test]
    fn ok_response_keeps_bytes_and_accept_type() {
        let body = Bytes::from_static(br#"{"predictions":[21.9]}"#);
        let (bytes, content_type) =
            prepare_output(StatusCode::OK, body.clone(), Some("application/json")).unwrap();
        assert_eq!(bytes, body);
        assert_eq!(content_type, "application/json");
    }

    #[rstest]
    #[case::missing(None)]
    #[case::wildcard(Some("*/*"))]
    fn absent_accept_defaults_to_json(#[case] accept: Option<&str>) {
        let (_, content_type) =
            prepare_output(StatusCode::OK, Bytes::from_static(b"{}"), accept).unwrap();
        assert_eq!(content_type, JSON_CONTENT_TYPE);
    }

    #[test]
    fn non_200_surfaces_decoded_body_as_message() {
        let err = prepare_output(
            StatusCode::INTERNAL_SERVER_ERROR,
            Bytes::from_static(b"model error"),
            Some("application/json"),
        )
        .unwrap_err();
        match err {
            RelayError::Backend { message } => assert_eq!(message, "model error"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_200_with_non_utf8_body_is_decoded_lossily() {
        let err = prepare_output(
            StatusCode::BAD_REQUEST,
            Bytes::from_static(&[0xff, b'o', b'k']),
            None,
        )
        .unwrap_err();
        match err {
            RelayError::Backend { message } => assert!(message.ends_with("ok")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
