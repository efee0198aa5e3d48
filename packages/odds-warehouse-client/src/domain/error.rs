//! Transport and Domain Errors
//!
//! `TransportError` is what the remote call layer hands back: a gRPC status
//! or a local failure without a code. `ClientError` is the classified form
//! surfaced to callers, always wrapping the transport error verbatim.

use thiserror::Error;
use tonic::Code;
use tonic_types::StatusExt;

/// Boxed error for local failures that carry no status code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// Transport Error
// =============================================================================

/// Failure reported while opening or reading a remote stream.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote call layer reported a status code.
    #[error("rpc error: code = {:?} desc = {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),
    /// A local failure (I/O, decoding) with no status code.
    #[error("{0}")]
    Local(#[source] BoxError),
}

impl TransportError {
    /// Wrap a local failure.
    pub fn local(error: impl Into<BoxError>) -> Self {
        Self::Local(error.into())
    }

    /// Status code, if the remote layer reported one.
    #[must_use]
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Status(status) => Some(status.code()),
            Self::Local(_) => None,
        }
    }

    /// The underlying status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<&tonic::Status> {
        match self {
            Self::Status(status) => Some(status),
            Self::Local(_) => None,
        }
    }
}

// =============================================================================
// Domain Error
// =============================================================================

/// Domain error category, used for metric labels and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unclassified transport failure.
    BadGateway,
    /// Remote internal fault or generic read failure.
    InternalServerError,
    /// Remote request validation failure.
    InvalidArgument,
    /// Requested resource does not exist.
    NotFound,
    /// Read failure part way through a stream.
    StreamFailure,
}

impl ErrorKind {
    /// Label value for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadGateway => "bad_gateway",
            Self::InternalServerError => "internal_server_error",
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::StreamFailure => "stream_failure",
        }
    }
}

/// A request field rejected by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Path of the offending field.
    pub field: String,
    /// Why the field was rejected.
    pub description: String,
}

/// Classified failure of an odds warehouse call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The remote service could not be reached or failed in an unclassified way.
    #[error("error connecting to external service: {0}")]
    BadGateway(#[source] TransportError),

    /// The remote service reported an internal fault, or the stream broke.
    #[error("internal server error returned from external service: {0}")]
    InternalServerError(#[source] TransportError),

    /// The remote service rejected the request.
    #[error("invalid argument provided: {0}")]
    InvalidArgument(#[source] TransportError),

    /// The requested resource does not exist.
    #[error("resource with id '{id}' does not exist. Error: {source}")]
    NotFound {
        /// Identifier that was looked up.
        id: u64,
        /// Transport error returned by the lookup.
        source: TransportError,
    },

    /// Reading the item at `position` failed after the stream opened.
    #[error("error in stream for item {position}: {source}")]
    StreamFailure {
        /// Zero-based position of the item whose read failed.
        position: usize,
        /// Transport error returned by the read.
        source: TransportError,
    },
}

impl ClientError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadGateway(_) => ErrorKind::BadGateway,
            Self::InternalServerError(_) => ErrorKind::InternalServerError,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StreamFailure { .. } => ErrorKind::StreamFailure,
        }
    }

    /// The wrapped transport error.
    #[must_use]
    pub const fn transport(&self) -> &TransportError {
        match self {
            Self::BadGateway(source)
            | Self::InternalServerError(source)
            | Self::InvalidArgument(source)
            | Self::NotFound { source, .. }
            | Self::StreamFailure { source, .. } => source,
        }
    }

    /// Remote status code, if the transport reported one.
    #[must_use]
    pub fn code(&self) -> Option<Code> {
        self.transport().code()
    }

    /// Field violations from the rich status details of a rejected request.
    ///
    /// Empty when the remote service attached no `BadRequest` details.
    #[must_use]
    pub fn field_violations(&self) -> Vec<FieldViolation> {
        let Some(status) = self.transport().status() else {
            return Vec::new();
        };

        status
            .get_error_details()
            .bad_request()
            .map(|bad_request| {
                bad_request
                    .field_violations
                    .iter()
                    .map(|violation| FieldViolation {
                        field: violation.field.clone(),
                        description: violation.description.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use tonic_types::ErrorDetails;

    use super::*;

    #[test]
    fn status_text_matches_rpc_error_format() {
        let err = TransportError::from(tonic::Status::internal("internal error"));
        assert_eq!(
            err.to_string(),
            "rpc error: code = Internal desc = internal error"
        );
        assert_eq!(err.code(), Some(Code::Internal));
    }

    #[test]
    fn local_error_text_is_verbatim() {
        let err = TransportError::local("oh damn");
        assert_eq!(err.to_string(), "oh damn");
        assert_eq!(err.code(), None);
        assert!(err.status().is_none());
    }

    #[test]
    fn local_io_error_keeps_its_text() {
        let err = TransportError::local(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "pipe closed");
    }

    #[test]
    fn client_error_prefixes() {
        let bad_gateway = ClientError::BadGateway(tonic::Status::unavailable("down").into());
        assert_eq!(
            bad_gateway.to_string(),
            "error connecting to external service: rpc error: code = Unavailable desc = down"
        );

        let invalid = ClientError::InvalidArgument(
            tonic::Status::invalid_argument("incorrect format").into(),
        );
        assert_eq!(
            invalid.to_string(),
            "invalid argument provided: rpc error: code = InvalidArgument desc = incorrect format"
        );

        let not_found = ClientError::NotFound {
            id: 42,
            source: tonic::Status::not_found("missing").into(),
        };
        assert_eq!(
            not_found.to_string(),
            "resource with id '42' does not exist. Error: rpc error: code = NotFound desc = missing"
        );

        let failure = ClientError::StreamFailure {
            position: 2,
            source: TransportError::local("oh damn"),
        };
        assert_eq!(failure.to_string(), "error in stream for item 2: oh damn");
    }

    #[test]
    fn source_is_the_transport_error() {
        let err = ClientError::InternalServerError(TransportError::local("oh damn"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "oh damn");
    }

    #[test]
    fn kind_and_code() {
        let err = ClientError::StreamFailure {
            position: 0,
            source: tonic::Status::aborted("gone").into(),
        };
        assert_eq!(err.kind(), ErrorKind::StreamFailure);
        assert_eq!(err.kind().as_str(), "stream_failure");
        assert_eq!(err.code(), Some(Code::Aborted));
    }

    #[test]
    fn field_violations_from_rich_details() {
        let details = ErrorDetails::with_bad_request_violation("market", "unknown market name");
        let status =
            tonic::Status::with_error_details(Code::InvalidArgument, "bad request", details);
        let err = ClientError::InvalidArgument(status.into());

        assert_eq!(
            err.field_violations(),
            vec![FieldViolation {
                field: "market".to_string(),
                description: "unknown market name".to_string(),
            }]
        );
    }

    #[test]
    fn field_violations_empty_without_details() {
        let err = ClientError::InvalidArgument(tonic::Status::invalid_argument("plain").into());
        assert!(err.field_violations().is_empty());

        let local = ClientError::InternalServerError(TransportError::local("oh damn"));
        assert!(local.field_violations().is_empty());
    }
}
