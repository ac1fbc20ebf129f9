use std::borrow::Cow;

/// Broad failure categories surfaced to callers, who map them to user-facing copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiErrorKind {
    Unauthenticated,
    InvalidArgument,
    NotFound,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: Cow<'static, str>,
}

/// Request-level errors, caused by the caller rather than the backend
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Invalid Argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Not Found: {0}")]
    NotFound(&'static str),

    #[error("Permission Denied: {0}")]
    PermissionDenied(&'static str),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(Cow<'static, str>),

    #[error("Failed Precondition: {0}")]
    FailedPrecondition(&'static str),

    #[error("Conflict/Already Exists")]
    Conflict,
}

impl Error {
    #[rustfmt::skip]
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Error::Unauthenticated          => ApiErrorKind::Unauthenticated,

            Error::InvalidArgument(_)       => ApiErrorKind::InvalidArgument,

            Error::NotFound(_)              => ApiErrorKind::NotFound,
            Error::PermissionDenied(_)      => ApiErrorKind::PermissionDenied,
            Error::RateLimited(_)           => ApiErrorKind::ResourceExhausted,

            | Error::FailedPrecondition(_)
            | Error::Conflict               => ApiErrorKind::FailedPrecondition,
        }
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        ApiError {
            kind: value.kind(),
            message: Cow::Owned(value.to_string()),
        }
    }
}
