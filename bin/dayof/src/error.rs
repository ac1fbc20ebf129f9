use std::borrow::Cow;

use rpc::error::{ApiError, ApiErrorKind, Error as CommonError};

use db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Common(#[from] CommonError),

    #[error("Internal Error: {0}")]
    InternalErrorStatic(&'static str),

    // FATAL ERRORS
    #[error("Store Error: {0}")]
    StoreError(StoreError),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config Error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
}

impl Error {
    #[rustfmt::skip]
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Common(_) => false,
            Error::StoreError(err) => err.is_fatal(),
            _ => matches!(self,
                | Error::InternalErrorStatic(_)
                | Error::JsonError(_)
                | Error::ConfigError(_)
            ),
        }
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        if let Error::Common(err) = value {
            return err.into();
        }

        let message = 'msg: {
            Cow::Borrowed(match value {
                _ if value.is_fatal() => "Internal Server Error",
                Error::StoreError(_) => "Store Error",
                _ => break 'msg value.to_string().into(),
            })
        };

        ApiError {
            kind: ApiErrorKind::Internal,
            message,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => CommonError::NotFound(what).into(),
            StoreError::Conflict(_) => CommonError::Conflict.into(),
            StoreError::Precondition(what) => CommonError::FailedPrecondition(what).into(),
            _ => {
                log::warn!("STORE ERROR: {err}");
                Error::StoreError(err)
            }
        }
    }
}
