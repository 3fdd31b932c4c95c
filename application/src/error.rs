//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{
    command::send_request,
    domain::locale::Params,
    infra::{storage, transport},
    query, store,
};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[key = $key:literal]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            key: $key,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-facing [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// Translation key of the text shown to the user.
    pub key: Key,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            key: "errors.generic",
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Returns the text of this [`Error`] in the current language of the
    /// provided [`store::Locale`].
    #[must_use]
    pub fn text(&self, locale: &store::Locale) -> String {
        locale.translate_with(self.key, &Params::new().with("0", &self.message))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            key: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Translation key of an [`Error`].
///
/// Resolved with [`locale::translate()`].
///
/// [`locale::translate()`]: service::domain::locale::translate
pub type Key = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

define_error! {
    enum RemoteError {
        #[code = "NETWORK_ERROR"]
        #[key = "errors.network"]
        #[message = "Remote API cannot be reached"]
        Network,

        #[code = "UNAUTHORIZED"]
        #[key = "auth.sessionExpired"]
        #[message = "Session has expired"]
        Unauthorized,

        #[code = "FORBIDDEN"]
        #[key = "errors.forbidden"]
        #[message = "Access denied"]
        Forbidden,

        #[code = "NOT_FOUND"]
        #[key = "errors.notFound"]
        #[message = "Requested resource does not exist"]
        NotFound,

        #[code = "VALIDATION_ERROR"]
        #[key = "errors.validation"]
        #[message = "Remote API rejected the provided data"]
        Validation,

        #[code = "SERVER_ERROR"]
        #[key = "errors.serverError"]
        #[message = "Remote API failed"]
        Server,
    }
}

impl AsError for transport::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(RemoteError::Network.into())
    }
}

impl AsError for storage::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for send_request::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let (error, failure) = match self {
            Self::Network(e) => return e.try_as_error(),
            Self::Unauthorized(f) => (RemoteError::Unauthorized, f),
            Self::Forbidden(f) => (RemoteError::Forbidden, f),
            Self::NotFound(f) => (RemoteError::NotFound, f),
            Self::Validation(f) => (RemoteError::Validation, f),
            Self::Server(f) => (RemoteError::Server, f),
            Self::Unexpected(_) => return None,
        };
        let mut error = Error::from(error);
        if let Some(msg) = &failure.message {
            error.message.clone_from(msg);
        }
        Some(error)
    }
}

impl AsError for query::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Request(e) => e.try_as_error(),
            Self::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use service::{
        command::send_request::ExecutionError,
        infra::transport::{self, Failure, Response, StatusCode},
        store,
    };

    use super::AsError as _;

    fn failure(status: u16, message: &str) -> Failure {
        Failure::from(&Response::json(
            StatusCode::from_u16(status).unwrap(),
            &serde_json::json!({ "success": false, "message": message }),
        ))
    }

    #[test]
    fn maps_remote_failures() {
        let err = ExecutionError::NotFound(failure(404, "No such patient"))
            .into_error();
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(err.message, "No such patient");
        assert_eq!(
            err.text(&store::Locale::default()),
            "The requested resource was not found.",
        );

        let err = ExecutionError::Network(transport::Error::Unreachable(
            "connection refused".into(),
        ))
        .into_error();
        assert_eq!(err.code, "NETWORK_ERROR");
    }

    #[test]
    fn unexpected_failures_are_internal() {
        let err =
            ExecutionError::Unexpected(failure(418, "teapot")).into_error();

        assert_eq!(err.code, "INTERNAL_ERROR");
        assert!(err.to_string().starts_with("[INTERNAL_ERROR]: "));
    }

    #[test]
    fn traced_errors_keep_backtrace() {
        let err = tracerr::new!(ExecutionError::Forbidden(Failure {
            status: StatusCode::FORBIDDEN,
            message: None,
            errors: vec![],
        }))
        .into_error();

        assert_eq!(err.code, "FORBIDDEN");
        assert_eq!(err.message, "Access denied");
        assert!(err.backtrace.is_some());
    }
}
