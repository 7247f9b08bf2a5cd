//! [`Error`]-related definitions.

use std::fmt;

use axum_extra::typed_header::TypedHeaderRejection;
use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::{error::Kind, infra::database, Classify};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
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
                        $name::$variant => Self::new(
                            $code,
                            ::http::StatusCode::$status_code,
                            $message,
                        ),
                    )*
                }
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] without a backtrace.
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            status_code,
            backtrace: None,
            message: message.into(),
        }
    }

    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(
            "INTERNAL_SERVER_ERROR",
            http::StatusCode::INTERNAL_SERVER_ERROR,
            msg.to_string(),
        )
    }

    /// Creates a new [`Error`] with the provided `code` out of a classified
    /// [`Service`] error, whose [`Kind`] determines the
    /// [`http::StatusCode`].
    ///
    /// [`Service`]: crate::Service
    #[must_use]
    pub fn classified<E>(code: Code, err: &E) -> Self
    where
        E: Classify + fmt::Display + ?Sized,
    {
        Self::new(code, status_code(err.kind()), err.to_string())
    }
}

/// Returns the [`http::StatusCode`] reported for the provided [`Kind`] of
/// failures.
#[must_use]
pub const fn status_code(kind: Kind) -> http::StatusCode {
    match kind {
        Kind::Validation => http::StatusCode::BAD_REQUEST,
        Kind::NotFound => http::StatusCode::NOT_FOUND,
        Kind::Conflict | Kind::InvalidStateTransition => {
            http::StatusCode::CONFLICT
        }
        Kind::Unavailable => http::StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        use juniper::Value;

        let mut ext = juniper::Object::with_capacity(2);
        _ = ext.add_field("code", Value::scalar(self.code.to_owned()));
        if let Some(trace) = &self.backtrace {
            let frames = trace.iter().map(|f| Value::scalar(f.to_string()));
            _ = ext.add_field("backtrace", Value::list(frames.collect()));
        }
        juniper::FieldError::new(self.message, Value::object(ext))
    }
}

/// [`Error`] code.
pub type Code = &'static str;

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

impl AsError for TypedHeaderRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            "INVALID_AUTHORIZATION",
            http::StatusCode::UNAUTHORIZED,
            self.to_string(),
        ))
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::classified("UNAVAILABLE", self))
    }
}

#[cfg(test)]
mod spec {
    use service::{error::Kind, infra::memory};

    use super::{AsError as _, Error};

    #[test]
    fn store_failures_are_unavailable() {
        let err =
            service::infra::database::Error::from(memory::Error::Unavailable)
                .as_error();

        assert_eq!(err.code, "UNAVAILABLE");
        assert_eq!(err.status_code, http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn kinds_map_to_statuses() {
        for (kind, status) in [
            (Kind::Validation, 400),
            (Kind::NotFound, 404),
            (Kind::Conflict, 409),
            (Kind::InvalidStateTransition, 409),
            (Kind::Unavailable, 503),
        ] {
            assert_eq!(super::status_code(kind).as_u16(), status, "{kind}");
        }
    }

    #[test]
    fn field_error_carries_code() {
        use juniper::{DefaultScalarValue, IntoFieldError as _};

        let err: juniper::FieldError<DefaultScalarValue> =
            Error::internal(&"boom").into_field_error();

        assert_eq!(err.message(), "boom");
        let ext = err.extensions().as_object_value().unwrap();
        assert_eq!(
            ext.get_field_value("code").and_then(|v| v.as_string_value()),
            Some("INTERNAL_SERVER_ERROR"),
        );
        assert!(ext.get_field_value("backtrace").is_none());
    }

    #[test]
    fn internal_error_displays_code() {
        let err = Error::internal(&"boom");

        assert_eq!(err.to_string(), "[INTERNAL_SERVER_ERROR]: boom");
    }
}
