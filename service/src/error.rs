//! Classification of [`Command`] errors.
//!
//! [`Command`]: crate::Command

use derive_more::Display;
use tracerr::Traced;

use crate::infra::database;

/// Category of a [`Command`] failure, as seen by a caller.
///
/// [`Command`]: crate::Command
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Provided input is missing or malformed.
    #[display("validation")]
    Validation,

    /// Referenced entity doesn't exist within the tenant.
    #[display("not found")]
    NotFound,

    /// Operation clashes with the existing state (a duplicate, a reference).
    #[display("conflict")]
    Conflict,

    /// Lifecycle transition is not allowed from the current status.
    #[display("invalid state transition")]
    InvalidStateTransition,

    /// Backing store failed or is unreachable.
    #[display("unavailable")]
    Unavailable,
}

/// Error classifiable into a [`Kind`].
pub trait Classify {
    /// Returns the [`Kind`] of this error.
    fn kind(&self) -> Kind;
}

impl Classify for database::Error {
    fn kind(&self) -> Kind {
        Kind::Unavailable
    }
}

impl<E: Classify> Classify for Traced<E> {
    fn kind(&self) -> Kind {
        self.as_ref().kind()
    }
}
