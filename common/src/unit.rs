//! Marker types distinguishing the meaning of a [`DateTimeOf`].
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing the last modification of an entity.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Marker type describing a terminal decision made upon an entity
/// (acceptance, rejection, cancellation).
#[derive(Clone, Copy, Debug)]
pub struct Decision;
