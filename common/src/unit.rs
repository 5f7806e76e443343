//! Marker types qualifying typed values (mostly [`DateTimeOf`]).
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Moment an entity was created.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Moment an entity was last modified.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Moment something stops being valid.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
