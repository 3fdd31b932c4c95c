//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity update.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Marker type describing a login event.
#[derive(Clone, Copy, Debug)]
pub struct Login;
