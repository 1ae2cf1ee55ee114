/// In-memory surface for tests and scenario replay.
pub mod sim;
pub(crate) mod surface;
