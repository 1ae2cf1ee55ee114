pub(crate) mod scrub;
pub(crate) mod trigger;
