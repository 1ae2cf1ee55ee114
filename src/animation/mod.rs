pub(crate) mod ease;
pub(crate) mod stagger;
pub(crate) mod tween;
