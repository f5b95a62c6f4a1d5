pub(crate) mod divider;
pub(crate) mod viewport;
