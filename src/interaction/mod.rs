pub(crate) mod controller;
pub(crate) mod divider_drag;
pub(crate) mod pan;
