pub(crate) mod blend;
pub(crate) mod blur;
pub(crate) mod compositor;
pub(crate) mod label;
pub(crate) mod raster;
pub(crate) mod surface;
