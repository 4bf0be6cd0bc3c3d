pub mod animate;
pub mod fetch;
pub mod lengths;
pub mod overlay;
pub mod progress;
pub mod rasterize;
pub mod render;
