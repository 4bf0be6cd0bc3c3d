pub mod geo;
pub mod overlay;
pub mod progress;
