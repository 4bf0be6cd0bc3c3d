pub mod health;
pub mod overlay;
pub mod paths;
pub mod render;
