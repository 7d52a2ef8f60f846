pub mod camera;
pub mod map;
pub mod not_found;
pub mod settings;
