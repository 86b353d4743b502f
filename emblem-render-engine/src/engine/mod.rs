pub mod camera;
pub mod canvas;
pub mod core;
pub mod loading;
