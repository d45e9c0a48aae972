// Re-export all public modules so they can be used from main.rs
pub mod config;
pub mod logging;
pub mod ui;

// MVC Architecture
pub mod controller;
pub mod model;
pub mod view;

pub mod render;
pub mod scene;
