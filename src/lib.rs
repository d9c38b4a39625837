pub mod camera;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod pose;
