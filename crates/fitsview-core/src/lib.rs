#[cfg(feature = "cli")]
pub mod args;
pub mod config;
pub mod consts;
pub mod contour;
pub mod controller;
pub mod error;
pub mod image_data;
pub mod io;
pub mod palette;
pub mod render;
pub mod session;
pub mod stats;
pub mod stretch;
pub mod view;
