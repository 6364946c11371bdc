//! Chroma theremin library - color tracking mapped to a sine voice

pub mod audio;
pub mod capture;
pub mod cli;
pub mod control;
pub mod display;
pub mod error;
pub mod frame_loop;
pub mod mapping;
pub mod params;
pub mod tracking;

pub use error::{Result, ThereminError};
