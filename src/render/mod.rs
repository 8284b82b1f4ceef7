//! 2D canvas rendering
//!
//! The scene builder turns simulation state into a flat list of draw commands.
//! Nothing here touches the browser; the shell replays the list.

pub mod color;
pub mod commands;
pub mod scene;

pub use color::Rgba;
pub use commands::{DrawCommand, Rect, TextAlign};
pub use scene::{RenderOptions, build};
