pub mod commands;
pub mod key;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use key::Key;
pub use theme::{Theme, ThemeToken};
pub use types::{Color, ColorParseError, Point, Rect, Stroke, Viewport};
