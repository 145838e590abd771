use serde::{Deserialize, Serialize};

use crate::key::Key;
use crate::theme::ThemeToken;
use crate::types::{Color, Point, Rect, Stroke};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` per animation frame. Renderers
/// consume the list in order; each command carries everything it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle. `key` names the datum behind a bar so
    /// surfaces can label it or route clicks back.
    DrawRect {
        rect: Rect,
        fill: Color,
        stroke: Option<Stroke>,
        corner_radius: f64,
        key: Option<Key>,
    },

    /// Draw a text string anchored at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Translate all subsequent commands until the matching `PopTransform`.
    PushTransform { translate: Point },

    /// Pop the most recent transform.
    PopTransform,

    /// Begin a logical group (the bar layer, an axis).
    BeginGroup { id: String },

    /// End the current group.
    EndGroup,
}

/// Horizontal anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}
