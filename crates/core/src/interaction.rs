//! Click handling on bars.

use barflow_protocol::Point;

use crate::config::InteractionConfig;
use crate::scale::ChartScales;
use crate::scene::{Bar, BarAttrs, ElementId, Scene};

/// Top-most clickable live bar containing `point` (plot coordinates).
pub fn hit_test(scene: &Scene, point: Point) -> Option<ElementId> {
    scene
        .bars()
        .iter()
        .rev()
        .find(|bar| bar.clickable && bar.is_live() && bar.attrs.rect().contains(point))
        .map(|bar| bar.id)
}

/// Where a clicked bar ends up: a small rounded square at the target value's
/// row, same column and fill.
pub fn click_target(bar: &Bar, scales: &ChartScales, config: &InteractionConfig) -> BarAttrs {
    let side = config.radius * 2.0;
    BarAttrs {
        x: bar.attrs.x,
        y: scales.y.apply(config.target_value),
        width: side,
        height: side,
        corner_radius: config.radius,
        fill: bar.attrs.fill,
    }
}
