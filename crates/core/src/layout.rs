use barflow_protocol::{Point, Viewport};
use serde::{Deserialize, Serialize};

/// Space reserved around the plot for the axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(20.0, 20.0, 30.0, 40.0)
    }
}

/// Container size split into margins and the inner plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub container: Viewport,
    pub margin: Margin,
    pub inner_width: f64,
    pub inner_height: f64,
}

impl ChartLayout {
    pub fn new(container: Viewport, margin: Margin) -> Self {
        let inner_width = (container.width - margin.left - margin.right).max(0.0);
        let inner_height = (container.height - margin.top - margin.bottom).max(0.0);
        Self {
            container,
            margin,
            inner_width,
            inner_height,
        }
    }

    /// Size of the drawing canvas: plot area plus margins.
    pub fn canvas(&self) -> Viewport {
        Viewport::new(
            self.inner_width + self.margin.left + self.margin.right,
            self.inner_height + self.margin.top + self.margin.bottom,
        )
    }

    /// Translation applied to the plot group.
    pub fn origin(&self) -> Point {
        Point::new(self.margin.left, self.margin.top)
    }

    /// Convert a canvas coordinate into plot coordinates.
    pub fn to_plot(&self, p: Point) -> Point {
        Point::new(p.x - self.margin.left, p.y - self.margin.top)
    }
}
