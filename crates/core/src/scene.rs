//! The render tree: every bar currently on screen with its live attributes.

use barflow_protocol::{Color, Key, Rect, Stroke};

/// Identity of one rendered bar. Never reused, so an exiting bar and a
/// re-entering bar for the same key are distinct elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// The animatable attributes of a bar, in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarAttrs {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub fill: Color,
}

impl BarAttrs {
    /// Interpolate every attribute; `t` is already eased.
    pub fn lerp(&self, to: &BarAttrs, t: f64) -> BarAttrs {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        BarAttrs {
            x: mix(self.x, to.x),
            y: mix(self.y, to.y),
            width: mix(self.width, to.width),
            height: mix(self.height, to.height),
            corner_radius: mix(self.corner_radius, to.corner_radius),
            fill: self.fill.lerp(to.fill, t),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Where a bar is in its enter / update / exit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPhase {
    /// Drawn by the initial render, not yet touched by a tick.
    Static,
    Entering,
    Persisting,
    /// On its way out; removed when its transition ends.
    Exiting,
}

/// Paint layer relative to the axes, fixed when the bar is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Initial bars, drawn before the axes.
    UnderAxes,
    /// Bars entered by a tick, drawn after the axes.
    OverAxes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub id: ElementId,
    pub key: Key,
    pub value: f64,
    pub attrs: BarAttrs,
    pub stroke: Option<Stroke>,
    pub phase: BarPhase,
    pub layer: Layer,
    /// Bars only respond to clicks once a tick has joined them.
    pub clickable: bool,
}

impl Bar {
    pub fn is_live(&self) -> bool {
        self.phase != BarPhase::Exiting
    }
}

/// Ordered set of bars; later bars paint over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    bars: Vec<Bar>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new bar and return its id.
    pub fn insert(&mut self, key: Key, value: f64, attrs: BarAttrs, phase: BarPhase) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.bars.push(Bar {
            id,
            key,
            value,
            attrs,
            stroke: None,
            phase,
            layer: if phase == BarPhase::Static {
                Layer::UnderAxes
            } else {
                Layer::OverAxes
            },
            clickable: false,
        });
        id
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Bar> {
        self.bars.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Bar> {
        self.bars.iter_mut().find(|b| b.id == id)
    }

    /// The live (non-exiting) bar bound to `key`, if any.
    pub fn live(&self, key: &str) -> Option<&Bar> {
        self.bars.iter().find(|b| b.is_live() && b.key == key)
    }

    pub fn live_mut(&mut self, key: &str) -> Option<&mut Bar> {
        self.bars.iter_mut().find(|b| b.is_live() && b.key == key)
    }

    /// Keys of all live bars, in paint order.
    pub fn live_keys(&self) -> Vec<Key> {
        self.bars
            .iter()
            .filter(|b| b.is_live())
            .map(|b| b.key.clone())
            .collect()
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Bar> {
        let pos = self.bars.iter().position(|b| b.id == id)?;
        Some(self.bars.remove(pos))
    }
}
