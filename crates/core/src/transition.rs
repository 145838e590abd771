//! Time-based attribute transitions over scene elements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scene::{BarAttrs, ElementId, Scene};

/// Easing curve applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    Linear,
    #[default]
    CubicInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// Shared timing for a group of transitions started together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Timeline {
    pub fn new(start_ms: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            start_ms,
            duration_ms,
            ease,
        }
    }

    /// Raw (uneased) progress in `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

/// What happens to the element when its transition completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnEnd {
    Keep,
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub element: ElementId,
    pub from: BarAttrs,
    pub to: BarAttrs,
    pub timeline: Timeline,
    pub on_end: OnEnd,
    /// When false the fill is left to whoever else sets it.
    pub tween_fill: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub finished: Vec<ElementId>,
    pub removed: Vec<ElementId>,
}

/// Active transitions, at most one per element.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    active: BTreeMap<ElementId, Transition>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating `element` from its current attributes to `to`.
    ///
    /// A transition already running on the element is interrupted: its end
    /// action never runs. Returns false when the element is not in the scene.
    pub fn start(
        &mut self,
        scene: &Scene,
        element: ElementId,
        to: BarAttrs,
        timeline: &Timeline,
        on_end: OnEnd,
    ) -> bool {
        self.insert(scene, element, to, timeline, on_end, true)
    }

    /// Like [`Animator::start`], but only position, size and corner radius
    /// are tweened; `to.fill` is ignored.
    pub fn start_geometry(
        &mut self,
        scene: &Scene,
        element: ElementId,
        to: BarAttrs,
        timeline: &Timeline,
        on_end: OnEnd,
    ) -> bool {
        self.insert(scene, element, to, timeline, on_end, false)
    }

    fn insert(
        &mut self,
        scene: &Scene,
        element: ElementId,
        to: BarAttrs,
        timeline: &Timeline,
        on_end: OnEnd,
        tween_fill: bool,
    ) -> bool {
        let Some(bar) = scene.get(element) else {
            return false;
        };
        if self.active.remove(&element).is_some() {
            tracing::trace!(element = element.0, "interrupted running transition");
        }
        self.active.insert(
            element,
            Transition {
                element,
                from: bar.attrs,
                to,
                timeline: *timeline,
                on_end,
                tween_fill,
            },
        );
        true
    }

    /// Write interpolated attributes for `now_ms` into the scene and retire
    /// finished transitions.
    pub fn advance(&mut self, scene: &mut Scene, now_ms: f64) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        self.active.retain(|id, transition| {
            let Some(bar) = scene.get_mut(*id) else {
                return false;
            };
            let fill = bar.attrs.fill;
            let t = transition.timeline.progress(now_ms);
            let eased = transition.timeline.ease.apply(t);
            bar.attrs = if t < 1.0 {
                transition.from.lerp(&transition.to, eased)
            } else {
                transition.to
            };
            if !transition.tween_fill {
                bar.attrs.fill = fill;
            }
            if t < 1.0 {
                return true;
            }
            report.finished.push(*id);
            if transition.on_end == OnEnd::Remove {
                report.removed.push(*id);
            }
            false
        });
        for id in &report.removed {
            scene.remove(*id);
        }
        report
    }

    pub fn get(&self, element: ElementId) -> Option<&Transition> {
        self.active.get(&element)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
