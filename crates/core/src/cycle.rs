//! The enter / update / exit animation cycle.
//!
//! Every tick draws a random subset of the dataset, joins it by name against
//! the bars on screen and animates the difference: new bars drop in from
//! above fading white to green, persisting bars turn black, leaving bars turn
//! red and sink out of the plot before being removed.

use std::collections::BTreeSet;

use barflow_protocol::{Key, Point, RenderCommand, Stroke};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::ChartConfig;
use crate::interaction::{click_target, hit_test};
use crate::join::{JoinPlan, reconcile};
use crate::layout::ChartLayout;
use crate::model::Dataset;
use crate::scale::ChartScales;
use crate::scene::{BarPhase, Scene};
use crate::transition::{AdvanceReport, Animator, OnEnd, Timeline};
use crate::views::bars::static_scene;
use crate::views::frame::render_frame;

/// Random draw for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetDraw {
    /// How many indices were drawn, before duplicates collapsed.
    pub num: usize,
    pub indices: BTreeSet<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,
    pub num: usize,
    pub indices: BTreeSet<usize>,
    /// Names of the selected records, in dataset order.
    pub subset: Vec<Key>,
    pub plan: JoinPlan,
}

/// Chart state carried from tick to tick.
#[derive(Debug, Clone)]
pub struct AnimationCycle {
    dataset: Dataset,
    config: ChartConfig,
    layout: ChartLayout,
    scales: ChartScales,
    scene: Scene,
    animator: Animator,
    ticks: u64,
}

impl AnimationCycle {
    /// Lay out the chart and draw the initial static bars.
    pub fn new(dataset: Dataset, config: ChartConfig) -> Self {
        let layout = ChartLayout::new(config.container, config.margin);
        let scales = ChartScales::build(&dataset, &layout, &config);
        let scene = static_scene(&dataset, &scales, config.base_fill);
        debug!(
            records = dataset.len(),
            inner_width = layout.inner_width,
            inner_height = layout.inner_height,
            y_domain = ?scales.y.domain(),
            "chart laid out"
        );
        Self {
            dataset,
            config,
            layout,
            scales,
            scene,
            animator: Animator::new(),
            ticks: 0,
        }
    }

    /// Draw `num` in `[0, len]`, then `num` indices in `[0, len)`.
    pub fn draw_subset<R: Rng + ?Sized>(&self, rng: &mut R) -> SubsetDraw {
        let len = self.dataset.len();
        let num = rng.gen_range(0..=len);
        let indices = if len == 0 {
            BTreeSet::new()
        } else {
            (0..num).map(|_| rng.gen_range(0..len)).collect()
        };
        SubsetDraw { num, indices }
    }

    /// Run one full tick with a fresh random subset.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now_ms: f64) -> TickReport {
        let draw = self.draw_subset(rng);
        self.apply_draw(draw.num, draw.indices, now_ms)
    }

    /// Run a tick for a fixed index set.
    pub fn apply_indices(&mut self, indices: &BTreeSet<usize>, now_ms: f64) -> TickReport {
        self.apply_draw(indices.len(), indices.clone(), now_ms)
    }

    fn apply_draw(&mut self, num: usize, indices: BTreeSet<usize>, now_ms: f64) -> TickReport {
        self.ticks += 1;
        let subset = self.dataset.subset(&indices);
        let plan = reconcile(&self.scene.live_keys(), &subset);

        let cycle = &self.config.cycle;
        let timeline = Timeline::new(now_ms, cycle.duration_ms as f64, cycle.ease);

        for record in subset.iter().filter(|r| plan.enter.contains(&r.name)) {
            let (Some(start), Some(rest)) = (
                self.scales.bar_attrs(record, cycle.enter_from),
                self.scales.bar_attrs(record, cycle.enter_to),
            ) else {
                warn!(name = %record.name, "record has no band; not entering");
                continue;
            };
            let mut start = start;
            start.y -= cycle.enter_offset;
            let id = self
                .scene
                .insert(record.name.clone(), record.value, start, BarPhase::Entering);
            if let Some(bar) = self.scene.get_mut(id) {
                bar.clickable = true;
            }
            self.animator
                .start(&self.scene, id, rest, &timeline, OnEnd::Keep);
        }

        for key in &plan.update {
            if let Some(bar) = self.scene.live_mut(key) {
                bar.attrs.fill = cycle.update_fill;
                bar.phase = BarPhase::Persisting;
                bar.clickable = true;
            }
        }

        let drop = self.layout.inner_height * cycle.exit_drop_factor;
        for key in &plan.exit {
            let Some(bar) = self.scene.live_mut(key) else {
                continue;
            };
            bar.attrs.fill = cycle.exit_from;
            bar.phase = BarPhase::Exiting;
            bar.clickable = false;
            let id = bar.id;
            let mut target = bar.attrs;
            target.y = self.scales.y.apply(bar.value) + drop;
            target.fill = cycle.exit_to;
            self.animator
                .start(&self.scene, id, target, &timeline, OnEnd::Remove);
        }

        let report = TickReport {
            tick: self.ticks,
            num,
            indices,
            subset: subset.iter().map(|r| r.name.clone()).collect(),
            plan,
        };
        info!(
            tick = report.tick,
            num = report.num,
            selected = report.subset.len(),
            enter = report.plan.enter.len(),
            update = report.plan.update.len(),
            exit = report.plan.exit.len(),
            "tick"
        );
        for record in &subset {
            debug!(tick = report.tick, name = %record.name, value = record.value, "selected");
        }
        report
    }

    /// Step running transitions to `now_ms`.
    pub fn advance(&mut self, now_ms: f64) -> AdvanceReport {
        let report = self.animator.advance(&mut self.scene, now_ms);
        if !report.removed.is_empty() {
            debug!(removed = report.removed.len(), "exit transitions finished");
        }
        report
    }

    /// Handle a click at `point` in container coordinates. Returns the key
    /// of the bar that was hit.
    pub fn click_at(&mut self, point: Point, now_ms: f64) -> Option<Key> {
        let plot = self.layout.to_plot(point);
        let id = hit_test(&self.scene, plot)?;
        let interaction = &self.config.interaction;
        let bar = self.scene.get_mut(id)?;
        bar.stroke = Some(Stroke::new(interaction.stroke, interaction.stroke_width));
        let target = click_target(bar, &self.scales, interaction);
        let key = bar.key.clone();

        let timeline = Timeline::new(
            now_ms,
            interaction.duration_ms as f64,
            self.config.cycle.ease,
        );
        self.animator
            .start_geometry(&self.scene, id, target, &timeline, OnEnd::Keep);
        info!(name = %key, x = point.x, y = point.y, "bar clicked");
        Some(key)
    }

    /// Commands for the current frame.
    pub fn render(&self) -> Vec<RenderCommand> {
        render_frame(
            &self.scene,
            &self.scales,
            &self.layout,
            self.config.tick_count,
        )
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn scales(&self) -> &ChartScales {
        &self.scales
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
