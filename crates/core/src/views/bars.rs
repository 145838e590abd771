use barflow_protocol::{Color, RenderCommand};

use crate::model::Dataset;
use crate::scale::ChartScales;
use crate::scene::{BarPhase, Layer, Scene};

/// Scene holding one resting bar per record, as drawn before the first tick.
///
/// These bars are not clickable until a tick joins them.
pub fn static_scene(dataset: &Dataset, scales: &ChartScales, fill: Color) -> Scene {
    let mut scene = Scene::new();
    for record in dataset.records() {
        if let Some(attrs) = scales.bar_attrs(record, fill) {
            scene.insert(record.name.clone(), record.value, attrs, BarPhase::Static);
        }
    }
    scene
}

/// One `DrawRect` per bar on `layer`, in paint order, wrapped in a group
/// named `group`.
pub fn render_bars(scene: &Scene, layer: Layer, group: &str) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(scene.len() + 2);
    commands.push(RenderCommand::BeginGroup {
        id: group.to_string(),
    });
    let bars = scene.bars().iter().filter(|bar| bar.layer == layer);
    commands.extend(bars.map(|bar| RenderCommand::DrawRect {
        rect: bar.attrs.rect(),
        fill: bar.attrs.fill,
        stroke: bar.stroke,
        corner_radius: bar.attrs.corner_radius,
        key: Some(bar.key.clone()),
    }));
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::layout::ChartLayout;
    use crate::model::Record;

    #[test]
    fn static_bars_rest_on_the_baseline() {
        let dataset = Dataset::new(vec![Record::new("A", 10.0), Record::new("B", 20.0)]).unwrap();
        let config = ChartConfig::default();
        let layout = ChartLayout::new(config.container, config.margin);
        let scales = ChartScales::build(&dataset, &layout, &config);
        let scene = static_scene(&dataset, &scales, Color::BLACK);

        assert_eq!(scene.len(), 2);
        for bar in scene.bars() {
            assert_eq!(bar.phase, BarPhase::Static);
            assert!(!bar.clickable);
            assert_eq!(bar.layer, Layer::UnderAxes);
            assert!((bar.attrs.y + bar.attrs.height - scales.baseline()).abs() < 1e-9);
        }
        assert_eq!(render_bars(&scene, Layer::UnderAxes, "bars").len(), 4);
        assert_eq!(render_bars(&scene, Layer::OverAxes, "entered-bars").len(), 2);
    }
}
