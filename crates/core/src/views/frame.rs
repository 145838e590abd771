use barflow_protocol::RenderCommand;

use crate::layout::ChartLayout;
use crate::scale::ChartScales;
use crate::scene::{Layer, Scene};
use crate::views::axis::{render_bottom_axis, render_left_axis};
use crate::views::bars::render_bars;

/// Full command list for one frame, inside the plot-area translation: the
/// initial bars, the x and y axes, then bars entered by ticks on top.
pub fn render_frame(
    scene: &Scene,
    scales: &ChartScales,
    layout: &ChartLayout,
    tick_count: usize,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(scene.len() + 64);
    commands.push(RenderCommand::PushTransform {
        translate: layout.origin(),
    });
    commands.extend(render_bars(scene, Layer::UnderAxes, "bars"));
    commands.extend(render_bottom_axis(&scales.x, scales.baseline()));
    commands.extend(render_left_axis(&scales.y, tick_count));
    commands.extend(render_bars(scene, Layer::OverAxes, "entered-bars"));
    commands.push(RenderCommand::PopTransform);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::model::{Dataset, Record};
    use crate::views::bars::static_scene;
    use crate::scene::BarPhase;
    use barflow_protocol::{Color, Key, Point};

    fn groups(commands: &[RenderCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::BeginGroup { id } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    fn rect_key(command: &RenderCommand) -> Option<&str> {
        match command {
            RenderCommand::DrawRect { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    #[test]
    fn frame_is_translated_by_the_margin() {
        let dataset = Dataset::new(vec![Record::new("A", 1.0)]).unwrap();
        let config = ChartConfig::default();
        let layout = ChartLayout::new(config.container, config.margin);
        let scales = ChartScales::build(&dataset, &layout, &config);
        let scene = static_scene(&dataset, &scales, Color::BLACK);
        let commands = render_frame(&scene, &scales, &layout, config.tick_count);

        assert_eq!(
            commands.first(),
            Some(&RenderCommand::PushTransform {
                translate: Point::new(40.0, 20.0)
            })
        );
        assert_eq!(commands.last(), Some(&RenderCommand::PopTransform));
        assert_eq!(groups(&commands), ["bars", "x-axis", "y-axis", "entered-bars"]);
    }

    #[test]
    fn entered_bars_paint_over_the_axes() {
        let dataset = Dataset::new(vec![Record::new("A", 1.0), Record::new("B", 2.0)]).unwrap();
        let config = ChartConfig::default();
        let layout = ChartLayout::new(config.container, config.margin);
        let scales = ChartScales::build(&dataset, &layout, &config);
        let mut scene = static_scene(&dataset, &scales, Color::BLACK);
        if let Some(attrs) = scales.bar_attrs(&Record::new("C", 1.5), Color::WHITE) {
            scene.insert(Key::from("C"), 1.5, attrs, BarPhase::Entering);
        }
        let commands = render_frame(&scene, &scales, &layout, config.tick_count);

        let position = |key: &str| commands.iter().position(|c| rect_key(c) == Some(key));
        let y_axis = commands
            .iter()
            .position(|c| matches!(c, RenderCommand::BeginGroup { id } if id == "y-axis"));
        assert!(position("A") < y_axis);
        assert!(position("B") < y_axis);
        assert!(position("C").is_some());
        assert!(position("C") > y_axis);
    }
}
