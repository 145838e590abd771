use barflow_protocol::{Point, RenderCommand, TextAlign, ThemeToken};

use crate::scale::{BandScale, LinearScale};

const TICK_SIZE_INNER: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const FONT_SIZE: f64 = 10.0;
const DOMAIN_WIDTH: f64 = 1.0;

/// Render the category axis under the plot, translated to `baseline_y`.
///
/// One tick per band, centred under it, with the band's name as label. The
/// outer ticks are suppressed, so the domain line is a flat rule.
pub fn render_bottom_axis(x: &BandScale, baseline_y: f64) -> Vec<RenderCommand> {
    let (r0, r1) = x.range();
    let mut commands = Vec::with_capacity(x.domain().len() * 2 + 5);
    commands.push(RenderCommand::BeginGroup {
        id: "x-axis".to_string(),
    });
    commands.push(RenderCommand::PushTransform {
        translate: Point::new(0.0, baseline_y),
    });
    commands.push(RenderCommand::DrawLine {
        from: Point::new(r0, 0.0),
        to: Point::new(r1, 0.0),
        color: ThemeToken::AxisLine,
        width: DOMAIN_WIDTH,
    });

    for name in x.domain() {
        let Some(cx) = x.center(name) else {
            continue;
        };
        commands.push(RenderCommand::DrawLine {
            from: Point::new(cx, 0.0),
            to: Point::new(cx, TICK_SIZE_INNER),
            color: ThemeToken::AxisLine,
            width: DOMAIN_WIDTH,
        });
        // Baseline sits 0.71em below the top of the label box.
        commands.push(RenderCommand::DrawText {
            position: Point::new(cx, TICK_SIZE_INNER + TICK_PADDING + FONT_SIZE * 0.71),
            text: name.to_string(),
            color: ThemeToken::AxisText,
            font_size: FONT_SIZE,
            align: TextAlign::Middle,
        });
    }

    commands.push(RenderCommand::PopTransform);
    commands.push(RenderCommand::EndGroup);
    commands
}

/// Render the value axis along the left edge of the plot.
pub fn render_left_axis(y: &LinearScale, tick_count: usize) -> Vec<RenderCommand> {
    let (r0, r1) = y.range();
    let ticks = y.ticks(tick_count);
    let mut commands = Vec::with_capacity(ticks.len() * 2 + 3);
    commands.push(RenderCommand::BeginGroup {
        id: "y-axis".to_string(),
    });
    commands.push(RenderCommand::DrawLine {
        from: Point::new(0.0, r0),
        to: Point::new(0.0, r1),
        color: ThemeToken::AxisLine,
        width: DOMAIN_WIDTH,
    });

    for value in ticks {
        let py = y.apply(value);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(-TICK_SIZE_INNER, py),
            to: Point::new(0.0, py),
            color: ThemeToken::AxisLine,
            width: DOMAIN_WIDTH,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(-(TICK_SIZE_INNER + TICK_PADDING), py + FONT_SIZE * 0.32),
            text: y.tick_format(tick_count, value),
            color: ThemeToken::AxisText,
            font_size: FONT_SIZE,
            align: TextAlign::End,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
