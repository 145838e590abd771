use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use barflow_core::CycleDriver;
use barflow_protocol::{Point, RenderCommand, TextAlign, Theme, ThemeToken, Viewport};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tracing::debug;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

fn to_color(color: barflow_protocol::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Maps chart container coordinates onto a block of terminal cells.
#[derive(Debug, Clone, Copy)]
struct CellMap {
    area: Rect,
    container: Viewport,
}

impl CellMap {
    fn col_scale(&self) -> f64 {
        f64::from(self.area.width) / self.container.width
    }

    fn row_scale(&self) -> f64 {
        f64::from(self.area.height) / self.container.height
    }

    /// Cell holding a container point, if it is on screen.
    fn to_cell(&self, p: Point) -> Option<(u16, u16)> {
        let col = (p.x * self.col_scale()).floor();
        let row = (p.y * self.row_scale()).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as u16, row as u16);
        if col >= self.area.width || row >= self.area.height {
            return None;
        }
        Some((self.area.x + col, self.area.y + row))
    }

    /// Container point at the centre of a terminal cell.
    fn to_point(&self, column: u16, row: u16) -> Option<Point> {
        if column < self.area.x || row < self.area.y {
            return None;
        }
        let col = f64::from(column - self.area.x) + 0.5;
        let row = f64::from(row - self.area.y) + 0.5;
        Some(Point::new(col / self.col_scale(), row / self.row_scale()))
    }
}

/// Rasterize a command list into `buf`. Transforms are flattened into a
/// running offset; axis lines are skipped in favour of their labels.
fn paint(buf: &mut Buffer, map: CellMap, commands: &[RenderCommand], theme: Theme) {
    let mut stack: Vec<Point> = Vec::new();
    let mut offset = Point::default();
    for cmd in commands {
        match cmd {
            RenderCommand::PushTransform { translate } => {
                stack.push(offset);
                offset = Point::new(offset.x + translate.x, offset.y + translate.y);
            }
            RenderCommand::PopTransform => offset = stack.pop().unwrap_or_default(),
            RenderCommand::DrawRect {
                rect, fill, stroke, ..
            } => {
                let (x0, x1) = (rect.x.min(rect.x + rect.w), rect.x.max(rect.x + rect.w));
                let (y0, y1) = (rect.y.min(rect.y + rect.h), rect.y.max(rect.y + rect.h));
                let from = Point::new(offset.x + x0, offset.y + y0);
                let to = Point::new(offset.x + x1, offset.y + y1);
                let c = map.container;
                if to.x < 0.0 || to.y < 0.0 || from.x >= c.width || from.y >= c.height {
                    continue;
                }
                let (Some((c0, r0)), Some((c1, r1))) = (
                    map.to_cell(clamp_into(from, map.container)),
                    map.to_cell(clamp_into(to, map.container)),
                ) else {
                    continue;
                };
                let fg = to_color(*fill);
                // A clicked bar's outline shows as the cell background.
                let outline = stroke.map(|s| to_color(s.color));
                for y in r0..=r1 {
                    for x in c0..=c1 {
                        let cell = buf[(x, y)].set_char('█').set_fg(fg);
                        if let Some(bg) = outline {
                            cell.set_bg(bg);
                        }
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let p = Point::new(offset.x + position.x, offset.y + position.y);
                let Some((col, row)) = map.to_cell(p) else {
                    continue;
                };
                let len = text.chars().count() as u16;
                let start = match align {
                    TextAlign::Start => col,
                    TextAlign::Middle => col.saturating_sub(len / 2),
                    TextAlign::End => col.saturating_sub(len),
                };
                let fg = to_color(theme.resolve(*color));
                for (i, ch) in text.chars().enumerate() {
                    let x = start + i as u16;
                    if x < map.area.x + map.area.width {
                        buf[(x, row)].set_char(ch).set_fg(fg);
                    }
                }
            }
            RenderCommand::DrawLine { .. }
            | RenderCommand::BeginGroup { .. }
            | RenderCommand::EndGroup => {}
        }
    }
}

/// Pull a point onto the container so partly visible rects are clipped.
fn clamp_into(p: Point, container: Viewport) -> Point {
    const INSET: f64 = 1e-6;
    Point::new(
        p.x.clamp(0.0, container.width - INSET),
        p.y.clamp(0.0, container.height - INSET),
    )
}

/// Run the live player until `q`, `Esc` or Ctrl-C.
pub fn play<R: Rng>(mut driver: CycleDriver<R>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut driver);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn run<R: Rng>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    driver: &mut CycleDriver<R>,
) -> Result<()> {
    let stop = driver.stop_handle();
    let clock = Instant::now();
    let theme = driver.cycle().config().theme;
    let container = driver.cycle().layout().canvas();
    let mut last_map = None;

    while !stop.is_stopped() {
        let now = clock.elapsed().as_secs_f64() * 1000.0;
        driver.frame(now);
        let commands = driver.cycle().render();
        let ticks = driver.cycle().ticks();
        let bars = driver.cycle().scene().len();

        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " barflow | tick {ticks} | {bars} bars | click a bar | q quit "
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            let block = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(to_color(theme.resolve(ThemeToken::Background))));
            frame.render_widget(block, content_area);

            if content_area.width == 0 || content_area.height == 0 {
                return;
            }
            let map = CellMap {
                area: content_area,
                container,
            };
            paint(frame.buffer_mut(), map, &commands, theme);
            last_map = Some(map);
        })?;

        if event::poll(FRAME_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => stop.stop(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        stop.stop();
                    }
                    _ => {}
                },
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let point = last_map.and_then(|map| map.to_point(mouse.column, mouse.row));
                    if let Some(point) = point {
                        let now = clock.elapsed().as_secs_f64() * 1000.0;
                        let hit = driver.cycle_mut().click_at(point, now);
                        debug!(column = mouse.column, row = mouse.row, hit = ?hit, "mouse click");
                    }
                }
                _ => {}
            }
        }
    }
    driver.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> CellMap {
        CellMap {
            area: Rect::new(0, 1, 96, 50),
            container: Viewport::new(960.0, 500.0),
        }
    }

    #[test]
    fn points_and_cells_round_trip() {
        let map = map();
        assert_eq!(map.to_cell(Point::new(0.0, 0.0)), Some((0, 1)));
        assert_eq!(map.to_cell(Point::new(955.0, 495.0)), Some((95, 50)));
        assert_eq!(map.to_cell(Point::new(960.0, 10.0)), None);
        let p = map.to_point(10, 11).unwrap_or_default();
        assert_eq!(map.to_cell(p), Some((10, 11)));
        assert_eq!(map.to_point(3, 0), None);
    }

    #[test]
    fn paints_bars_and_labels() {
        let map = map();
        let mut buf = Buffer::empty(Rect::new(0, 0, 96, 51));
        let commands = vec![
            RenderCommand::PushTransform {
                translate: Point::new(40.0, 20.0),
            },
            RenderCommand::DrawRect {
                rect: barflow_protocol::Rect::new(0.0, 100.0, 20.0, 100.0),
                fill: barflow_protocol::Color::GREEN,
                stroke: None,
                corner_radius: 0.0,
                key: None,
            },
            RenderCommand::DrawText {
                position: Point::new(100.0, 300.0),
                text: "E".to_string(),
                color: ThemeToken::AxisText,
                font_size: 10.0,
                align: TextAlign::Start,
            },
            RenderCommand::PopTransform,
        ];
        paint(&mut buf, map, &commands, Theme::Light);
        assert_eq!(buf[(4, 13)].symbol(), "█");
        assert_eq!(buf[(4, 13)].fg, Color::Rgb(0, 128, 0));
        assert_eq!(buf[(14, 33)].symbol(), "E");
    }
}
