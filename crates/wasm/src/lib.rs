use std::sync::{Mutex, MutexGuard, PoisonError};

use barflow_core::svg;
use barflow_core::{AnimationCycle, ChartConfig, CycleDriver, parse_dataset};
use barflow_protocol::{Point, RenderCommand, Theme, Viewport};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

type Driver = CycleDriver<SmallRng>;

static CHARTS: Mutex<Vec<Driver>> = Mutex::new(Vec::new());

fn charts() -> MutexGuard<'static, Vec<Driver>> {
    CHARTS.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_chart<T>(handle: usize, f: impl FnOnce(&mut Driver) -> T) -> Result<T, String> {
    let mut charts = charts();
    let driver = charts
        .get_mut(handle)
        .ok_or_else(|| format!("invalid chart handle {handle}"))?;
    Ok(f(driver))
}

/// One animation frame as handed to the page.
#[derive(Debug, Serialize)]
struct FrameOutput {
    /// Tick number when a tick fired on this frame.
    tick: Option<u64>,
    commands: Vec<RenderCommand>,
}

fn create_chart(csv: &[u8], width: f64, height: f64, seed: u64) -> Result<usize, String> {
    let config = ChartConfig {
        container: Viewport::new(width, height),
        ..ChartConfig::default()
    };
    config.validate().map_err(|e| e.to_string())?;
    let dataset = parse_dataset(csv).map_err(|e| e.to_string())?;
    let cycle = AnimationCycle::new(dataset, config);
    let mut charts = charts();
    charts.push(CycleDriver::new(cycle, SmallRng::seed_from_u64(seed), 0.0));
    Ok(charts.len() - 1)
}

fn frame_json(handle: usize, now_ms: f64) -> Result<String, String> {
    let output = with_chart(handle, |driver| {
        let report = driver.frame(now_ms);
        FrameOutput {
            tick: report.tick.map(|t| t.tick),
            commands: driver.cycle().render(),
        }
    })?;
    serde_json::to_string(&output).map_err(|e| e.to_string())
}

fn svg_for(handle: usize, dark: bool) -> Result<String, String> {
    with_chart(handle, |driver| {
        let cycle = driver.cycle();
        let canvas = cycle.layout().canvas();
        let theme = if dark { Theme::Dark } else { cycle.config().theme };
        svg::render_svg(&cycle.render(), canvas.width, canvas.height, theme)
    })
}

/// Parse a CSV dataset and lay out a chart in a `width` x `height`
/// container. Returns a handle for later calls.
#[wasm_bindgen]
pub fn load_chart(csv: &[u8], width: f64, height: f64, seed: u64) -> Result<usize, JsError> {
    create_chart(csv, width, height, seed).map_err(|e| JsError::new(&e))
}

/// Advance the chart to `now_ms` (the page clock, starting at 0 when the
/// chart was loaded) and return `{ tick, commands }` as JSON.
#[wasm_bindgen]
pub fn frame(handle: usize, now_ms: f64) -> Result<String, JsError> {
    frame_json(handle, now_ms).map_err(|e| JsError::new(&e))
}

/// Forward a click in container coordinates. Returns the clicked bar's name.
#[wasm_bindgen]
pub fn click(handle: usize, x: f64, y: f64, now_ms: f64) -> Result<Option<String>, JsError> {
    with_chart(handle, |driver| {
        driver
            .cycle_mut()
            .click_at(Point::new(x, y), now_ms)
            .map(|key| key.to_string())
    })
    .map_err(|e| JsError::new(&e))
}

/// Stop scheduling ticks. Running transitions still finish on later frames.
#[wasm_bindgen]
pub fn stop(handle: usize) -> Result<(), JsError> {
    with_chart(handle, |driver| driver.stop()).map_err(|e| JsError::new(&e))
}

/// Current frame as a standalone SVG document.
#[wasm_bindgen]
pub fn render_svg(handle: usize, dark: bool) -> Result<String, JsError> {
    svg_for(handle, dark).map_err(|e| JsError::new(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"name,value\nA,10\nB,20\nC,5\n";

    #[test]
    fn frames_tick_on_the_default_period() {
        let handle = create_chart(CSV, 960.0, 500.0, 3).unwrap();
        let first: serde_json::Value =
            serde_json::from_str(&frame_json(handle, 0.0).unwrap()).unwrap();
        assert!(first["tick"].is_null());
        assert!(first["commands"].as_array().is_some_and(|c| !c.is_empty()));

        let due: serde_json::Value =
            serde_json::from_str(&frame_json(handle, 10_500.0).unwrap()).unwrap();
        assert_eq!(due["tick"], 1);

        with_chart(handle, |driver| driver.stop()).unwrap();
        let after: serde_json::Value =
            serde_json::from_str(&frame_json(handle, 50_000.0).unwrap()).unwrap();
        assert!(after["tick"].is_null());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(create_chart(b"name,value\nA,abc\n", 960.0, 500.0, 0).is_err());
        assert!(create_chart(CSV, 0.0, 500.0, 0).is_err());
        assert!(frame_json(usize::MAX, 0.0).is_err());
    }

    #[test]
    fn svg_document_carries_every_bar() {
        let handle = create_chart(CSV, 960.0, 500.0, 9).unwrap();
        let svg = svg_for(handle, true).unwrap();
        assert_eq!(svg.matches("data-key=").count(), 3);
    }
}
