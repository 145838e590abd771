//! Band and linear scales: the mapping from data space to pixels.
//!
//! Both follow the d3 conventions the chart was designed around, so bar
//! spacing, "nice" domains and tick positions match what a browser would draw.

use std::collections::HashMap;

use barflow_protocol::{Color, Key};

use crate::config::ChartConfig;
use crate::layout::ChartLayout;
use crate::model::{Dataset, Record};
use crate::scene::BarAttrs;

/// Maps discrete categories to evenly spaced bands along a pixel range.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<Key>,
    lookup: HashMap<Key, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Build a band scale over `domain` (first occurrence wins) with no padding.
    pub fn new(domain: impl IntoIterator<Item = Key>, range: (f64, f64)) -> Self {
        let mut keys = Vec::new();
        let mut lookup = HashMap::new();
        for key in domain {
            if !lookup.contains_key(&key) {
                lookup.insert(key.clone(), keys.len());
                keys.push(key);
            }
        }
        let mut scale = Self {
            domain: keys,
            lookup,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        scale.rescale();
        scale
    }

    /// Set inner and outer padding together, as a fraction of the step.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self.rescale();
        self
    }

    /// Leftover outer space is split evenly between both ends.
    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (lo, hi) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let span = hi - lo;
        self.step = span / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.start = lo + (span - self.step * (n - self.padding_inner)) / 2.0;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
    }

    /// Left edge of the band for `name`, or `None` if it is not in the domain.
    pub fn position(&self, name: &str) -> Option<f64> {
        let &i = self.lookup.get(name)?;
        let n = self.domain.len();
        // A reversed range lays bands out from the right.
        let slot = if self.range.1 < self.range.0 { n - 1 - i } else { i };
        Some(self.start + self.step * slot as f64)
    }

    /// Centre of the band for `name`; where an axis tick goes.
    pub fn center(&self, name: &str) -> Option<f64> {
        self.position(name).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[Key] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Continuous numeric domain mapped linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Extend the domain outward to round tick boundaries (10 ticks).
    pub fn nice(self) -> Self {
        self.nice_with(10)
    }

    pub fn nice_with(mut self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        let reversed = d1 < d0;
        let (mut start, mut stop) = if reversed { (d1, d0) } else { (d0, d1) };
        if !start.is_finite() || !stop.is_finite() || start == stop {
            return self;
        }
        let mut prestep = None;

        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if prestep == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                return self;
            }
            prestep = Some(step);
        }

        // `ceil` of a small negative number yields -0.0; keep labels clean.
        let (start, stop) = (start + 0.0, stop + 0.0);
        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    /// Roughly `count` evenly spaced, human-readable values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        ticks(d0, d1, count as f64)
    }

    /// Label for `value` using the precision implied by the tick step.
    pub fn tick_format(&self, count: usize, value: f64) -> String {
        let (d0, d1) = self.domain;
        let step = tick_step(d0, d1, count as f64);
        let precision = if step > 0.0 && step.is_finite() {
            (-decimal_exponent(step)).max(0) as usize
        } else {
            0
        };
        format_grouped(value, precision)
    }
}

/// `[i1, i2, inc]` from d3's tick specification: ticks are `i * inc` for a
/// positive increment and `i / -inc` for a negative one, which keeps
/// fractional steps exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round();
        i2 = (stop / step).round();
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    if inc < 0.0 { 1.0 / -inc } else { inc }
}

/// Base-10 exponent of `x` as scientific notation prints it (`0.01` -> -2),
/// immune to `log10` landing a hair below an integer.
fn decimal_exponent(x: f64) -> i32 {
    format!("{:e}", x.abs())
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0)
}

fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if count.is_nan() || count <= 0.0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    if i1.is_nan() || i2.is_nan() || i2 < i1 {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0) as usize;
    let at = |k: usize| {
        let i = i1 + k as f64;
        if inc < 0.0 { i / -inc } else { i * inc }
    };
    if reverse {
        (0..n).map(|k| at(n - 1 - k)).collect()
    } else {
        (0..n).map(at).collect()
    }
}

/// Fixed-point formatting with `,` thousands separators.
fn format_grouped(value: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// The two scales every frame is drawn with, built once from the full dataset.
#[derive(Debug, Clone)]
pub struct ChartScales {
    pub x: BandScale,
    pub y: LinearScale,
}

impl ChartScales {
    pub fn build(dataset: &Dataset, layout: &ChartLayout, config: &ChartConfig) -> Self {
        let x = BandScale::new(dataset.names().cloned(), (0.0, layout.inner_width))
            .padding(config.band_padding);
        let mut y = LinearScale::new(dataset.extent(), (layout.inner_height, 0.0));
        if config.nice {
            y = y.nice_with(config.tick_count);
        }
        Self { x, y }
    }

    /// Pixel row of the zero value; bars grow up from here.
    pub fn baseline(&self) -> f64 {
        self.y.apply(0.0)
    }

    /// Resting geometry of the bar for `record`, filled with `fill`.
    pub fn bar_attrs(&self, record: &Record, fill: Color) -> Option<BarAttrs> {
        let x = self.x.position(&record.name)?;
        let y = self.y.apply(record.value);
        Some(BarAttrs {
            x,
            y,
            width: self.x.bandwidth(),
            height: self.baseline() - y,
            corner_radius: 0.0,
            fill,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn band_layout_with_padding() {
        let keys = ["A", "B", "C"].map(Key::from);
        let scale = BandScale::new(keys, (0.0, 310.0)).padding(0.1);
        // step = 310 / (3 - 0.1 + 0.2) = 100, bands start at 0.1 * step.
        assert!(close(scale.step(), 100.0));
        assert!(close(scale.bandwidth(), 90.0));
        assert!(close(scale.position("A").unwrap(), 10.0));
        assert!(close(scale.position("C").unwrap(), 210.0));
        assert!(close(scale.center("B").unwrap(), 155.0));
        assert_eq!(scale.position("Z"), None);
    }

    #[test]
    fn band_domain_is_deduplicated_in_order() {
        let keys = ["B", "A", "B", "C"].map(Key::from);
        let scale = BandScale::new(keys, (0.0, 100.0));
        let names: Vec<&str> = scale.domain().iter().map(Key::as_str).collect();
        assert_eq!(names, ["B", "A", "C"]);
        assert!(close(scale.step(), 100.0 / 3.0));
    }

    #[test]
    fn band_without_padding_fills_range() {
        let scale = BandScale::new(["X", "Y"].map(Key::from), (0.0, 50.0));
        assert!(close(scale.position("X").unwrap(), 0.0));
        assert!(close(scale.bandwidth(), 25.0));
    }

    #[test]
    fn nice_rounds_letter_frequencies() {
        let y = LinearScale::new((0.00074, 0.12702), (450.0, 0.0)).nice();
        let (d0, d1) = y.domain();
        assert!(close(d0, 0.0), "d0={d0}");
        assert!(close(d1, 0.13), "d1={d1}");
        assert!(close(y.apply(0.13), 0.0));
        assert!(close(y.apply(0.0), 450.0));
    }

    #[test]
    fn nice_on_integer_domains() {
        let y = LinearScale::new((3.0, 97.0), (100.0, 0.0)).nice();
        assert_eq!(y.domain(), (0.0, 100.0));
        // Step 2 pulls the lower bound down to an even number.
        let y = LinearScale::new((5.0, 20.0), (100.0, 0.0)).nice();
        assert_eq!(y.domain(), (4.0, 20.0));
    }

    #[test]
    fn ticks_are_round_numbers() {
        let y = LinearScale::new((0.0, 0.13), (450.0, 0.0));
        let ticks = y.ticks(10);
        assert_eq!(ticks.len(), 14);
        assert!(close(ticks[0], 0.0));
        assert!(close(ticks[13], 0.13));
        assert_eq!(y.tick_format(10, ticks[5]), "0.05");

        let big = LinearScale::new((0.0, 20_000.0), (1.0, 0.0));
        assert_eq!(big.ticks(5), vec![0.0, 5_000.0, 10_000.0, 15_000.0, 20_000.0]);
        assert_eq!(big.tick_format(5, 15_000.0), "15,000");
    }

    #[test]
    fn degenerate_domain_maps_to_midpoint() {
        let y = LinearScale::new((4.0, 4.0), (100.0, 0.0));
        assert!(close(y.apply(4.0), 50.0));
        assert_eq!(y.ticks(10), vec![4.0]);
    }

    #[test]
    fn grouped_formatting() {
        assert_eq!(format_grouped(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(-0.0001, 2), "0.00");
        assert_eq!(format_grouped(-1500.0, 0), "-1,500");
    }
}
