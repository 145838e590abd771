//! Integration test: drive the letter-frequency chart through several ticks
//! and check the keyed-join invariants on every one.

use std::collections::{BTreeSet, HashSet};

use barflow_core::scene::BarPhase;
use barflow_core::svg::render_svg;
use barflow_core::{AnimationCycle, ChartConfig, CycleDriver, Dataset, Record, parse_dataset};
use barflow_protocol::{Key, RenderCommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn alphabet() -> Dataset {
    parse_dataset(include_bytes!("fixtures/alphabet.csv")).expect("fixture parses")
}

fn indices(list: &[usize]) -> BTreeSet<usize> {
    list.iter().copied().collect()
}

fn names(keys: &[Key]) -> Vec<&str> {
    keys.iter().map(Key::as_str).collect()
}

#[test]
fn alphabet_lays_out_with_nice_domain() {
    let dataset = alphabet();
    assert_eq!(dataset.len(), 26);
    let chart = AnimationCycle::new(dataset, ChartConfig::default());
    assert_eq!(chart.scales().y.domain(), (0.0, 0.13));
    assert_eq!(chart.scales().x.domain().len(), 26);
    assert_eq!(chart.scene().len(), 26);
    assert!(chart.scene().bars().iter().all(|b| b.phase == BarPhase::Static));
}

#[test]
fn three_record_example() {
    let dataset = Dataset::new(vec![
        Record::new("A", 10.0),
        Record::new("B", 20.0),
        Record::new("C", 5.0),
    ])
    .expect("valid dataset");
    let mut chart = AnimationCycle::new(dataset, ChartConfig::default());

    // Live set {A, B}.
    chart.apply_indices(&indices(&[0, 1]), 0.0);
    chart.advance(5_000.0);
    assert_eq!(names(&chart.scene().live_keys()), ["A", "B"]);

    let report = chart.apply_indices(&indices(&[0, 2]), 10_000.0);
    assert_eq!(names(&report.subset), ["A", "C"]);
    assert_eq!(names(&report.plan.enter), ["C"]);
    assert_eq!(names(&report.plan.update), ["A"]);
    assert_eq!(names(&report.plan.exit), ["B"]);
}

#[test]
fn empty_draw_exits_everything() {
    let mut chart = AnimationCycle::new(alphabet(), ChartConfig::default());
    let report = chart.apply_indices(&BTreeSet::new(), 0.0);
    assert_eq!(report.num, 0);
    assert!(report.plan.enter.is_empty() && report.plan.update.is_empty());
    assert_eq!(report.plan.exit.len(), 26);

    chart.advance(2_000.0);
    assert!(chart.scene().is_empty());
}

#[test]
fn same_subset_twice_only_updates() {
    let mut chart = AnimationCycle::new(alphabet(), ChartConfig::default());
    chart.apply_indices(&indices(&[1, 4, 9]), 0.0);
    chart.advance(2_000.0);
    let report = chart.apply_indices(&indices(&[1, 4, 9]), 10_500.0);
    assert!(report.plan.enter.is_empty());
    assert!(report.plan.exit.is_empty());
    assert_eq!(names(&report.plan.update), ["B", "E", "J"]);
}

#[test]
fn out_of_range_indices_are_ignored() {
    let mut chart = AnimationCycle::new(alphabet(), ChartConfig::default());
    let report = chart.apply_indices(&indices(&[0, 26, 400]), 0.0);
    assert_eq!(names(&report.subset), ["A"]);
    assert_eq!(report.plan.exit.len(), 25);
}

#[test]
fn returning_key_is_a_fresh_element() {
    let dataset = Dataset::new(vec![Record::new("A", 1.0), Record::new("B", 2.0)])
        .expect("valid dataset");
    let mut chart = AnimationCycle::new(dataset, ChartConfig::default());
    let original = chart.scene().live("A").map(|b| b.id);

    chart.apply_indices(&indices(&[1]), 0.0);
    // A is still sinking when it comes back.
    chart.advance(500.0);
    let report = chart.apply_indices(&indices(&[0, 1]), 600.0);
    assert_eq!(names(&report.plan.enter), ["A"]);

    let fresh = chart.scene().live("A").expect("A re-entered");
    assert_ne!(Some(fresh.id), original);
    assert_eq!(fresh.attrs.fill, barflow_protocol::Color::WHITE);
    let copies = chart.scene().bars().iter().filter(|b| b.key == "A").count();
    assert_eq!(copies, 2);

    chart.advance(2_600.0);
    assert_eq!(chart.scene().bars().iter().filter(|b| b.key == "A").count(), 1);
}

#[test]
fn random_ticks_keep_join_invariants() {
    let chart = AnimationCycle::new(alphabet(), ChartConfig::default());
    let mut driver = CycleDriver::new(chart, SmallRng::seed_from_u64(42), 0.0);

    let mut now = 0.0;
    for _ in 0..20 {
        let before: HashSet<Key> = driver.cycle().scene().live_keys().into_iter().collect();
        now += 10_500.0;
        let report = driver.frame(now).tick.expect("tick due");

        let enter: HashSet<&Key> = report.plan.enter.iter().collect();
        let update: HashSet<&Key> = report.plan.update.iter().collect();
        let exit: HashSet<&Key> = report.plan.exit.iter().collect();
        assert!(enter.is_disjoint(&update));
        assert!(enter.is_disjoint(&exit));
        assert!(update.is_disjoint(&exit));

        let union: HashSet<&Key> = enter.union(&update).chain(exit.iter()).copied().collect();
        let expected: HashSet<&Key> = before.iter().chain(report.subset.iter()).collect();
        assert_eq!(union, expected);
        assert!(report.num <= 26);
        assert!(report.indices.iter().all(|&i| i < 26));

        now += 2_000.0;
        driver.frame(now);
        let live: Vec<Key> = driver.cycle().scene().live_keys();
        assert_eq!(live.len(), report.subset.len());
        assert_eq!(driver.cycle().scene().len(), live.len());
    }
}

#[test]
fn rendered_frame_is_a_valid_svg() {
    let mut chart = AnimationCycle::new(alphabet(), ChartConfig::default());
    chart.apply_indices(&indices(&[0, 4]), 0.0);
    chart.advance(1_000.0);
    let commands = chart.render();
    let rects = commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::DrawRect { .. }))
        .count();
    assert_eq!(rects, chart.scene().len());

    let canvas = chart.layout().canvas();
    let svg = render_svg(&commands, canvas.width, canvas.height, chart.config().theme);
    assert!(svg.contains(r#"data-key="E""#));
    assert!(svg.contains(">0.13</text>"));
}
