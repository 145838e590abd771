pub mod config;
pub mod cycle;
pub mod interaction;
pub mod join;
pub mod layout;
pub mod loader;
pub mod model;
pub mod scale;
pub mod scene;
pub mod schedule;
pub mod svg;
pub mod transition;
pub mod views;

pub use config::{ChartConfig, ConfigError, CycleConfig, InteractionConfig};
pub use cycle::{AnimationCycle, SubsetDraw, TickReport};
pub use loader::{CsvOptions, LoadError, load_dataset, parse_dataset};
pub use model::{Dataset, Record};
pub use schedule::{CycleDriver, FrameReport, StopHandle, TickSchedule};
