pub mod axis;
pub mod bars;
pub mod frame;
