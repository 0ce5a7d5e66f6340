pub mod plan;
pub mod ui;
