//! Terminal recipe form
//!
//! Scalar fields on top, the ingredient and instruction row groups below.
//! Rows are managed by the core list editor; this module only maps keys
//! to editor actions and draws the result.

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use terminal::run;
