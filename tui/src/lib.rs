pub mod adapter;
pub mod app;
pub mod config;
pub mod dialog;
pub mod drag;
pub mod event;
pub mod ui;

pub use crate::app::App;
pub use crate::event::{Event, EventHandler};
