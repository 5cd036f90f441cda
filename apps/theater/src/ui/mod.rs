//! UI layer for the terminal theater: app shell, input, theme presets, and views.

pub mod app;
pub mod input;
pub mod theme;
pub mod view;

pub use app::TheaterApp;
