//! Desktop presentation layer: panels, the story view and chart rendering.

pub mod panels;
pub mod plot;
pub mod story;
