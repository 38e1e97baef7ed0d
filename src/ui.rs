//! Terminal front-end: a sidebar menu, a content pane for the chosen entry and
//! a status footer, drawn with Ratatui over a crossterm backend.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
