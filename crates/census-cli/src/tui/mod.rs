//! A small terminal runtime: ticks poll application state, and the screen is
//! redrawn only when input arrived or a tick reported a change.

use crossterm::event::Event;
use ratatui::Frame;

pub use self::runner::Tui;

mod event_loop;
mod runner;

/// Application driven by [`Tui::run`].
pub trait App {
    /// Called once before the first event. Use it to set the tick rate.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles key input, resizes and other terminal events.
    fn handle_event(&mut self, tui: &mut Tui, event: &Event);

    /// Called on every tick; returns `true` if the screen needs a redraw.
    fn update(&mut self, tui: &mut Tui) -> bool;

    fn draw(&self, frame: &mut Frame);
}
