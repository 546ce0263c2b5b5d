use std::time::Duration;

use crate::tui::{
    App,
    event_loop::{EventLoop, TuiEvent},
};

/// Terminal session that runs an [`App`] until it asks to exit.
#[derive(Debug, Default)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time between [`App::update`] calls.
    pub fn set_tick_interval(&mut self, interval: Duration) {
        self.events.set_tick_interval(Some(interval));
    }

    /// Runs `app` on the alternate screen, restoring the terminal afterwards.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        if app.update(&mut self) {
                            self.events.mark_dirty();
                        }
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Input(event) => app.handle_event(&mut self, &event),
                }
            }
            Ok(())
        })
    }
}
