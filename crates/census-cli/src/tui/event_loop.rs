use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event};

#[derive(Debug, derive_more::From, derive_more::IsVariant)]
pub(super) enum TuiEvent {
    Tick,
    Render,
    Input(Event),
}

/// Produces ticks at a fixed interval, renders when dirty, and otherwise
/// waits for terminal input.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            // first frame
            dirty: true,
        }
    }
}

impl EventLoop {
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Blocks until the next tick is due, a render is pending, or input arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let now = Instant::now();
            let timeout = match self.tick_interval {
                Some(interval) => {
                    let due = self.last_tick + interval;
                    if now >= due {
                        self.last_tick = now;
                        return Ok(TuiEvent::Tick);
                    }
                    Some(due - now)
                }
                None => None,
            };

            let ready = match timeout {
                Some(timeout) => event::poll(timeout)?,
                None => true,
            };
            if ready {
                self.dirty = true;
                return Ok(event::read()?.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_renders() {
        let mut events = EventLoop::default();
        assert!(events.next().unwrap().is_render());
    }

    #[test]
    fn test_due_tick_comes_before_input() {
        let mut events = EventLoop {
            tick_interval: Some(Duration::ZERO),
            last_tick: Instant::now(),
            dirty: false,
        };
        assert!(events.next().unwrap().is_tick());

        events.mark_dirty();
        assert!(events.next().unwrap().is_render());
    }
}
