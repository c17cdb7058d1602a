use std::io::Write;
use std::time::Duration;

use snapsht_core::{update, AppState, AppViewModel, Msg, Panel};
use snapsht_logging::snapsht_debug;

use crate::effects::EffectRunner;
use crate::render::render;

const TICK: Duration = Duration::from_millis(75);

/// Owns the state machine and feeds it user and client messages.
pub struct Dashboard<W: Write> {
    state: AppState,
    runner: EffectRunner,
    resolve: Box<dyn Fn(&str) -> String>,
    out: W,
    last_frame: Vec<String>,
}

impl<W: Write> Dashboard<W> {
    pub fn new(runner: EffectRunner, resolve: Box<dyn Fn(&str) -> String>, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            resolve,
            out,
            last_frame: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, msg: Msg) -> std::io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);

        if was_dirty {
            self.render()?;
        }
        Ok(())
    }

    /// Pumps client events until `panel` has nothing in flight, then shuts
    /// down any remaining poll.
    pub fn run_until_settled(&mut self, panel: Panel) -> std::io::Result<AppViewModel> {
        while !self.state.view().is_settled(panel) {
            let msg = self.runner.next_msg(TICK).unwrap_or(Msg::Tick);
            self.dispatch(msg)?;
        }
        self.dispatch(Msg::Shutdown)?;
        Ok(self.state.view())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn render(&mut self) -> std::io::Result<()> {
        let frame = render(&self.state.view(), &*self.resolve);
        if frame == self.last_frame {
            return Ok(());
        }
        snapsht_debug!("Rendering {} lines", frame.len());
        for line in &frame {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        self.last_frame = frame;
        Ok(())
    }
}
