//! Real-time driver around a [`Simulator`].

use da_core::Real;
use tracing::{debug, info};

use crate::clock::SimulationClock;
use crate::error::SimResult;
use crate::sinks::OutputTable;
use crate::simulator::Simulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    Paused,
    /// The end point was reached. Terminal.
    Finished,
}

/// Runs a simulator against elapsed time, up to an optional end point.
#[derive(Debug)]
pub struct SimulationRunner {
    simulator: Simulator,
    clock: SimulationClock,
    state: RunState,
    /// Total ticks after which the run finishes.
    end_point: Option<u64>,
}

impl SimulationRunner {
    pub fn new(simulator: Simulator, clock: SimulationClock, end_point: Option<u64>) -> Self {
        Self {
            simulator,
            clock,
            state: RunState::Stopped,
            end_point,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn has_finished(&self) -> bool {
        self.state == RunState::Finished
    }

    pub fn run(&mut self) {
        self.transition(RunState::Running);
    }

    pub fn pause(&mut self) {
        self.transition(RunState::Paused);
    }

    /// Stop and rewind to tick zero.
    pub fn stop(&mut self) {
        if self.transition(RunState::Stopped) {
            self.simulator.reset();
            self.clock.reset();
        }
    }

    fn transition(&mut self, to: RunState) -> bool {
        if self.state == RunState::Finished {
            return false;
        }
        if self.state != to {
            debug!(from = ?self.state, ?to, "runner state change");
        }
        self.state = to;
        true
    }

    /// Account for `dt` seconds of wall-clock time and run the ticks that
    /// became due. Time passes only while running. Returns the ticks run.
    pub fn advance(&mut self, dt: f64) -> SimResult<u64> {
        if self.state != RunState::Running {
            return Ok(0);
        }
        let mut due = self.clock.advance(dt);
        if let Some(end) = self.end_point {
            due = due.min(end.saturating_sub(self.simulator.tick()));
        }
        self.simulator.run(due)?;

        if self.end_point.is_some_and(|end| self.simulator.tick() >= end) {
            info!(ticks = self.simulator.tick(), "simulation finished");
            self.state = RunState::Finished;
        }
        Ok(due)
    }

    pub fn set_motor_rotation(&mut self, rotation: Real) -> SimResult<()> {
        self.simulator.set_motor_rotation(rotation)
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn output_tables(&self) -> impl Iterator<Item = &OutputTable> {
        self.simulator.output_tables()
    }

    pub fn into_simulator(self) -> Simulator {
        self.simulator
    }
}
