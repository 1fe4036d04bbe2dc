//! Fixed timestep accumulator
//!
//! Decouples the simulation rate from the frame rate: each frame adds its
//! elapsed time and as many `SIM_DT` ticks as fit are run.

use super::state::MatchState;
use super::tick::{TickInput, TickReport, tick};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStepper {
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStepper {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_substeps: max_substeps.max(1),
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Fraction of a tick left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// Run the ticks owed for `frame_dt` seconds. A throw request is consumed
    /// by the first substep only. Returns the number of ticks run and their
    /// merged report.
    pub fn advance(
        &mut self,
        state: &mut MatchState,
        input: &TickInput,
        frame_dt: f32,
    ) -> (u32, TickReport) {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }

        let mut report = TickReport::default();
        let mut substeps = 0;
        let mut input = input.clone();
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            report.merge(tick(state, &input, self.dt));
            input.throw_at = None;
            self.accumulator -= self.dt;
            substeps += 1;
        }

        // Drop time we can't catch up on (spiral of death)
        if substeps == self.max_substeps && self.accumulator >= self.dt {
            log::warn!(
                "Dropping {:.3}s of simulation time after {} substeps",
                self.accumulator,
                substeps
            );
            self.accumulator = 0.0;
        }

        (substeps, report)
    }
}
