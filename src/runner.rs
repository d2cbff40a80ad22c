//! The outer run loop.
//!
//! Executes the machine in ticks of `steps_per_tick` instructions and,
//! when pacing is on, sleeps out the remainder of each tick so the program
//! runs at a steady rate.

use crate::computer::Computer;
use crate::config::RunConfig;
use crate::cpu::CpuError;
use std::time::Instant;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_steps` instructions were executed.
    StepLimit,
    /// The program reached its end-of-program loop.
    Halted,
}

/// Outcome of [`Runner::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub ticks: u64,
    pub reason: StopReason,
}

/// Drives a [`Computer`] according to a [`RunConfig`].
#[derive(Debug, Clone)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Run until the step limit, a halt, or the first CPU error.
    ///
    /// With no step limit and `stop_on_halt` off this only returns on error.
    pub fn run(&self, computer: &mut Computer) -> Result<RunSummary, CpuError> {
        self.run_with(computer, |_| {})
    }

    /// Like [`Runner::run`], calling `on_tick` after every tick.
    pub fn run_with<F>(
        &self,
        computer: &mut Computer,
        mut on_tick: F,
    ) -> Result<RunSummary, CpuError>
    where
        F: FnMut(&Computer),
    {
        let tick = self.config.tick_duration();
        let mut steps = 0u64;
        let mut ticks = 0u64;

        log::info!(
            "running {} steps/tick at {} ticks/s (paced: {})",
            self.config.steps_per_tick, self.config.ticks_per_second, self.config.paced
        );

        loop {
            let started = Instant::now();

            let mut budget = self.config.steps_per_tick;
            if let Some(max) = self.config.max_steps {
                budget = budget.min(max - steps);
            }

            for _ in 0..budget {
                if self.config.stop_on_halt && computer.is_halted() {
                    log::info!(
                        "program halted at PC={} after {} steps",
                        computer.registers().pc,
                        steps
                    );
                    on_tick(computer);
                    return Ok(RunSummary { steps, ticks: ticks + 1, reason: StopReason::Halted });
                }

                if let Err(e) = computer.step() {
                    log::warn!("cpu error after {} steps: {}", steps, e);
                    return Err(e);
                }
                steps += 1;
            }

            ticks += 1;
            on_tick(computer);
            log::trace!("tick {}: {} steps, {}", ticks, steps, computer.registers());

            if self.config.max_steps.is_some_and(|max| steps >= max) {
                return Ok(RunSummary { steps, ticks, reason: StopReason::StepLimit });
            }

            if self.config.paced {
                if let Some(rest) = tick.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }
    }
}
