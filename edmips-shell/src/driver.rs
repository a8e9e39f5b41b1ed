//! Batch-stepping run loop.
//!
//! The simulator core is synchronous; continuous execution is a driver
//! concern. [`Driver::run_tick`] executes a bounded batch of steps so a
//! timer-driven caller stays responsive; [`Driver::run`] ticks until one of
//! the stop conditions holds.

use edmips_simulator::{Exceptions, Processor};

/// Up to this many steps are executed per tick
const DEFAULT_BATCH_SIZE: u32 = 1000;

/// Why the run loop came to rest
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The processor halted (syscall)
    Halted,
    /// A step raised exceptions
    Exception,
    /// The configured step limit was exhausted
    StepLimit,
    /// An external stop request arrived
    StopRequested,
}

/// Summary of one [`Driver::run`] call
#[derive(Copy, Clone, Debug)]
pub struct RunOutcome {
    pub reason: StopReason,
    /// Steps executed by this run call
    pub steps: u64,
    /// Mask of the final step, [`Exceptions::NONE`] if it was clean
    pub exceptions: Exceptions,
}

/// Steps a [`Processor`] until it halts, faults, or is told to stop.
pub struct Driver {
    processor: Processor,
    batch_size: u32,
    step_limit: Option<u64>,
    steps_taken: u64,
    stop_requested: bool,
}

impl Driver {
    pub fn new(processor: Processor) -> Self {
        Self {
            processor,
            batch_size: DEFAULT_BATCH_SIZE,
            step_limit: None,
            steps_taken: 0,
            stop_requested: false,
        }
    }

    /// Cap the total number of steps this driver will ever execute
    pub fn set_step_limit(&mut self, limit: Option<u64>) {
        self.step_limit = limit;
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut Processor {
        &mut self.processor
    }

    /// Ask the loop to stop at the next step boundary. An in-progress step is
    /// never interrupted.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Run until a stop condition holds.
    pub fn run(&mut self) -> RunOutcome {
        let mut steps = 0;

        loop {
            if let Some(outcome) = self.run_tick(&mut steps) {
                log::info!(
                    "stopped after {} step(s): {:?} ({:?})",
                    outcome.steps,
                    outcome.reason,
                    outcome.exceptions
                );
                return outcome;
            }
        }
    }

    /// Execute one bounded batch. Returns `Some` when a stop condition was
    /// observed, `None` when the caller should schedule another tick.
    fn run_tick(&mut self, steps: &mut u64) -> Option<RunOutcome> {
        for _ in 0..self.batch_size {
            if self.stop_requested {
                self.stop_requested = false;
                return Some(self.outcome(StopReason::StopRequested, *steps, Exceptions::NONE));
            }

            if self.processor.halted() {
                return Some(self.outcome(StopReason::Halted, *steps, Exceptions::NONE));
            }

            if let Some(limit) = self.step_limit {
                if self.steps_taken >= limit {
                    return Some(self.outcome(StopReason::StepLimit, *steps, Exceptions::NONE));
                }
            }

            let exceptions = self.processor.step();
            self.steps_taken += 1;
            *steps += 1;

            if self.processor.halted() {
                return Some(self.outcome(StopReason::Halted, *steps, exceptions));
            }

            if !exceptions.is_clear() {
                return Some(self.outcome(StopReason::Exception, *steps, exceptions));
            }
        }

        None
    }

    fn outcome(&self, reason: StopReason, steps: u64, exceptions: Exceptions) -> RunOutcome {
        RunOutcome {
            reason,
            steps,
            exceptions,
        }
    }
}
