//! Onboarding explainer: a short auto-advancing overlay shown on first load.
//!
//! Steps advance once per second for five seconds, then the overlay plays a
//! close animation and dismisses. The engine never owns timers — each
//! transition reports the delay the host should schedule before calling
//! [`Explainer::timer_fired`] again. Manual dismissal skips straight to the
//! close animation.

#[cfg(test)]
#[path = "explainer_test.rs"]
mod explainer_test;

use crate::consts::{EXPLAINER_CLOSE_MS, EXPLAINER_STEP_COUNT, EXPLAINER_STEP_MS};

/// Lifecycle phase of the explainer overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainerPhase {
    /// Showing a step; auto-advance timer pending.
    Running,
    /// Close animation playing; dismiss grace timer pending.
    Closing,
    /// Fully dismissed; the host fires its dismiss callback once.
    Dismissed,
}

/// What the host should schedule after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainerTimer {
    /// Call `timer_fired` again after this many milliseconds.
    Schedule(u32),
    /// Nothing pending; the overlay is done.
    None,
}

/// State machine for the onboarding explainer.
#[derive(Debug)]
pub struct Explainer {
    step: usize,
    phase: ExplainerPhase,
}

impl Default for Explainer {
    fn default() -> Self {
        Self { step: 0, phase: ExplainerPhase::Running }
    }
}

impl Explainer {
    /// Start at the first step. The host schedules the returned delay.
    #[must_use]
    pub fn start() -> (Self, ExplainerTimer) {
        (Self::default(), ExplainerTimer::Schedule(EXPLAINER_STEP_MS))
    }

    /// The pending timer elapsed: advance a step, begin closing after the
    /// last one, or finish the close grace.
    pub fn timer_fired(&mut self) -> ExplainerTimer {
        match self.phase {
            ExplainerPhase::Running => {
                if self.step + 1 < EXPLAINER_STEP_COUNT {
                    self.step += 1;
                    ExplainerTimer::Schedule(EXPLAINER_STEP_MS)
                } else {
                    self.phase = ExplainerPhase::Closing;
                    ExplainerTimer::Schedule(EXPLAINER_CLOSE_MS)
                }
            }
            ExplainerPhase::Closing => {
                self.phase = ExplainerPhase::Dismissed;
                ExplainerTimer::None
            }
            ExplainerPhase::Dismissed => ExplainerTimer::None,
        }
    }

    /// User closed the overlay early: skip to the close animation. A stale
    /// auto-advance timer firing afterwards completes the close instead.
    pub fn dismiss(&mut self) -> ExplainerTimer {
        match self.phase {
            ExplainerPhase::Running => {
                self.phase = ExplainerPhase::Closing;
                ExplainerTimer::Schedule(EXPLAINER_CLOSE_MS)
            }
            ExplainerPhase::Closing | ExplainerPhase::Dismissed => ExplainerTimer::None,
        }
    }

    /// Current step index, `0..EXPLAINER_STEP_COUNT`.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn phase(&self) -> ExplainerPhase {
        self.phase
    }
}
