//! engine::wait
//!
//! Bounded waits across host frames.
//!
//! # Design
//!
//! A wait is a step function: each frame the caller reports whether the
//! condition holds and gets back a [`WaitStatus`]. Every wait has a frame
//! ceiling and ends in `TimedOut` rather than hanging.
//!
//! [`FrameClock`] abstracts "let the host run one frame". The default
//! [`YieldClock`] yields to the tokio scheduler, which is what a host that
//! polls the sorter once per frame observes.
//!
//! # Example
//!
//! ```
//! use shipsort::engine::wait::{BoundedWait, WaitStatus};
//!
//! let mut wait = BoundedWait::new(2);
//! assert_eq!(wait.poll(false), WaitStatus::Waiting);
//! assert_eq!(wait.poll(false), WaitStatus::TimedOut);
//!
//! let mut wait = BoundedWait::new(2);
//! assert_eq!(wait.poll(true), WaitStatus::Done);
//! ```

use async_trait::async_trait;

/// Outcome of one wait step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    /// Condition not met yet; step again next frame.
    Waiting,
    /// Condition met.
    Done,
    /// Frame ceiling reached.
    TimedOut,
}

/// Step state for a wait with a frame ceiling.
#[derive(Debug, Clone)]
pub struct BoundedWait {
    frames: u32,
    max_frames: u32,
}

impl BoundedWait {
    /// A wait that gives up after `max_frames` unmet checks (minimum 1).
    pub fn new(max_frames: u32) -> Self {
        Self {
            frames: 0,
            max_frames: max_frames.max(1),
        }
    }

    /// Advance by one check.
    pub fn poll(&mut self, ready: bool) -> WaitStatus {
        if ready {
            return WaitStatus::Done;
        }
        self.frames += 1;
        if self.frames >= self.max_frames {
            WaitStatus::TimedOut
        } else {
            WaitStatus::Waiting
        }
    }

    /// Frames spent so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

/// Lets the host advance one frame.
#[async_trait]
pub trait FrameClock: Send + Sync {
    async fn next_frame(&self);
}

/// Frame clock that yields to the async runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldClock;

#[async_trait]
impl FrameClock for YieldClock {
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }
}

/// Drive `ready` until it holds or `max_frames` unmet checks pass.
///
/// Returns `Done` or `TimedOut`, never `Waiting`.
pub async fn wait_until(
    clock: &dyn FrameClock,
    max_frames: u32,
    mut ready: impl FnMut() -> bool + Send,
) -> WaitStatus {
    let mut wait = BoundedWait::new(max_frames);
    loop {
        match wait.poll(ready()) {
            WaitStatus::Waiting => clock.next_frame().await,
            done_or_timed_out => return done_or_timed_out,
        }
    }
}
