//! Render loop lifecycle
//!
//! The animation loop is cooperative and frame-driven: each cycle runs
//! update-then-draw synchronously, then arms the next frame request.
//! Cancellation is an explicit shared token captured when the loop starts
//! and checked before every re-arm, so the contract is testable without a
//! real rendering surface.

use std::cell::Cell;
use std::rc::Rc;

/// Lifecycle of one widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No particles exist yet
    Uninitialized,
    /// Particles exist, the loop is not running
    Initialized,
    /// The loop is armed and advancing frames
    Running,
    /// The loop was cancelled; particles are retained but inert
    Stopped,
}

/// Shared cancellation flag. Clones observe the same flag; cancelling any
/// clone stops the loop that captured it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Tracks loop state and the frame counter driving overlay rotation
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    frame: u64,
    token: CancellationToken,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Uninitialized,
            frame: 0,
            token: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames advanced since the loop first started
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Particles were (re)built; the loop is ready to run
    pub fn mark_initialized(&mut self) {
        if self.state != LoopState::Running {
            self.state = LoopState::Initialized;
        }
    }

    /// Start (or restart) the loop, handing out a fresh token for the
    /// scheduled frame callback to capture.
    pub fn start(&mut self) -> CancellationToken {
        self.token = CancellationToken::new();
        self.state = LoopState::Running;
        self.token.clone()
    }

    /// Whether the next cycle may run. Checked before each re-arm.
    pub fn should_run(&self) -> bool {
        self.state == LoopState::Running && !self.token.is_cancelled()
    }

    /// Account for one completed update+draw cycle
    pub fn advance(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    /// Cancel the pending frame request; particles stay as they are
    pub fn stop(&mut self) {
        self.token.cancel();
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
        }
    }
}
