/// Exit status after the window is closed.
pub const EXIT_OK: u8 = 0;
/// Exit status when the window or its GL context cannot be created.
pub const EXIT_INIT_FAILED: u8 = 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Terminated,
}

/// Position inside a frame. Each step of [`EventLoop::step`] must follow the previous one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum FramePhase {
    Idle,
    Polled,
    Begun,
    Composed,
}

impl FramePhase {
    fn next(self) -> FramePhase {
        match self {
            FramePhase::Idle => FramePhase::Polled,
            FramePhase::Polled => FramePhase::Begun,
            FramePhase::Begun => FramePhase::Composed,
            FramePhase::Composed => FramePhase::Idle,
        }
    }
}

/// The four things done by every iteration of the main loop.
///
/// A frame must be begun, composed and submitted exactly once, in that order.
pub trait FrameDriver {
    /// Processes pending window events. Returns `true` if the window was asked to close.
    fn poll_events(&mut self) -> bool;
    /// Starts a new GUI frame.
    fn begin_frame(&mut self);
    /// Builds the UI of the frame.
    fn compose(&mut self);
    /// Renders and presents the frame.
    fn submit(&mut self);
}

pub struct EventLoop<D> {
    driver: D,
    state: LoopState,
    phase: FramePhase,
    frames: u64,
}

impl<D: FrameDriver> EventLoop<D> {
    /// Takes an already initialized driver. The loop starts running with [`EventLoop::run`].
    pub fn new(driver: D) -> Self {
        EventLoop {
            driver,
            state: LoopState::Uninitialized,
            phase: FramePhase::Idle,
            frames: 0,
        }
    }
    pub fn state(&self) -> LoopState {
        self.state
    }
    /// Number of frames submitted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn advance(&mut self, to: FramePhase) {
        assert_eq!(self.phase.next(), to, "frame step out of order");
        self.phase = to;
    }

    /// Runs one iteration: poll, begin, compose, submit.
    ///
    /// If the poll reports a close request the loop terminates and nothing else is done.
    pub fn step(&mut self) -> LoopState {
        match self.state {
            LoopState::Uninitialized => self.state = LoopState::Running,
            LoopState::Running => {}
            LoopState::Terminated => panic!("the main loop has already terminated"),
        }

        self.advance(FramePhase::Polled);
        if self.driver.poll_events() {
            log::debug!("Close requested after {} frames", self.frames);
            self.phase = FramePhase::Idle;
            self.state = LoopState::Terminated;
            return self.state;
        }
        self.advance(FramePhase::Begun);
        self.driver.begin_frame();
        self.advance(FramePhase::Composed);
        self.driver.compose();
        self.advance(FramePhase::Idle);
        self.driver.submit();

        self.frames += 1;
        self.state
    }

    /// Runs until the window is closed and returns the exit status.
    pub fn run(&mut self) -> u8 {
        while self.step() == LoopState::Running {}
        EXIT_OK
    }
}
