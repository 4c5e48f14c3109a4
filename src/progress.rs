//! For tracking encoding progress

#[cfg(feature = "pbr")]
pub use pbr::ProgressBar;

/// A trait that is used to report progress to some consumer.
pub trait ProgressReporter {
    /// Called after each frame has been written.
    ///
    /// This method may return `false` to stop feeding frames.
    fn increase(&mut self) -> bool;

    /// Called once after the encoder has been closed.
    fn done(&mut self, _msg: &str) {}
}

/// No-op progress reporter
pub struct NoProgress {}

impl ProgressReporter for NoProgress {
    fn increase(&mut self) -> bool {
        true
    }
}

/// Implement the progress reporter trait for a progress bar,
/// to make it usable for frame processing reporting.
#[cfg(feature = "pbr")]
impl<T> ProgressReporter for ProgressBar<T>
where
    T: std::io::Write,
{
    fn increase(&mut self) -> bool {
        self.inc();
        true
    }

    fn done(&mut self, msg: &str) {
        self.finish_print(msg);
    }
}
