/// Events emitted by the scheduling workflow while it runs.
///
/// A phase brackets one stage of the workflow; tasks inside a phase have a
/// known number of steps. Search rounds have no known length and report
/// through [`Progress::StatusUpdate`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    StatusUpdate { text: String },
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.callback.is_some()
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Formats a status line only when someone is listening.
    #[inline]
    pub fn status(&self, text: impl FnOnce() -> String) {
        if let Some(cb) = &self.callback {
            cb(Progress::StatusUpdate { text: text() });
        }
    }
}
