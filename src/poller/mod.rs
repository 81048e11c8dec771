mod clock;
mod error;
mod format;
mod poller;

pub use clock::EvaluationTime;
pub use error::PollerError;
pub use format::{ReportFormat, DEFAULT_PREFIX};
pub use poller::{PollSettings, Poller, DEFAULT_INTERVAL};
