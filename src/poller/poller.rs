use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use super::clock::EvaluationTime;
use super::error::PollerError;
use super::format::ReportFormat;
use crate::pointing::PointingSink;
use crate::predict::TrackingSetup;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub time: EvaluationTime,
    pub format: ReportFormat,
    /// Stop after this many reports. `None` polls until cancelled.
    pub max_iterations: Option<usize>,
}

pub struct Poller<'a> {
    setup: &'a TrackingSetup,
    settings: PollSettings,
    pointing: Option<PointingSink<Box<dyn Write>>>,
}

impl<'a> Poller<'a> {
    pub fn new(setup: &'a TrackingSetup, settings: PollSettings) -> Self {
        Self {
            setup,
            settings,
            pointing: None,
        }
    }

    /// Also send every sunlit observation to an antenna controller.
    pub fn with_pointing(mut self, sink: PointingSink<Box<dyn Write>>) -> Self {
        self.pointing = Some(sink);
        self
    }

    /// Observe, report, sleep, blank line; until `stop_rx` fires, its sender
    /// is dropped, or the iteration limit is hit. Returns the number of
    /// reports written.
    pub async fn run<W: Write>(
        &mut self,
        out: &mut W,
        mut stop_rx: oneshot::Receiver<()>,
    ) -> Result<usize, PollerError> {
        let mut iterations = 0;

        log::info!(
            "Polling {} from {:.6}, {:.6} every {:?}",
            self.settings.format.label,
            self.setup.station.latitude_deg,
            self.setup.station.longitude_deg,
            self.settings.interval
        );

        loop {
            if self
                .settings
                .max_iterations
                .is_some_and(|max| iterations >= max)
            {
                break;
            }
            if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                log::info!("Poller cancelled after {} reports", iterations);
                break;
            }

            let at = self.settings.time.resolve(Utc::now());
            let observation = self.setup.observe(at)?;
            log::debug!("{:?}", observation);

            writeln!(out, "{}", self.settings.format.line(&observation))?;
            out.flush()?;
            iterations += 1;

            if let Some(sink) = self.pointing.as_mut() {
                sink.point(&observation).map_err(PollerError::Pointing)?;
            }

            let should_stop = tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => false,
                _ = &mut stop_rx => true,
            };
            if should_stop {
                log::info!("Poller cancelled after {} reports", iterations);
                break;
            }

            writeln!(out)?;
            out.flush()?;
        }

        if let Some(sink) = &self.pointing {
            log::info!("Sent {} pointing packets", sink.sent());
        }
        Ok(iterations)
    }
}
