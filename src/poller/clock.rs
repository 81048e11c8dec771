use chrono::{DateTime, NaiveTime, Utc};

/// Which instant each poll is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationTime {
    /// The wall clock.
    #[default]
    Now,
    /// The same instant every iteration.
    Fixed(DateTime<Utc>),
    /// Today's UTC date with the time of day replaced.
    TimeOfDay(NaiveTime),
}

impl EvaluationTime {
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            EvaluationTime::Now => now,
            EvaluationTime::Fixed(at) => *at,
            EvaluationTime::TimeOfDay(time) => now.date_naive().and_time(*time).and_utc(),
        }
    }
}
