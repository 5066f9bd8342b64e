//! Views derived from a [`ForecastSeries`]: today's samples and a daily rollup.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

use crate::model::{DailySummary, ForecastSample, ForecastSeries};

/// Days covered by [`ForecastSeries::daily_rollup`].
pub const ROLLUP_DAYS: usize = 5;

/// Samples shown for "today" when none fall on the current date (one day of 3h steps).
pub const TODAY_FALLBACK_SAMPLES: usize = 8;

impl ForecastSeries {
    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    /// Calendar date of `sample` in the city's local time.
    pub fn local_date(&self, sample: &ForecastSample) -> NaiveDate {
        sample.timestamp.with_timezone(&self.offset()).date_naive()
    }

    /// Samples falling on `today`, or the first few samples if none do.
    pub fn today(&self, today: NaiveDate) -> Vec<&ForecastSample> {
        let matching: Vec<&ForecastSample> =
            self.samples.iter().filter(|s| self.local_date(s) == today).collect();

        if matching.is_empty() {
            self.samples.iter().take(TODAY_FALLBACK_SAMPLES).collect()
        } else {
            matching
        }
    }

    /// [`Self::today`] using the city's current local date.
    pub fn today_local(&self) -> Vec<&ForecastSample> {
        let today = Utc::now().with_timezone(&self.offset()).date_naive();
        self.today(today)
    }

    /// Max/min temperature and dominant condition for the first five days.
    pub fn daily_rollup(&self) -> Vec<DailySummary> {
        let mut days: Vec<(NaiveDate, Vec<&ForecastSample>)> = Vec::new();

        for sample in &self.samples {
            let date = self.local_date(sample);
            if let Some((_, group)) = days.iter_mut().find(|(d, _)| *d == date) {
                group.push(sample);
            } else if days.len() < ROLLUP_DAYS {
                days.push((date, vec![sample]));
            }
        }

        days.into_iter().map(|(date, group)| summarize(date, &group)).collect()
    }
}

fn summarize(date: NaiveDate, samples: &[&ForecastSample]) -> DailySummary {
    let max_temp_c = samples.iter().map(|s| s.temperature_c).fold(f64::NEG_INFINITY, f64::max);
    let min_temp_c = samples.iter().map(|s| s.temperature_c).fold(f64::INFINITY, f64::min);

    DailySummary {
        date,
        max_temp_c,
        min_temp_c,
        condition: most_frequent(samples.iter().map(|s| s.condition.as_str())),
    }
}

/// Most common value; ties go to whichever appeared first.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((value, n));
        }
    }

    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}
