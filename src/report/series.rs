//! Issues-per-day time series.

use serde::Serialize;
use std::collections::HashMap;

use super::model::IssueRecord;
use super::TimeRangeField;

const SECONDS_PER_DAY: i64 = 86_400;
const MILLIS_PER_DAY: i64 = SECONDS_PER_DAY * 1000;

/// One `[value, epochMillis]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Datapoint(pub u64, pub i64);

impl Datapoint {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.1
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputSeries {
    pub target: String,
    pub datapoints: Vec<Datapoint>,
}

/// Counts issues per UTC calendar day of `field`, one datapoint per day at its midnight, ascending.
///
/// Issues lacking the selected timestamp are not counted.
pub fn issues_per_day(target: &str, issues: &[IssueRecord], field: TimeRangeField) -> OutputSeries {
    let mut per_day: HashMap<i64, u64> = HashMap::new();
    for issue in issues {
        let stamp = match field {
            TimeRangeField::Created => issue.created_at,
            TimeRangeField::Updated => issue.updated_at,
        };
        let Some(stamp) = stamp else {
            continue;
        };
        let day = stamp.timestamp().div_euclid(SECONDS_PER_DAY);
        *per_day.entry(day).or_insert(0) += 1;
    }

    let mut datapoints: Vec<Datapoint> = per_day
        .into_iter()
        .map(|(day, count)| Datapoint(count, day * MILLIS_PER_DAY))
        .collect();
    datapoints.sort_by_key(Datapoint::timestamp_millis);

    OutputSeries {
        target: target.to_string(),
        datapoints,
    }
}
