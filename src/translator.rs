//! Turns a dashboard query into tracker searches plus report descriptors.
//!
//! Target identifiers carrying the `jsd:` prefix select a report kind. Any
//! other identifier is forwarded verbatim as an extra JQL clause. Such
//! clauses are not escaped: targets come from the dashboard configuration,
//! which is trusted as much as the tracker credentials are.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;
use serde_json::Value;

use crate::bridge::{QueryRange, QueryTarget};
use crate::error::ApiError;
use crate::report::{
    BreakdownMode, OutputShape, ReportDescriptor, ReportKind, TimeRangeField, REPORT_PREFIX,
};

/// Minute-precision format the tracker accepts in date comparisons.
const TRACKER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, ApiError> {
        if from > to {
            return Err(ApiError::InvalidRange(format!(
                "range starts after it ends ({} > {})",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }
        Ok(Self { from, to })
    }

    pub fn tracker_bounds(&self) -> (String, String) {
        (
            self.from.format(TRACKER_DATETIME_FORMAT).to_string(),
            self.to.format(TRACKER_DATETIME_FORMAT).to_string(),
        )
    }

    /// `<field> >= "<from>" AND <field> <= "<to>"`.
    pub fn clause(&self, field: TimeRangeField) -> String {
        let (from, to) = self.tracker_bounds();
        let name = field.as_str();
        format!("{name} >= \"{from}\" AND {name} <= \"{to}\"")
    }
}

/// A report ready to run: what to fetch and how to reduce it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedReport {
    pub descriptor: ReportDescriptor,
    pub jql: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRequest {
    pub window: TimeWindow,
    pub reports: Vec<PlannedReport>,
}

pub fn translate(range: &QueryRange, targets: &[QueryTarget]) -> Result<NormalizedRequest, ApiError> {
    let window = TimeWindow::new(parse_range_value(&range.from)?, parse_range_value(&range.to)?)?;
    let reports = targets
        .iter()
        .map(|target| plan_target(&window, target))
        .collect();
    Ok(NormalizedRequest { window, reports })
}

/// Reads one range boundary: RFC 3339, naive ISO (taken as UTC), a bare date, or epoch milliseconds.
pub fn parse_range_value(value: &Value) -> Result<DateTime<Utc>, ApiError> {
    let parsed = match value {
        Value::String(text) => parse_range_text(text),
        Value::Number(number) => number.as_i64().and_then(from_epoch_millis),
        _ => None,
    };
    parsed.ok_or_else(|| ApiError::InvalidRange(format!("unreadable range boundary: {}", value)))
}

fn parse_range_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse::<i64>().ok().and_then(from_epoch_millis);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

fn default_kind(shape: OutputShape) -> ReportKind {
    match shape {
        OutputShape::Series => ReportKind::TicketsCreated,
        OutputShape::Table => ReportKind::OrganizationsAll,
    }
}

/// Resolves the report kind and, for non-prefixed identifiers, the raw clause.
fn resolve_kind(identifier: &str, shape: OutputShape) -> (ReportKind, Option<String>) {
    if identifier.is_empty() {
        return (default_kind(shape), None);
    }
    if identifier.starts_with(REPORT_PREFIX) {
        let kind = ReportKind::from_identifier(identifier).unwrap_or_else(|| {
            warn!("unknown report identifier {}, using default report", identifier);
            default_kind(shape)
        });
        return (kind, None);
    }
    (default_kind(shape), Some(identifier.to_string()))
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub fn plan_target(window: &TimeWindow, target: &QueryTarget) -> PlannedReport {
    let identifier = target.target.as_deref().map(str::trim).unwrap_or("");
    let shape = target
        .kind
        .as_deref()
        .and_then(OutputShape::parse)
        .unwrap_or_default();
    let (kind, raw_clause) = resolve_kind(identifier, shape);

    let mut descriptor = ReportDescriptor::new(identifier, kind, shape);
    if let Some(data) = &target.data {
        if let Some(field) = data.timerange_type.as_deref().and_then(TimeRangeField::parse) {
            descriptor.time_range_field = field;
        }
        if let Some(mode) = data.breakdown.as_deref().and_then(BreakdownMode::parse) {
            descriptor.breakdown_mode = mode;
        }
        descriptor.filter_organization = non_blank(data.organization.as_ref());
        descriptor.filter_agent = non_blank(data.agent.as_ref());
    }

    let mut clauses = vec![window.clause(descriptor.time_range_field)];
    if let Some(raw) = raw_clause {
        clauses.push(raw);
    }
    match kind {
        ReportKind::OrganizationsOne => {
            if let Some(organization) = &descriptor.filter_organization {
                clauses.push(format!("Organizations = \"{}\"", organization));
            }
        }
        ReportKind::AgentsOne => {
            if let Some(agent) = &descriptor.filter_agent {
                clauses.push(format!(
                    "(assignee = \"{agent}\" OR worklogAuthor = \"{agent}\")"
                ));
            }
        }
        _ => {}
    }

    PlannedReport {
        descriptor,
        jql: clauses.join(" AND "),
    }
}
