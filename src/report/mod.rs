//! Aggregation engine: reduces fetched issue records into series or tables.
//!
//! Everything in here is synchronous and free of I/O. A report is described by
//! a [`ReportDescriptor`] and produced by [`aggregate`].

pub mod crosstab;
pub mod model;
pub mod series;
pub mod table;
pub mod tally;

use serde::Serialize;

pub use crosstab::organization_agent_crosstab;
pub use model::{Identity, IssueRecord, WorklogRecord, UNASSIGNED_LABEL, UNKNOWN_LABEL};
pub use series::{issues_per_day, Datapoint, OutputSeries};
pub use table::{
    agent_breakdown, organization_breakdown, single_agent_breakdown, Cell, Column, ColumnType,
    OutputTable,
};
pub use tally::{person_days, Tally, WORKDAY_SECONDS};

/// Reserved prefix of report identifiers; anything else is a raw filter clause.
pub const REPORT_PREFIX: &str = "jsd:";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    TicketsUpdated,
    TicketsCreated,
    OrganizationsAll,
    OrganizationsAllFull,
    AgentsAll,
    OrganizationsOne,
    AgentsOne,
}

impl ReportKind {
    /// Fixed kinds in the order the metric picker lists them.
    pub const ALL: [ReportKind; 7] = [
        ReportKind::TicketsUpdated,
        ReportKind::TicketsCreated,
        ReportKind::OrganizationsAll,
        ReportKind::OrganizationsAllFull,
        ReportKind::AgentsAll,
        ReportKind::OrganizationsOne,
        ReportKind::AgentsOne,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            ReportKind::TicketsUpdated => "jsd:tickets:updated",
            ReportKind::TicketsCreated => "jsd:tickets:created",
            ReportKind::OrganizationsAll => "jsd:organizations:all",
            ReportKind::OrganizationsAllFull => "jsd:organizations:all:full",
            ReportKind::AgentsAll => "jsd:agents:all",
            ReportKind::OrganizationsOne => "jsd:organizations:one",
            ReportKind::AgentsOne => "jsd:agents:one",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::TicketsUpdated => "ALL Tickets Updated",
            ReportKind::TicketsCreated => "ALL Tickets Created",
            ReportKind::OrganizationsAll => "All Organizations",
            ReportKind::OrganizationsAllFull => "All Organizations (full)",
            ReportKind::AgentsAll => "All Agents",
            ReportKind::OrganizationsOne => "One Organization",
            ReportKind::AgentsOne => "One Agent",
        }
    }

    pub fn from_identifier(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|kind| kind.identifier() == value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimeRangeField {
    #[default]
    Created,
    Updated,
}

impl TimeRangeField {
    /// Field name in the tracker's query language.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRangeField::Created => "created",
            TimeRangeField::Updated => "updated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "created" => Some(TimeRangeField::Created),
            "updated" => Some(TimeRangeField::Updated),
            _ => None,
        }
    }
}

/// Metrics shown by the cross-tab for organizations and agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BreakdownMode {
    #[default]
    Both,
    IssueCountOnly,
    LogworkOnly,
}

impl BreakdownMode {
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "both" | "all" => Some(BreakdownMode::Both),
            "issuecountonly" | "issuecount" | "issues" => Some(BreakdownMode::IssueCountOnly),
            "logworkonly" | "logwork" | "worklog" | "persondays" => Some(BreakdownMode::LogworkOnly),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputShape {
    #[default]
    Series,
    Table,
}

impl OutputShape {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "timeseries" | "timeserie" => Some(OutputShape::Series),
            "table" => Some(OutputShape::Table),
            _ => None,
        }
    }
}

/// One requested output, already resolved from the dashboard target.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportDescriptor {
    /// Original target identifier, echoed as the series name.
    pub target: String,
    pub kind: ReportKind,
    pub shape: OutputShape,
    pub time_range_field: TimeRangeField,
    pub filter_organization: Option<String>,
    pub filter_agent: Option<String>,
    pub breakdown_mode: BreakdownMode,
}

impl ReportDescriptor {
    pub fn new(target: impl Into<String>, kind: ReportKind, shape: OutputShape) -> Self {
        Self {
            target: target.into(),
            kind,
            shape,
            time_range_field: TimeRangeField::default(),
            filter_organization: None,
            filter_agent: None,
            breakdown_mode: BreakdownMode::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportOutput {
    Series(OutputSeries),
    Table(OutputTable),
}

/// Reduces `issues` into the output `descriptor` asks for.
pub fn aggregate(issues: &[IssueRecord], descriptor: &ReportDescriptor) -> ReportOutput {
    if descriptor.shape == OutputShape::Series {
        return ReportOutput::Series(issues_per_day(
            &descriptor.target,
            issues,
            descriptor.time_range_field,
        ));
    }

    let table = match descriptor.kind {
        ReportKind::TicketsUpdated | ReportKind::TicketsCreated | ReportKind::OrganizationsAll => {
            organization_breakdown(issues)
        }
        ReportKind::OrganizationsAllFull => {
            organization_agent_crosstab(issues, descriptor.breakdown_mode)
        }
        ReportKind::AgentsAll | ReportKind::OrganizationsOne => agent_breakdown(issues),
        ReportKind::AgentsOne => single_agent_breakdown(issues, descriptor.filter_agent.as_deref()),
    };
    ReportOutput::Table(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<IssueRecord> {
        let x = Identity::new("x", "X");
        let y = Identity::new("y", "Y");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("valid date");
        vec![
            IssueRecord::new("SD-1")
                .with_organization("A")
                .with_assignee(x.clone())
                .with_worklog(x, 28_800)
                .with_created_at(at),
            IssueRecord::new("SD-2")
                .with_organization("A")
                .with_assignee(y)
                .with_created_at(at),
        ]
    }

    #[test]
    fn identifiers_round_trip_through_lookup() {
        for kind in ReportKind::ALL {
            assert_eq!(ReportKind::from_identifier(kind.identifier()), Some(kind));
            assert!(kind.identifier().starts_with(REPORT_PREFIX));
        }
        assert_eq!(ReportKind::from_identifier("jsd:unknown"), None);
        assert_eq!(ReportKind::from_identifier("project = SD"), None);
    }

    #[test]
    fn time_range_field_defaults_to_created_for_every_kind() {
        for kind in ReportKind::ALL {
            let descriptor = ReportDescriptor::new(kind.identifier(), kind, OutputShape::Series);
            assert_eq!(descriptor.time_range_field, TimeRangeField::Created, "{kind:?}");
        }
    }

    #[test]
    fn breakdown_mode_accepts_spellings() {
        assert_eq!(BreakdownMode::parse("both"), Some(BreakdownMode::Both));
        assert_eq!(BreakdownMode::parse("issueCountOnly"), Some(BreakdownMode::IssueCountOnly));
        assert_eq!(BreakdownMode::parse("issue_count_only"), Some(BreakdownMode::IssueCountOnly));
        assert_eq!(BreakdownMode::parse("logworkOnly"), Some(BreakdownMode::LogworkOnly));
        assert_eq!(BreakdownMode::parse("nonsense"), None);
    }

    #[test]
    fn series_shape_wins_over_table_kind() {
        let descriptor = ReportDescriptor::new("jsd:agents:all", ReportKind::AgentsAll, OutputShape::Series);
        match aggregate(&sample(), &descriptor) {
            ReportOutput::Series(series) => {
                assert_eq!(series.target, "jsd:agents:all");
                assert_eq!(series.datapoints, vec![Datapoint(2, 1_714_521_600_000)]);
            }
            other => panic!("expected series, got {other:?}"),
        }
    }

    #[test]
    fn organizations_all_table_matches_worked_example() {
        let descriptor =
            ReportDescriptor::new("jsd:organizations:all", ReportKind::OrganizationsAll, OutputShape::Table);
        let ReportOutput::Table(table) = aggregate(&sample(), &descriptor) else {
            panic!("expected table");
        };
        assert_eq!(
            table.rows,
            vec![vec![Cell::text("A"), Cell::Count(2), Cell::Days(1.0)]]
        );
    }

    #[test]
    fn table_kinds_dispatch_to_their_breakdowns() {
        let issues = sample();
        let render = |kind: ReportKind, agent: Option<&str>| {
            let mut descriptor = ReportDescriptor::new(kind.identifier(), kind, OutputShape::Table);
            descriptor.filter_agent = agent.map(str::to_string);
            match aggregate(&issues, &descriptor) {
                ReportOutput::Table(table) => table,
                other => panic!("expected table, got {other:?}"),
            }
        };

        assert_eq!(render(ReportKind::AgentsAll, None).rows.len(), 2);
        assert_eq!(render(ReportKind::OrganizationsOne, None).columns[0].text, "Agent");
        assert_eq!(render(ReportKind::AgentsOne, Some("y")).rows.len(), 1);
        assert!(render(ReportKind::AgentsOne, None).rows.is_empty());
        assert_eq!(render(ReportKind::OrganizationsAllFull, None).rows.len(), 2);
        assert_eq!(render(ReportKind::TicketsCreated, None).columns[0].text, "Organization");
    }

    #[test]
    fn aggregate_is_idempotent() {
        let issues = sample();
        let descriptor =
            ReportDescriptor::new("t", ReportKind::OrganizationsAllFull, OutputShape::Table);
        assert_eq!(aggregate(&issues, &descriptor), aggregate(&issues, &descriptor));
    }
}
