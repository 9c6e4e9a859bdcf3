//! Table output and the breakdowns keyed by organization or agent.

use indexmap::IndexMap;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use super::model::{Identity, IssueRecord, UNKNOWN_LABEL};
use super::tally::{merge_by_identity, Tally};

pub const ORGANIZATION_COLUMN: &str = "Organization";
pub const AGENT_COLUMN: &str = "Agent";
pub const ISSUES_COLUMN: &str = "Issues";
pub const PERSON_DAYS_COLUMN: &str = "Person-days";
pub const TOTAL_LABEL: &str = "Total";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
}

impl Column {
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ColumnType::String,
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ColumnType::Number,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(u64),
    Days(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Cell::Text(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Text(_) => None,
            Cell::Count(value) => Some(*value as f64),
            Cell::Days(value) => Some(*value),
        }
    }

    /// Adds two numeric cells; counts stay integral.
    fn plus(&self, other: &Cell) -> Cell {
        match (self, other) {
            (Cell::Count(a), Cell::Count(b)) => Cell::Count(a.saturating_add(*b)),
            _ => Cell::Days(self.as_f64().unwrap_or(0.0) + other.as_f64().unwrap_or(0.0)),
        }
    }

    fn zero_like(&self) -> Cell {
        match self {
            Cell::Count(_) => Cell::Count(0),
            _ => Cell::Days(0.0),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(value) => f.write_str(value),
            Cell::Count(value) => write!(f, "{}", value),
            Cell::Days(value) => write!(f, "{:.2}", value),
        }
    }
}

/// Table in the dashboard protocol shape: `{"columns", "type": "table", "rows"}`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct OutputTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl OutputTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Appends a row labelled `Total` summing every numeric column; no-op on an empty table.
    pub fn append_totals(&mut self) {
        let Some(first) = self.rows.first() else {
            return;
        };
        let mut totals: Vec<Cell> = first
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                if index == 0 {
                    Cell::text(TOTAL_LABEL)
                } else if cell.is_numeric() {
                    cell.zero_like()
                } else {
                    Cell::text("")
                }
            })
            .collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate().skip(1) {
                if let Some(total) = totals.get_mut(index) {
                    if cell.is_numeric() && total.is_numeric() {
                        *total = total.plus(cell);
                    }
                }
            }
        }
        self.rows.push(totals);
    }
}

impl Serialize for OutputTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("OutputTable", 3)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("type", "table")?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}

fn label_issues_days_columns(label: &str) -> Vec<Column> {
    vec![
        Column::label(label),
        Column::number(ISSUES_COLUMN),
        Column::number(PERSON_DAYS_COLUMN),
    ]
}

fn tally_row(label: &str, tally: &Tally) -> Vec<Cell> {
    vec![
        Cell::text(label),
        Cell::Count(tally.issues),
        Cell::Days(tally.person_days()),
    ]
}

/// Issues and every logged second, attributed to the issue's organization.
pub(crate) fn tally_by_organization(issues: &[IssueRecord]) -> IndexMap<String, Tally> {
    let mut per_org: IndexMap<String, Tally> = IndexMap::new();
    for issue in issues {
        let tally = per_org
            .entry(issue.organization_label().to_string())
            .or_default();
        tally.add_issue();
        tally.add_seconds(issue.total_seconds_logged());
    }
    per_org
}

/// One row per organization in first-seen order: issue count and person-days.
pub fn organization_breakdown(issues: &[IssueRecord]) -> OutputTable {
    let mut table = OutputTable::new(label_issues_days_columns(ORGANIZATION_COLUMN));
    for (organization, tally) in tally_by_organization(issues).iter() {
        table.push_row(tally_row(organization, tally));
    }
    table
}

/// One row per person who is assigned an issue or logged time on one.
pub fn agent_breakdown(issues: &[IssueRecord]) -> OutputTable {
    let mut assigned: IndexMap<Identity, u64> = IndexMap::new();
    let mut logged: IndexMap<Identity, u64> = IndexMap::new();
    for issue in issues {
        *assigned.entry(issue.assignee_identity()).or_default() += 1;
        for worklog in &issue.worklogs {
            let seconds = logged.entry(worklog.author_identity()).or_default();
            *seconds = seconds.saturating_add(worklog.time_spent_seconds);
        }
    }

    let mut table = OutputTable::new(label_issues_days_columns(AGENT_COLUMN));
    for (identity, tally) in merge_by_identity(&assigned, &logged).iter() {
        table.push_row(tally_row(&identity.display_name, tally));
    }
    table
}

/// Per organization, the issues assigned to `agent` and the time `agent` logged.
///
/// A missing agent falls back to the `Unknown` label. Only people recorded
/// on the issue can match, so unassigned issues and authorless worklogs
/// never count. Organizations the agent did not touch are left out.
pub fn single_agent_breakdown(issues: &[IssueRecord], agent: Option<&str>) -> OutputTable {
    let agent = agent
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_LABEL);

    let mut per_org: IndexMap<String, Tally> = IndexMap::new();
    for issue in issues {
        let mut contribution = Tally::default();
        if issue.assignee.as_ref().is_some_and(|assignee| assignee.matches(agent)) {
            contribution.add_issue();
        }
        for worklog in &issue.worklogs {
            if worklog.author.as_ref().is_some_and(|author| author.matches(agent)) {
                contribution.add_seconds(worklog.time_spent_seconds);
            }
        }
        if contribution.is_empty() {
            continue;
        }
        let tally = per_org
            .entry(issue.organization_label().to_string())
            .or_default();
        tally.issues += contribution.issues;
        tally.add_seconds(contribution.seconds);
    }

    let mut table = OutputTable::new(label_issues_days_columns(ORGANIZATION_COLUMN));
    for (organization, tally) in per_org.iter() {
        table.push_row(tally_row(organization, tally));
    }
    table
}
