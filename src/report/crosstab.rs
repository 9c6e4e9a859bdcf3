//! Organization by agent cross-tabulation with a totals row.
//!
//! Built in two passes. Discovery walks the issues once and records the
//! organization tallies, the per-organization per-agent tallies and every
//! agent seen as assignee or worklog author. Rendering then emits a dense
//! table over organizations (first-seen order) and agents (sorted by
//! identity), reading untouched cells as zero.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use super::model::{Identity, IssueRecord};
use super::table::{
    tally_by_organization, Cell, Column, OutputTable, ISSUES_COLUMN, ORGANIZATION_COLUMN,
    PERSON_DAYS_COLUMN,
};
use super::tally::Tally;
use super::BreakdownMode;

struct Discovery {
    organizations: IndexMap<String, Tally>,
    per_agent: HashMap<String, HashMap<Identity, Tally>>,
    agents: BTreeSet<Identity>,
}

impl Discovery {
    fn scan(issues: &[IssueRecord]) -> Self {
        let organizations = tally_by_organization(issues);
        let mut per_agent: HashMap<String, HashMap<Identity, Tally>> = HashMap::new();
        let mut agents: BTreeSet<Identity> = BTreeSet::new();

        for issue in issues {
            let scoped = per_agent
                .entry(issue.organization_label().to_string())
                .or_default();

            let assignee = issue.assignee_identity();
            scoped.entry(assignee.clone()).or_default().add_issue();
            agents.insert(assignee);

            for worklog in &issue.worklogs {
                let author = worklog.author_identity();
                scoped
                    .entry(author.clone())
                    .or_default()
                    .add_seconds(worklog.time_spent_seconds);
                agents.insert(author);
            }
        }

        Self {
            organizations,
            per_agent,
            agents,
        }
    }

    fn cell(&self, organization: &str, agent: &Identity) -> Tally {
        self.per_agent
            .get(organization)
            .and_then(|scoped| scoped.get(agent))
            .copied()
            .unwrap_or_default()
    }
}

fn columns(mode: BreakdownMode, agents: &BTreeSet<Identity>) -> Vec<Column> {
    let mut columns = vec![Column::label(ORGANIZATION_COLUMN)];
    match mode {
        BreakdownMode::Both => {
            columns.push(Column::number(ISSUES_COLUMN));
            columns.push(Column::number(PERSON_DAYS_COLUMN));
            for agent in agents {
                columns.push(Column::number(format!("{} issues", agent.display_name)));
                columns.push(Column::number(format!("{} person-days", agent.display_name)));
            }
        }
        BreakdownMode::IssueCountOnly => {
            columns.push(Column::number(ISSUES_COLUMN));
            for agent in agents {
                columns.push(Column::number(format!("{} issues", agent.display_name)));
            }
        }
        BreakdownMode::LogworkOnly => {
            columns.push(Column::number(PERSON_DAYS_COLUMN));
            for agent in agents {
                columns.push(Column::number(format!("{} person-days", agent.display_name)));
            }
        }
    }
    columns
}

fn push_tally(row: &mut Vec<Cell>, mode: BreakdownMode, tally: &Tally) {
    match mode {
        BreakdownMode::Both => {
            row.push(Cell::Count(tally.issues));
            row.push(Cell::Days(tally.person_days()));
        }
        BreakdownMode::IssueCountOnly => row.push(Cell::Count(tally.issues)),
        BreakdownMode::LogworkOnly => row.push(Cell::Days(tally.person_days())),
    }
}

/// Organizations as rows, agents as column groups, plus a totals row.
///
/// `mode` picks the metrics shown for the organization itself and for every
/// agent: both, issue counts only, or person-days only.
pub fn organization_agent_crosstab(issues: &[IssueRecord], mode: BreakdownMode) -> OutputTable {
    let discovery = Discovery::scan(issues);
    let mut table = OutputTable::new(columns(mode, &discovery.agents));

    for (organization, tally) in discovery.organizations.iter() {
        let mut row = vec![Cell::text(organization.as_str())];
        push_tally(&mut row, mode, tally);
        for agent in &discovery.agents {
            push_tally(&mut row, mode, &discovery.cell(organization, agent));
        }
        table.push_row(row);
    }

    table.append_totals();
    table
}
