//! Accumulators shared by the table reports.

use indexmap::IndexMap;

use super::model::Identity;

/// Seconds in one person-day: an eight hour workday.
pub const WORKDAY_SECONDS: u64 = 3600 * 8;

/// Converts logged seconds into person-days.
pub fn person_days(seconds: u64) -> f64 {
    seconds as f64 / WORKDAY_SECONDS as f64
}

/// Issue ownership and logged time accumulated for one key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub issues: u64,
    pub seconds: u64,
}

impl Tally {
    pub fn new(issues: u64, seconds: u64) -> Self {
        Self { issues, seconds }
    }

    pub fn add_issue(&mut self) {
        self.issues += 1;
    }

    pub fn add_seconds(&mut self, seconds: u64) {
        self.seconds = self.seconds.saturating_add(seconds);
    }

    pub fn is_empty(&self) -> bool {
        self.issues == 0 && self.seconds == 0
    }

    pub fn person_days(&self) -> f64 {
        person_days(self.seconds)
    }
}

/// Unions issue ownership counts and logged seconds into one tally per identity.
///
/// Identities keep the order in which they were first assigned an issue;
/// people who only logged time follow in the order they first logged.
pub fn merge_by_identity(
    assigned: &IndexMap<Identity, u64>,
    logged: &IndexMap<Identity, u64>,
) -> IndexMap<Identity, Tally> {
    let mut merged: IndexMap<Identity, Tally> = IndexMap::new();
    for (identity, issues) in assigned {
        let seconds = logged.get(identity).copied().unwrap_or(0);
        merged.insert(identity.clone(), Tally::new(*issues, seconds));
    }
    for (identity, seconds) in logged {
        merged
            .entry(identity.clone())
            .or_insert_with(|| Tally::new(0, *seconds));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::{merge_by_identity, person_days, Tally, WORKDAY_SECONDS};
    use crate::report::model::Identity;
    use indexmap::IndexMap;

    fn person(id: &str) -> Identity {
        Identity::new(id, id.to_uppercase())
    }

    #[test]
    fn one_workday_is_one_person_day() {
        assert_eq!(WORKDAY_SECONDS, 28_800);
        assert_eq!(person_days(28_800), 1.0);
        assert_eq!(person_days(14_400), 0.5);
        assert_eq!(Tally::default().person_days(), 0.0);
    }

    #[test]
    fn merge_unions_both_key_sets() {
        let mut assigned: IndexMap<Identity, u64> = IndexMap::new();
        *assigned.entry(person("x")).or_default() += 2;
        *assigned.entry(person("y")).or_default() += 1;
        let mut logged: IndexMap<Identity, u64> = IndexMap::new();
        *logged.entry(person("z")).or_default() += 3600;
        *logged.entry(person("x")).or_default() += 28_800;

        let merged = merge_by_identity(&assigned, &logged);
        let rows: Vec<(String, Tally)> = merged
            .iter()
            .map(|(identity, tally)| (identity.id.clone(), *tally))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("x".to_string(), Tally::new(2, 28_800)),
                ("y".to_string(), Tally::new(1, 0)),
                ("z".to_string(), Tally::new(0, 3600)),
            ]
        );
    }

    #[test]
    fn merge_of_empty_ledgers_is_empty() {
        let merged = merge_by_identity(&IndexMap::new(), &IndexMap::new());
        assert!(merged.is_empty());
    }
}
