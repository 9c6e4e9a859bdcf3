//! Metric picker entries for `/search`.

use jira_api::SavedFilter;

use crate::bridge::MetricOption;
use crate::report::ReportKind;

/// Fixed report kinds first, then one raw-clause entry per favourite filter.
pub fn list_report_kinds(filters: &[SavedFilter]) -> Vec<MetricOption> {
    let fixed = ReportKind::ALL.into_iter().map(|kind| MetricOption {
        text: kind.label().to_string(),
        value: kind.identifier().to_string(),
    });
    let saved = filters
        .iter()
        .filter(|filter| !filter.jql.trim().is_empty())
        .map(|filter| MetricOption {
            text: format!("filter: {}", filter.name),
            value: filter.jql.trim().to_string(),
        });
    fixed.chain(saved).collect()
}

#[cfg(test)]
mod tests {
    use super::list_report_kinds;
    use jira_api::SavedFilter;

    fn filter(name: &str, jql: &str) -> SavedFilter {
        SavedFilter {
            id: None,
            name: name.to_string(),
            jql: jql.to_string(),
        }
    }

    #[test]
    fn fixed_kinds_come_first_in_picker_order() {
        let options = list_report_kinds(&[]);
        let values: Vec<&str> = options.iter().map(|option| option.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "jsd:tickets:updated",
                "jsd:tickets:created",
                "jsd:organizations:all",
                "jsd:organizations:all:full",
                "jsd:agents:all",
                "jsd:organizations:one",
                "jsd:agents:one",
            ]
        );
        assert_eq!(options[0].text, "ALL Tickets Updated");
    }

    #[test]
    fn favourite_filters_follow_as_raw_clauses() {
        let options = list_report_kinds(&[
            filter("Open bugs", " project = SD AND type = Bug "),
            filter("Broken", ""),
            filter("Mine", "assignee = currentUser()"),
        ]);
        assert_eq!(options.len(), 9);
        assert_eq!(options[7].text, "filter: Open bugs");
        assert_eq!(options[7].value, "project = SD AND type = Bug");
        assert_eq!(options[8].value, "assignee = currentUser()");
    }
}
