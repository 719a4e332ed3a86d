use std::collections::HashMap;

use core_types::Step;

/// Row-matching filter (§4.6 step 3): a non-empty row only runs when at
/// least one of its columns names a step, directly or through
/// `fieldMappings` (CSV column -> step label).
pub fn row_matches(steps: &[Step], row: &HashMap<String, String>, field_mappings: &HashMap<String, String>) -> bool {
    if row.is_empty() {
        return true;
    }
    row.keys().any(|column| {
        steps.iter().any(|step| &step.label == column)
            || field_mappings
                .get(column)
                .map(|label| steps.iter().any(|step| &step.label == label))
                .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::StepEvent;

    fn steps() -> Vec<Step> {
        vec![
            Step::new("s1", StepEvent::Input, "Email"),
            Step::new("s2", StepEvent::Click, "Submit"),
        ]
    }

    #[test]
    fn empty_row_always_matches() {
        assert!(row_matches(&steps(), &HashMap::new(), &HashMap::new()));
    }

    #[test]
    fn direct_label_match() {
        let row = HashMap::from([("Email".to_string(), "a@b.c".to_string())]);
        assert!(row_matches(&steps(), &row, &HashMap::new()));
    }

    #[test]
    fn mapped_column_match() {
        let row = HashMap::from([("email_col".to_string(), "a@b.c".to_string())]);
        let mappings = HashMap::from([("email_col".to_string(), "Email".to_string())]);
        assert!(row_matches(&steps(), &row, &mappings));
    }

    #[test]
    fn unrelated_columns_do_not_match() {
        let row = HashMap::from([("unrelated".to_string(), "x".to_string())]);
        assert!(!row_matches(&steps(), &row, &HashMap::new()));
    }
}
