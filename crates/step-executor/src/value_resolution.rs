use core_types::{Step, ValueSource};

use crate::executor::StepExecutionContext;

/// Resolves the value an `input`/`enter` step should use, first hit wins
/// (§4.4): direct CSV match on the step's label, then a mapped CSV column,
/// then the recorded value, then an empty string.
pub fn resolve_value(step: &Step, context: &StepExecutionContext) -> (String, ValueSource) {
    if let Some(direct) = context.csv_values.get(&step.label) {
        return (direct.clone(), ValueSource::CsvDirect);
    }

    let mapped_column = context
        .field_mappings
        .iter()
        .find(|(_, label)| label.as_str() == step.label.as_str())
        .map(|(csv_column, _)| csv_column);
    if let Some(csv_column) = mapped_column {
        if let Some(mapped) = context.csv_values.get(csv_column) {
            return (mapped.clone(), ValueSource::CsvMapped);
        }
    }

    if let Some(recorded) = &step.value {
        return (recorded.clone(), ValueSource::Recorded);
    }

    (String::new(), ValueSource::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Step as CoreStep, StepEvent};

    fn context_with(
        csv_values: Vec<(&str, &str)>,
        field_mappings: Vec<(&str, &str)>,
    ) -> StepExecutionContext {
        StepExecutionContext {
            target_document: "doc".into(),
            csv_values: csv_values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            field_mappings: field_mappings
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            page_url: None,
            tab_id: None,
        }
    }

    #[test]
    fn direct_csv_match_wins_first() {
        let step = CoreStep::new("s1", StepEvent::Input, "Email").with_value("recorded@x.com");
        let ctx = context_with(vec![("Email", "a@b.c")], vec![]);
        let (value, source) = resolve_value(&step, &ctx);
        assert_eq!(value, "a@b.c");
        assert_eq!(source, ValueSource::CsvDirect);
    }

    #[test]
    fn mapped_csv_used_when_no_direct_match() {
        let step = CoreStep::new("s1", StepEvent::Input, "Email Field").with_value("recorded");
        let ctx = context_with(vec![("email", "x@y.z")], vec![("email", "Email Field")]);
        let (value, source) = resolve_value(&step, &ctx);
        assert_eq!(value, "x@y.z");
        assert_eq!(source, ValueSource::CsvMapped);
    }

    #[test]
    fn recorded_value_used_when_no_csv_match() {
        let step = CoreStep::new("s1", StepEvent::Input, "Email").with_value("recorded@x.com");
        let ctx = context_with(vec![], vec![]);
        let (value, source) = resolve_value(&step, &ctx);
        assert_eq!(value, "recorded@x.com");
        assert_eq!(source, ValueSource::Recorded);
    }

    #[test]
    fn empty_string_when_nothing_matches() {
        let step = CoreStep::new("s1", StepEvent::Input, "Email");
        let ctx = context_with(vec![], vec![]);
        let (value, source) = resolve_value(&step, &ctx);
        assert_eq!(value, "");
        assert_eq!(source, ValueSource::None);
    }
}
