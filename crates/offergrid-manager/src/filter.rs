//! Attribute filtering for offer admission.
//!
//! A task with registered filters only accepts offers where at least one
//! filter matches at least one attribute (ANY, not ALL). A task with a
//! filter list is always gated by it, whatever the kinds in the list.
//!
//! Under [`FilterMode::TextOnly`] the filter kind is never read: the first
//! term of every filter is compared case-insensitively against the offer's
//! text attributes, and later terms are ignored. Scalar, set and ranges
//! attributes never satisfy a filter in this mode. [`FilterMode::Full`]
//! evaluates every kind against attributes of the same kind and compares
//! every term.

use offergrid_constraints::Constraint;
use offergrid_core::{Attribute, AttributeValue, FilterMode};

/// Whether an offer with `attributes` passes the task's `filters`.
pub fn admits(mode: FilterMode, filters: &[Constraint], attributes: &[Attribute]) -> bool {
    if filters.is_empty() {
        return true;
    }

    filters.iter().any(|filter| {
        attributes
            .iter()
            .any(|attr| matches_attribute(mode, filter, attr))
    })
}

fn matches_attribute(mode: FilterMode, filter: &Constraint, attr: &Attribute) -> bool {
    if mode == FilterMode::TextOnly {
        return match &attr.value {
            AttributeValue::Text(text) => first_term_matches_text(&filter.values, text),
            _ => false,
        };
    }

    if attr.value.kind() != filter.kind {
        return false;
    }
    match &attr.value {
        AttributeValue::Text(text) => any_term_matches_text(&filter.values, text),
        AttributeValue::Scalar(value) => any_term_matches_scalar(&filter.values, *value),
        AttributeValue::Set(items) => any_term_in_set(&filter.values, items),
        AttributeValue::Ranges(ranges) => filter
            .values
            .iter()
            .filter_map(|term| term.trim().parse::<u64>().ok())
            .any(|v| ranges.iter().any(|r| r.contains(v))),
    }
}

/// Only the first term decides; later terms are never compared.
fn first_term_matches_text(terms: &[String], text: &str) -> bool {
    terms
        .first()
        .is_some_and(|term| term.to_lowercase() == text.to_lowercase())
}

fn any_term_matches_text(terms: &[String], text: &str) -> bool {
    terms
        .iter()
        .any(|term| term.to_lowercase() == text.to_lowercase())
}

/// Terms that do not parse as floats are ignored.
fn any_term_matches_scalar(terms: &[String], value: f64) -> bool {
    terms
        .iter()
        .filter_map(|term| term.trim().parse::<f64>().ok())
        .any(|t| t == value)
}

fn any_term_in_set(terms: &[String], items: &[String]) -> bool {
    terms.iter().any(|term| {
        let term = term.to_lowercase();
        items.iter().any(|item| item.to_lowercase() == term)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use offergrid_core::{FilterKind, ValueRange};

    fn constraint(kind: FilterKind, values: &[&str]) -> Constraint {
        Constraint {
            kind,
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn attrs() -> Vec<Attribute> {
        vec![
            Attribute::text("rack", "Rack-1"),
            Attribute::scalar("generation", 3.0),
            Attribute::set("zones", ["us-east-1a", "us-east-1b"]),
            Attribute::ranges("ports", vec![ValueRange { begin: 31000, end: 32000 }]),
        ]
    }

    #[test]
    fn no_filters_admits_everything() {
        assert!(admits(FilterMode::TextOnly, &[], &attrs()));
        assert!(admits(FilterMode::Full, &[], &[]));
    }

    #[test]
    fn text_matches_case_insensitively() {
        let f = vec![constraint(FilterKind::Text, &["rack-1"])];
        assert!(admits(FilterMode::TextOnly, &f, &attrs()));
        assert!(admits(FilterMode::Full, &f, &attrs()));
    }

    #[test]
    fn text_without_matching_attribute_rejects() {
        let f = vec![constraint(FilterKind::Text, &["gpu"])];
        assert!(!admits(FilterMode::TextOnly, &f, &attrs()));
        assert!(!admits(FilterMode::TextOnly, &f, &[]));
    }

    #[test]
    fn text_only_compares_first_term() {
        let f = vec![constraint(FilterKind::Text, &["gpu", "rack-1"])];
        assert!(!admits(FilterMode::TextOnly, &f, &attrs()));
        assert!(admits(FilterMode::Full, &f, &attrs()));
    }

    #[test]
    fn any_filter_matching_is_enough() {
        let f = vec![
            constraint(FilterKind::Text, &["gpu"]),
            constraint(FilterKind::Text, &["rack-1"]),
        ];
        assert!(admits(FilterMode::TextOnly, &f, &attrs()));
    }

    #[test]
    fn text_only_gates_on_non_text_filters() {
        // No text attribute equals "99": the scalar filter still rejects.
        let scalar_only = vec![constraint(FilterKind::Scalar, &["99"])];
        assert!(!admits(FilterMode::TextOnly, &scalar_only, &attrs()));

        // The scalar attribute itself never satisfies a filter here.
        let generation = vec![constraint(FilterKind::Scalar, &["3"])];
        assert!(!admits(FilterMode::TextOnly, &generation, &attrs()));
    }

    #[test]
    fn text_only_compares_any_kind_against_text_attributes() {
        let set_kind = vec![
            constraint(FilterKind::Set, &["RACK-1"]),
            constraint(FilterKind::Text, &["gpu"]),
        ];
        assert!(admits(FilterMode::TextOnly, &set_kind, &attrs()));

        // Full mode only compares a set filter against set attributes.
        assert!(!admits(FilterMode::Full, &set_kind, &attrs()));
    }

    #[test]
    fn full_mode_scalar() {
        let hit = vec![constraint(FilterKind::Scalar, &["not-a-number", "3"])];
        let miss = vec![constraint(FilterKind::Scalar, &["4.5"])];
        assert!(admits(FilterMode::Full, &hit, &attrs()));
        assert!(!admits(FilterMode::Full, &miss, &attrs()));
    }

    #[test]
    fn full_mode_set() {
        let hit = vec![constraint(FilterKind::Set, &["US-EAST-1B"])];
        let miss = vec![constraint(FilterKind::Set, &["eu-west-1a"])];
        assert!(admits(FilterMode::Full, &hit, &attrs()));
        assert!(!admits(FilterMode::Full, &miss, &attrs()));
    }

    #[test]
    fn full_mode_ranges() {
        let hit = vec![constraint(FilterKind::Ranges, &["32000"])];
        let miss = vec![constraint(FilterKind::Ranges, &["8080", "x"])];
        assert!(admits(FilterMode::Full, &hit, &attrs()));
        assert!(!admits(FilterMode::Full, &miss, &attrs()));
    }

    #[test]
    fn kinds_only_inspect_matching_attribute_types() {
        // "3" is a text term here; the scalar attribute must not satisfy it.
        let f = vec![constraint(FilterKind::Text, &["3"])];
        assert!(!admits(FilterMode::Full, &f, &attrs()));
    }
}
