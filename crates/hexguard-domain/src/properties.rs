//! Property-based tests for the domain crate.
//!
//! These cover:
//! - identifier detection over arbitrary single-value records
//! - run-to-run determinism of classification and audit output
//! - cycle detection over rings of aggregates

use crate::audit::audit;
use crate::classify::classify;
use crate::graph::build_graph;
use crate::model::{SymbolModel, TypeDescriptor};
use crate::policy::PolicyConfig;
use crate::test_support::{aggregate, field, record};
use hexguard_types::{ids, Role, Severity, TypeName};
use proptest::prelude::*;

const AGGREGATES: &[&str] = &["Order", "Customer", "Invoice", "Shipment", "Payment", "Product"];

fn arb_package() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{2,8}(\\.[a-z]{2,8}){0,3}").expect("valid regex")
}

fn arb_id_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{1,10}").expect("valid regex").prop_map(|s| format!("{s}Id"))
}

fn arb_field_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-zA-Z]{0,10}").expect("valid regex")
}

fn arb_value_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("long"),
        Just("int"),
        Just("String"),
        Just("java.util.UUID"),
        Just("java.math.BigInteger"),
    ]
}

/// A ring of `n` aggregates, each referencing the next.
fn ring(n: usize) -> Vec<TypeDescriptor> {
    (0..n)
        .flat_map(|i| {
            let next = AGGREGATES[(i + 1) % n];
            aggregate("com.acme.ring", AGGREGATES[i], Some(next))
        })
        .collect()
}

proptest! {
    /// A record with one field and an `Id` suffix is always an identifier.
    #[test]
    fn single_value_id_records_are_identifiers(
        package in arb_package(),
        name in arb_id_name(),
        field_name in arb_field_name(),
        ty in arb_value_type(),
    ) {
        let qualified = format!("{package}.{name}");
        let model = SymbolModel::new(vec![record(&qualified, vec![field(&field_name, ty)])])
            .expect("model");
        let c = classify(&model, &PolicyConfig::default());
        let r = c.get(&TypeName::new(qualified.as_str())).expect("classified");
        prop_assert_eq!(r.role, Role::Identifier);
        prop_assert!(r.confidence >= 0.9, "confidence {}", r.confidence);
    }

    /// Classifying and auditing the same model twice yields identical serialized output.
    #[test]
    fn analysis_is_deterministic(n in 1usize..=AGGREGATES.len(), threshold in 0.3f64..0.9) {
        let model = SymbolModel::new(ring(n)).expect("model");
        let config = PolicyConfig { classification_threshold: threshold, ..PolicyConfig::default() };

        let run = || {
            let c = classify(&model, &config);
            let graph = build_graph(&c, &model);
            let report = audit(&graph, &c, &model, &config);
            (
                serde_json::to_string(&c.into_results()).expect("serialize"),
                serde_json::to_string(&report).expect("serialize"),
            )
        };
        prop_assert_eq!(run(), run());
    }

    /// Any ring of two or more aggregates is one blocker naming every member.
    #[test]
    fn aggregate_rings_are_one_cycle(n in 2usize..=AGGREGATES.len()) {
        let model = SymbolModel::new(ring(n)).expect("model");
        let config = PolicyConfig::default();
        let c = classify(&model, &config);
        let graph = build_graph(&c, &model);
        let report = audit(&graph, &c, &model, &config);

        let cycles: Vec<_> = report.by_rule(ids::RULE_AGGREGATE_CYCLE).collect();
        prop_assert_eq!(cycles.len(), 1);
        prop_assert_eq!(cycles[0].severity, Severity::Blocker);
        prop_assert_eq!(cycles[0].involved.len(), n);

        let path = cycles[0].cycle.as_ref().expect("cycle path");
        prop_assert_eq!(path.len(), n + 1);
        prop_assert_eq!(path.first(), path.last());
        prop_assert_eq!(report.by_rule(ids::RULE_AGGREGATE_REFERENCE).count(), n);
    }
}
