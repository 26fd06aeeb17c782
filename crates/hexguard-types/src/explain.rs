//! Explain registry for audit rules.
//!
//! Maps rule IDs to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for an audit rule or diagnostic.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub title: &'static str,
    /// What the rule checks and which architectural constraint it protects.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    pub examples: ExamplePair,
}

/// Before and after sketches.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    pub before: &'static str,
    pub after: &'static str,
}

/// Look up an explanation by rule id. Returns `None` for unknown identifiers.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_AGGREGATE_CYCLE => Some(explain_aggregate_cycle()),
        ids::RULE_PORT_INTERFACE => Some(explain_port_interface()),
        ids::RULE_PORT_COVERAGE => Some(explain_port_coverage()),
        ids::RULE_VALUE_OBJECT_IMMUTABLE => Some(explain_value_object_immutable()),
        ids::RULE_DOMAIN_PURITY => Some(explain_domain_purity()),
        ids::RULE_UNCLASSIFIED_RATIO => Some(explain_unclassified_ratio()),
        ids::RULE_ENTITY_IDENTITY => Some(explain_entity_identity()),
        ids::RULE_AGGREGATE_REPOSITORY => Some(explain_aggregate_repository()),
        ids::RULE_AGGREGATE_REFERENCE => Some(explain_aggregate_reference()),
        ids::RULE_EVENT_NAMING => Some(explain_event_naming()),
        ids::RULE_ERROR => Some(explain_rule_error()),
        _ => None,
    }
}

/// All audit rule IDs, in catalogue order.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_AGGREGATE_CYCLE,
        ids::RULE_PORT_INTERFACE,
        ids::RULE_PORT_COVERAGE,
        ids::RULE_VALUE_OBJECT_IMMUTABLE,
        ids::RULE_DOMAIN_PURITY,
        ids::RULE_UNCLASSIFIED_RATIO,
        ids::RULE_ENTITY_IDENTITY,
        ids::RULE_AGGREGATE_REPOSITORY,
        ids::RULE_AGGREGATE_REFERENCE,
        ids::RULE_EVENT_NAMING,
    ]
}

fn explain_aggregate_cycle() -> Explanation {
    Explanation {
        title: "No Cycles Between Aggregates",
        description: "\
Detects strongly connected groups of aggregate roots that reference each other
through fields or collections.

Aggregates are consistency boundaries. A cycle between them means:
- neither aggregate can be loaded or saved without the other
- transactional boundaries blur and locking becomes unpredictable",
        remediation: "\
Break the cycle by replacing one direct reference with the target's identifier.
If the two aggregates always change together, merge them into one aggregate.",
        examples: ExamplePair {
            before: "\
class Order    { Customer customer; }
class Customer { List<Order> orders; }",
            after: "\
class Order    { CustomerId customerId; }
class Customer { List<Order> orders; }",
        },
    }
}

fn explain_port_interface() -> Explanation {
    Explanation {
        title: "Ports Must Be Interfaces",
        description: "\
Detects driving or driven ports declared as concrete classes, records or enums.

A port is the contract at the hexagon boundary. Adapters must be able to
substitute their own implementation, which a concrete type prevents.",
        remediation: "\
Extract an interface holding the port's operations and move the current body
into an adapter or application service implementing it.",
        examples: ExamplePair {
            before: "\
package com.acme.ports.in;
class PlaceOrder { void place(Order o) { ... } }",
            after: "\
package com.acme.ports.in;
interface PlaceOrder { void place(Order o); }",
        },
    }
}

fn explain_port_coverage() -> Explanation {
    Explanation {
        title: "Driven Ports Need Adapters",
        description: "\
Detects driven ports that no type in the model implements.

This rule only runs when the model contains at least one adapter, so a
domain-only snapshot is not flagged.",
        remediation: "\
Add an infrastructure adapter implementing the port, or remove the port if the
domain no longer needs it.",
        examples: ExamplePair {
            before: "interface PaymentGateway { Receipt charge(Money m); }",
            after: "\
interface PaymentGateway { Receipt charge(Money m); }
class StripePaymentGateway implements PaymentGateway { ... }",
        },
    }
}

fn explain_value_object_immutable() -> Explanation {
    Explanation {
        title: "Value Objects Are Immutable",
        description: "\
Detects value objects exposing a setter for any field.

Value objects are compared by value and freely shared. Mutating one silently
changes every holder of that value.",
        remediation: "\
Remove the setter and return a new instance from operations that change state.",
        examples: ExamplePair {
            before: "\
class Money { BigDecimal amount; void setAmount(BigDecimal a) { ... } }",
            after: "\
record Money(BigDecimal amount) { Money plus(Money o) { ... } }",
        },
    }
}

fn explain_domain_purity() -> Explanation {
    Explanation {
        title: "Domain Model Is Free of Infrastructure",
        description: "\
Detects domain elements (aggregates, entities, value objects, identifiers,
domain services, events, exceptions, specifications) that reference
persistence, framework, serialization, messaging, web or cloud SDK types
through annotations, fields, supertypes, interfaces or method signatures.

Only qualified references are checked: JPA, Spring, Hibernate, Jackson, JDBC,
Kafka, RabbitMQ, JMS, Servlet, JAX-RS, Bean Validation and the AWS, Azure,
Google Cloud and Stripe SDKs.",
        remediation: "\
Move the infrastructure concern into an adapter and map to and from the domain type there.",
        examples: ExamplePair {
            before: "\
@javax.persistence.Entity class Order { @javax.persistence.Id Long id; }",
            after: "\
class Order { OrderId id; }  // OrderJpaEntity lives in the persistence adapter",
        },
    }
}

fn explain_unclassified_ratio() -> Explanation {
    Explanation {
        title: "Unclassified Type Ratio",
        description: "\
Reports when the share of types the classifier could not assign a role to
exceeds the configured `unclassified_ratio_limit`.

The severity is CRITICAL when `fail_on_unclassified` is enabled and WARNING
otherwise.",
        remediation: "\
Annotate ambiguous types with an architecture annotation, add an entry to the
`[classifications]` table in hexguard.toml, or exclude generated code with an
`exclude` pattern.",
        examples: ExamplePair {
            before: "class OrderStuff { ... }",
            after: "@ValueObject class OrderSnapshot { ... }",
        },
    }
}

fn explain_entity_identity() -> Explanation {
    Explanation {
        title: "Entities Declare Identity",
        description: "\
Detects entities and aggregate roots without an identity field.

An identity field is a field named `id`, or a field whose type name ends in
`Id`.",
        remediation: "Add an identity field, preferably typed with a dedicated identifier record.",
        examples: ExamplePair {
            before: "class Order { List<LineItem> items; }",
            after: "class Order { final OrderId id; List<LineItem> items; }",
        },
    }
}

fn explain_aggregate_repository() -> Explanation {
    Explanation {
        title: "Aggregates Have Repositories",
        description: "\
Detects aggregate roots that no driven port manages through persistence-shaped
methods.

This rule only runs when the model declares at least one driven port.",
        remediation: "Declare a repository port for the aggregate.",
        examples: ExamplePair {
            before: "class Invoice { final InvoiceId id; }",
            after: "\
class Invoice { final InvoiceId id; }
interface InvoiceRepository { void save(Invoice i); Optional<Invoice> findById(InvoiceId id); }",
        },
    }
}

fn explain_aggregate_reference() -> Explanation {
    Explanation {
        title: "Reference Other Aggregates by Identity",
        description: "\
Detects aggregate roots holding a direct field or collection of another
aggregate root.",
        remediation: "Hold the other aggregate's identifier instead of the aggregate itself.",
        examples: ExamplePair {
            before: "class Order { Customer customer; }",
            after: "class Order { CustomerId customerId; }",
        },
    }
}

fn explain_event_naming() -> Explanation {
    Explanation {
        title: "Domain Events Are Named in Past Tense",
        description: "\
Flags domain events whose name, minus an `Event` suffix, does not read as
something that already happened.",
        remediation: "Rename the event to a past-tense verb phrase.",
        examples: ExamplePair {
            before: "record PlaceOrderEvent(OrderId id) {}",
            after: "record OrderPlacedEvent(OrderId id) {}",
        },
    }
}

fn explain_rule_error() -> Explanation {
    Explanation {
        title: "Audit Rule Failed",
        description: "\
A rule failed while inspecting the model. The remaining rules still ran and
the failure is reported as an INFO violation naming the rule.",
        remediation: "\
Run with `HEXGUARD_LOG=debug` to see the rule's error and report it with the
offending model snapshot.",
        examples: ExamplePair {
            before: "",
            after: "",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_rule_id() {
        assert!(lookup_explanation(ids::RULE_AGGREGATE_CYCLE).is_some());
        assert!(lookup_explanation(ids::RULE_PORT_INTERFACE).is_some());
        assert!(lookup_explanation(ids::RULE_ERROR).is_some());
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("unknown-rule").is_none());
    }

    #[test]
    fn all_rule_ids_are_explained() {
        for id in all_rule_ids() {
            assert!(
                lookup_explanation(id).is_some(),
                "rule {} should be in registry",
                id
            );
        }
    }
}
