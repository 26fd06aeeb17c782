use super::hierarchy::{self, Taxonomy};
use super::package::is_port_package;
use super::{ExtractContext, Priority, Signal};
use crate::error::ExtractionError;
use crate::model::{TypeDescriptor, TypeKind};
use hexguard_types::{PortKind, Role};

const P: Priority = Priority::Naming;

/// Interface suffixes naming a driven port, with the port kind they imply.
const DRIVEN_SUFFIXES: &[(&str, PortKind)] = &[
    ("Repository", PortKind::Repository),
    ("Gateway", PortKind::Gateway),
    ("Client", PortKind::Gateway),
    ("Provider", PortKind::Gateway),
    ("Publisher", PortKind::EventPublisher),
    ("Notifier", PortKind::EventPublisher),
    ("Sender", PortKind::EventPublisher),
];

const USE_CASE_CLASS_SUFFIXES: &[&str] = &["UseCase", "Handler", "ApplicationService"];

pub fn extract(
    ty: &TypeDescriptor,
    ctx: &ExtractContext<'_>,
) -> Result<Vec<Signal>, ExtractionError> {
    let name = ty.simple_name();
    let in_port_package = is_port_package(&ty.package);
    let mut out = Vec::new();
    let mut push = |id: &'static str, role: Role, strength: f64, kind: Option<PortKind>| {
        out.push(
            Signal::new(id, P, role, strength, format!("name '{name}'")).with_optional_kind(kind),
        );
    };

    match ty.kind {
        TypeKind::Interface => {
            if let Some((_, kind)) = DRIVEN_SUFFIXES.iter().find(|(s, _)| name.ends_with(s)) {
                push("naming.driven-port-suffix", Role::DrivenPort, 0.5, Some(*kind));
            } else if name.ends_with("UseCase") || name.ends_with("UseCases") {
                push(
                    "naming.use-case-port-suffix",
                    Role::DrivingPort,
                    0.5,
                    Some(PortKind::UseCase),
                );
            } else if name.ends_with("Service") {
                push("naming.service-port-suffix", Role::DrivingPort, 0.4, None);
            } else if name.ends_with("Specification") || name.ends_with("Spec") {
                push("naming.specification-suffix", Role::Specification, 0.4, None);
            }
        }
        TypeKind::Class | TypeKind::Record | TypeKind::Enum => {
            if name.ends_with("Id") && ty.kind == TypeKind::Record && ty.fields.len() == 1 {
                push("naming.id-suffix", Role::Identifier, 0.6, None);
            }
            // A class sitting in a port package is a misdeclared port, not a service.
            if ty.kind == TypeKind::Class && !in_port_package {
                if USE_CASE_CLASS_SUFFIXES.iter().any(|s| name.ends_with(s)) {
                    push("naming.use-case-suffix", Role::UseCase, 0.4, None);
                } else if name.ends_with("Service") {
                    push("naming.service-suffix", Role::DomainService, 0.4, None);
                }
            }
            if ty.kind == TypeKind::Class {
                let is_exception = matches!(
                    hierarchy::classify(ctx.model, ty),
                    Some((Taxonomy::Exception, _))
                );
                if name.ends_with("Exception") && is_exception {
                    push("naming.exception-suffix", Role::Exception, 0.4, None);
                }
                if name.ends_with("Validator") {
                    push("naming.validator-suffix", Role::Validator, 0.6, None);
                }
                if name.ends_with("Aggregate") || name.ends_with("Root") {
                    push("naming.aggregate-suffix", Role::AggregateRoot, 0.3, None);
                }
                if name.ends_with("Entity") {
                    push("naming.entity-suffix", Role::Entity, 0.3, None);
                }
            }
            if ty.kind != TypeKind::Enum && name.ends_with("Event") {
                push("naming.event-suffix", Role::DomainEvent, 0.4, None);
            }
            if name.ends_with("Specification") || name.ends_with("Spec") {
                push("naming.specification-suffix", Role::Specification, 0.4, None);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{class, ctx_for, field, interface, record};

    fn first(ty: TypeDescriptor) -> Option<(Role, f64, Option<PortKind>)> {
        let (model, facts) = ctx_for(vec![ty.clone()]);
        let ctx = ExtractContext { model: &model, facts: &facts };
        extract(&ty, &ctx)
            .expect("extract")
            .first()
            .map(|s| (s.role, s.strength, s.port_kind))
    }

    #[test]
    fn id_suffix_needs_single_field_record() {
        let id = record("com.acme.OrderId", vec![field("value", "long")]);
        assert_eq!(first(id), Some((Role::Identifier, 0.6, None)));

        let wide = record(
            "com.acme.OrderId",
            vec![field("a", "long"), field("b", "long")],
        );
        assert_eq!(first(wide), None);
    }

    #[test]
    fn driven_port_suffixes_carry_kinds() {
        assert_eq!(
            first(interface("com.acme.OrderRepository")),
            Some((Role::DrivenPort, 0.5, Some(PortKind::Repository)))
        );
        assert_eq!(
            first(interface("com.acme.PaymentGateway")),
            Some((Role::DrivenPort, 0.5, Some(PortKind::Gateway)))
        );
        assert_eq!(
            first(interface("com.acme.EventPublisher")),
            Some((Role::DrivenPort, 0.5, Some(PortKind::EventPublisher)))
        );
    }

    #[test]
    fn interface_and_class_suffixes_differ() {
        assert_eq!(
            first(interface("com.acme.OrderService")),
            Some((Role::DrivingPort, 0.4, None))
        );
        assert_eq!(
            first(class("com.acme.PricingService")),
            Some((Role::DomainService, 0.4, None))
        );
        assert_eq!(
            first(class("com.acme.PlaceOrderHandler")),
            Some((Role::UseCase, 0.4, None))
        );
    }

    #[test]
    fn exception_suffix_requires_inheritance() {
        assert_eq!(first(class("com.acme.OrderException")), None);
        assert_eq!(
            first(class("com.acme.OrderException").extending("RuntimeException")),
            Some((Role::Exception, 0.4, None))
        );
        assert_eq!(first(class("com.acme.OrderException").extending("BaseThing")), None);
    }

    #[test]
    fn class_suffixes_are_ignored_in_port_packages() {
        assert_eq!(first(class("com.acme.ports.in.OrderService")), None);
        assert_eq!(first(class("com.acme.ports.out.PlaceOrderHandler")), None);
        assert_eq!(
            first(interface("com.acme.ports.in.OrderService")),
            Some((Role::DrivingPort, 0.4, None))
        );
    }
}
