//! Shape-based signals: fields, mutability, identity, methods, hierarchy.

use super::hierarchy::{self, Taxonomy};
use super::package::is_port_package;
use super::{ExtractContext, Priority, Signal};
use crate::error::ExtractionError;
use crate::facts;
use crate::model::{TypeDescriptor, TypeKind};
use hexguard_types::{PortKind, Role};

const P: Priority = Priority::Structural;

pub fn extract(
    ty: &TypeDescriptor,
    ctx: &ExtractContext<'_>,
) -> Result<Vec<Signal>, ExtractionError> {
    // Shape checks read field types; an unreadable field signature voids the whole family.
    for f in &ty.fields {
        f.type_ref.parse()?;
    }

    let mut out = Vec::new();
    match ty.kind {
        TypeKind::Interface => interface_signals(ty, &mut out),
        TypeKind::Record => record_signals(ty, &mut out),
        TypeKind::Enum => out.push(Signal::new(
            "structural.enum",
            P,
            Role::ValueObject,
            0.5,
            "enum constants are immutable values",
        )),
        TypeKind::Class => class_signals(ty, ctx, &mut out),
    }

    if matches!(ty.kind, TypeKind::Class | TypeKind::Record) {
        match hierarchy::classify(ctx.model, ty) {
            Some((Taxonomy::Exception, base)) if ty.kind == TypeKind::Class => out.push(
                Signal::new(
                    "structural.exception-hierarchy",
                    P,
                    Role::Exception,
                    0.6,
                    format!("extends {base}"),
                ),
            ),
            Some((Taxonomy::Event, base)) => out.push(Signal::new(
                "structural.event-hierarchy",
                P,
                Role::DomainEvent,
                0.6,
                format!("is a {base}"),
            )),
            _ => {}
        }
    }

    if is_specification(ty) {
        out.push(Signal::new(
            "structural.specification",
            P,
            Role::Specification,
            0.6,
            "specification contract",
        ));
    }

    if ty.kind == TypeKind::Class && ty.has_method("validate") {
        out.push(Signal::new(
            "structural.validate-method",
            P,
            Role::Validator,
            0.3,
            "declares validate()",
        ));
    }

    Ok(out)
}

fn interface_signals(ty: &TypeDescriptor, out: &mut Vec<Signal>) {
    let persistence: Vec<&str> = ty
        .methods
        .iter()
        .filter(|m| facts::is_persistence_method(m))
        .map(|m| m.name.as_str())
        .collect();
    if !persistence.is_empty() {
        out.push(
            Signal::new(
                "structural.persistence-methods",
                P,
                Role::DrivenPort,
                0.5,
                format!("persistence methods: {}", persistence.join(", ")),
            )
            .with_kind(PortKind::Repository),
        );
    }
}

fn record_signals(ty: &TypeDescriptor, out: &mut Vec<Signal>) {
    if ty.fields.len() == 1 {
        let component = &ty.fields[0];
        out.push(Signal::new(
            "structural.single-value-record",
            P,
            Role::Identifier,
            0.4,
            format!("wraps a single '{}'", component.name),
        ));
        out.push(Signal::new(
            "structural.single-value-record",
            P,
            Role::ValueObject,
            0.3,
            format!("wraps a single '{}'", component.name),
        ));
        return;
    }

    // Record components referencing other identifiers do not give the record identity.
    let own_identity = ty.fields.iter().any(|f| f.name == "id");
    if !ty.fields.is_empty() && !own_identity {
        out.push(Signal::new(
            "structural.immutable-no-identity",
            P,
            Role::ValueObject,
            0.6,
            "immutable record without identity",
        ));
    }
}

fn class_signals(ty: &TypeDescriptor, ctx: &ExtractContext<'_>, out: &mut Vec<Signal>) {
    let identity = ty.fields.iter().find(|f| f.is_identity());
    let immutable = ty.fields.iter().all(|f| f.is_final && !f.has_setter);
    let mutators = ty.fields.iter().any(|f| f.has_setter)
        || ty.methods.iter().any(|m| is_setter_name(&m.name));

    match identity {
        Some(id) if id.is_final && ctx.facts.is_repository_managed(&ty.name) => {
            out.push(Signal::new(
                "structural.managed-identity",
                P,
                Role::AggregateRoot,
                0.6,
                format!("final identity field '{}' and persisted by a repository", id.name),
            ));
        }
        Some(id) => {
            let strength = if immutable && !mutators { 0.4 } else { 0.6 };
            out.push(Signal::new(
                "structural.identity",
                P,
                Role::Entity,
                strength,
                format!("identity field '{}'", id.name),
            ));
        }
        None if !ty.fields.is_empty() && immutable && !mutators => {
            out.push(Signal::new(
                "structural.immutable-no-identity",
                P,
                Role::ValueObject,
                0.5,
                "all fields final, no setters, no identity",
            ));
        }
        None => {}
    }

    let implemented: Vec<&str> = ty
        .interfaces
        .iter()
        .filter_map(|i| ctx.model.resolve_ref(ty, i))
        .filter(|name| ctx.facts.is_driving_port_interface(name))
        .map(|name| name.as_str())
        .collect();
    if !implemented.is_empty() {
        out.push(Signal::new(
            "structural.implements-driving-port",
            P,
            Role::UseCase,
            0.6,
            format!("implements {}", implemented.join(", ")),
        ));
    }

    if implemented.is_empty() && !is_port_package(&ty.package) && is_stateless(ty, ctx) {
        out.push(Signal::new(
            "structural.stateless",
            P,
            Role::DomainService,
            0.3,
            "stateless class with behavior",
        ));
    }
}

/// Behavior-only class: has methods, and every field is a final collaborator interface.
fn is_stateless(ty: &TypeDescriptor, ctx: &ExtractContext<'_>) -> bool {
    !ty.methods.is_empty()
        && ty.fields.iter().all(|f| {
            f.is_final
                && ctx
                    .model
                    .resolve_ref(ty, &f.type_ref)
                    .and_then(|name| ctx.model.get(name))
                    .is_some_and(|t| t.kind == TypeKind::Interface)
        })
}

fn is_setter_name(name: &str) -> bool {
    name.strip_prefix("set")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

fn is_specification(ty: &TypeDescriptor) -> bool {
    ty.has_method("isSatisfiedBy")
        || ty
            .interfaces
            .iter()
            .chain(ty.supertype.iter())
            .any(|r| r.simple_base() == "Specification")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        class, ctx_for, field, final_field, interface, method, record, setter_field,
    };

    fn roles(ty: &TypeDescriptor, all: Vec<TypeDescriptor>) -> Vec<(Role, f64)> {
        let (model, facts) = ctx_for(all);
        let ctx = ExtractContext { model: &model, facts: &facts };
        extract(ty, &ctx)
            .expect("extract")
            .into_iter()
            .map(|s| (s.role, s.strength))
            .collect()
    }

    #[test]
    fn single_value_record_hints_identifier_and_value_object() {
        let ty = record("com.acme.OrderId", vec![field("value", "java.util.UUID")]);
        assert_eq!(
            roles(&ty, vec![ty.clone()]),
            vec![(Role::Identifier, 0.4), (Role::ValueObject, 0.3)]
        );
    }

    #[test]
    fn managed_class_with_final_identity_is_aggregate_root() {
        let order = class("com.acme.Order").with_field(final_field("id", "OrderId"));
        let repo = interface("com.acme.OrderRepository")
            .with_method(method("save", &["Order"], None));
        let got = roles(&order, vec![order.clone(), repo]);
        assert_eq!(got, vec![(Role::AggregateRoot, 0.6)]);
    }

    #[test]
    fn unmanaged_mutable_identity_is_entity() {
        let line = class("com.acme.Line")
            .with_field(final_field("id", "LineId"))
            .with_field(setter_field("qty", "int"));
        assert_eq!(roles(&line, vec![line.clone()]), vec![(Role::Entity, 0.6)]);
    }

    #[test]
    fn persistence_interface_is_driven_port() {
        let repo = interface("com.acme.Orders").with_method(method("findAll", &[], Some("List<Order>")));
        let (model, facts) = ctx_for(vec![repo.clone()]);
        let ctx = ExtractContext { model: &model, facts: &facts };
        let signals = extract(&repo, &ctx).expect("extract");
        assert_eq!(signals[0].role, Role::DrivenPort);
        assert_eq!(signals[0].port_kind, Some(PortKind::Repository));
    }

    #[test]
    fn class_implementing_driving_port_is_use_case() {
        let port = interface("com.acme.PlaceOrderUseCase").with_method(method("place", &[], None));
        let svc = class("com.acme.PlaceOrderService")
            .implementing("PlaceOrderUseCase")
            .with_method(method("place", &[], None));
        let got = roles(&svc, vec![port, svc.clone()]);
        assert_eq!(got, vec![(Role::UseCase, 0.6)]);
    }

    #[test]
    fn malformed_field_signature_is_an_extraction_error() {
        let ty = class("com.acme.Broken").with_field(field("items", "List<Item"));
        let (model, facts) = ctx_for(vec![ty.clone()]);
        let ctx = ExtractContext { model: &model, facts: &facts };
        assert!(extract(&ty, &ctx).is_err());
    }

    #[test]
    fn exception_chain_and_validator_method() {
        let ex = class("com.acme.OrderRejected").extending("DomainException");
        assert_eq!(roles(&ex, vec![ex.clone()]), vec![(Role::Exception, 0.6)]);

        let v = class("com.acme.OrderRules").with_method(method("validate", &["Order"], None));
        let got = roles(&v, vec![v.clone()]);
        assert!(got.contains(&(Role::Validator, 0.3)));
    }
}
