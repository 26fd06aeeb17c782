use super::{ExtractContext, Priority, Signal};
use crate::error::ExtractionError;
use crate::model::{TypeDescriptor, TypeKind};
use hexguard_types::{PortKind, Role};

/// Recognized architecture annotations by simple name.
const ANNOTATIONS: &[(&str, Role, Option<PortKind>)] = &[
    ("AggregateRoot", Role::AggregateRoot, None),
    ("Entity", Role::Entity, None),
    ("ValueObject", Role::ValueObject, None),
    ("Identity", Role::Identifier, None),
    ("Identifier", Role::Identifier, None),
    ("DomainEvent", Role::DomainEvent, None),
    ("Repository", Role::DrivenPort, Some(PortKind::Repository)),
    ("PrimaryPort", Role::DrivingPort, None),
    ("DrivingPort", Role::DrivingPort, None),
    ("SecondaryPort", Role::DrivenPort, None),
    ("DrivenPort", Role::DrivenPort, None),
    ("UseCase", Role::UseCase, None),
    ("Service", Role::DomainService, None),
    ("DomainService", Role::DomainService, None),
    ("Specification", Role::Specification, None),
    ("Validator", Role::Validator, None),
];

pub fn lookup(simple_name: &str) -> Option<(Role, Option<PortKind>)> {
    ANNOTATIONS
        .iter()
        .find(|(name, _, _)| *name == simple_name)
        .map(|(_, role, kind)| (*role, *kind))
}

pub fn extract(
    ty: &TypeDescriptor,
    _ctx: &ExtractContext<'_>,
) -> Result<Vec<Signal>, ExtractionError> {
    let mut out = Vec::new();
    for name in ty.annotation_names() {
        let Some((mut role, mut kind)) = lookup(name) else {
            continue;
        };
        // `@UseCase` on an interface declares the driving port, not its implementation.
        if role == Role::UseCase && ty.kind == TypeKind::Interface {
            role = Role::DrivingPort;
            kind = Some(PortKind::UseCase);
        }
        out.push(
            Signal::new(
                "annotation.explicit",
                Priority::Annotation,
                role,
                1.0,
                format!("@{name}"),
            )
            .with_optional_kind(kind),
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{class, ctx_for, interface};

    #[test]
    fn recognizes_qualified_and_prefixed_annotations() {
        let ty = class("com.acme.Order").annotated("@org.jmolecules.ddd.annotation.AggregateRoot");
        let (model, facts) = ctx_for(vec![ty.clone()]);
        let ctx = ExtractContext { model: &model, facts: &facts };
        let signals = extract(&ty, &ctx).expect("extract");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].role, Role::AggregateRoot);
        assert_eq!(signals[0].strength, 1.0);
    }

    #[test]
    fn use_case_on_interface_is_a_driving_port() {
        let ty = interface("com.acme.PlaceOrder").annotated("UseCase");
        let (model, facts) = ctx_for(vec![ty.clone()]);
        let ctx = ExtractContext { model: &model, facts: &facts };
        let signals = extract(&ty, &ctx).expect("extract");
        assert_eq!(signals[0].role, Role::DrivingPort);
        assert_eq!(signals[0].port_kind, Some(PortKind::UseCase));
    }

    #[test]
    fn unknown_annotations_are_ignored() {
        let ty = class("com.acme.Order").annotated("Deprecated");
        let (model, facts) = ctx_for(vec![ty.clone()]);
        let ctx = ExtractContext { model: &model, facts: &facts };
        assert!(extract(&ty, &ctx).expect("extract").is_empty());
    }
}
