//! Cross-type facts computed once from raw descriptors, before classification.
//!
//! Everything here is derived from the symbol model alone, so per-type signal
//! extraction can stay independent of every other type's classification.

use crate::model::{MethodDecl, SymbolModel, TypeDescriptor, TypeKind, TypeRef};
use crate::signals::package;
use hexguard_types::TypeName;
use std::collections::{BTreeMap, BTreeSet};

/// Method names that mark an interface as persistence-shaped.
pub const PERSISTENCE_METHODS: &[&str] = &[
    "save",
    "saveAll",
    "findById",
    "findAll",
    "delete",
    "deleteById",
    "deleteAll",
    "existsById",
    "persist",
    "store",
    "remove",
];

const WRITE_PREFIXES: &[&str] = &["save", "delete", "persist", "store", "remove", "update"];
const READ_PREFIXES: &[&str] = &["find", "load", "get"];

const DRIVING_PORT_SUFFIXES: &[&str] = &["UseCase", "UseCases", "Service"];
const DRIVING_PORT_ANNOTATIONS: &[&str] = &["PrimaryPort", "DrivingPort", "UseCase"];

pub fn is_persistence_method(m: &MethodDecl) -> bool {
    PERSISTENCE_METHODS.contains(&m.name.as_str())
}

pub fn is_repository_shaped(d: &TypeDescriptor) -> bool {
    d.kind == TypeKind::Interface && d.methods.iter().any(is_persistence_method)
}

#[derive(Clone, Debug, Default)]
pub struct ModelFacts {
    repository_managed: BTreeSet<TypeName>,
    /// Managed type -> repository-shaped interfaces managing it.
    managers: BTreeMap<TypeName, BTreeSet<TypeName>>,
    identity_types: BTreeSet<TypeName>,
    implementors: BTreeMap<TypeName, BTreeSet<TypeName>>,
    driving_port_interfaces: BTreeSet<TypeName>,
}

impl ModelFacts {
    pub fn build(model: &SymbolModel) -> Self {
        let mut facts = ModelFacts::default();

        for d in model.iter() {
            if is_repository_shaped(d) {
                for m in &d.methods {
                    for managed in managed_types(model, d, m) {
                        facts.repository_managed.insert(managed.clone());
                        facts
                            .managers
                            .entry(managed)
                            .or_default()
                            .insert(d.name.clone());
                    }
                }
            }

            for f in d.fields.iter().filter(|f| f.is_identity()) {
                if let Some(target) = model.resolve_ref(d, &f.type_ref) {
                    if target != &d.name {
                        facts.identity_types.insert(target.clone());
                    }
                }
            }

            for i in &d.interfaces {
                if let Some(target) = model.resolve_ref(d, i) {
                    facts
                        .implementors
                        .entry(target.clone())
                        .or_default()
                        .insert(d.name.clone());
                }
            }

            if d.kind == TypeKind::Interface && is_driving_port_shaped(d) {
                facts.driving_port_interfaces.insert(d.name.clone());
            }
        }

        facts
    }

    /// Passed to or returned from persistence methods of some repository-shaped interface.
    pub fn is_repository_managed(&self, name: &TypeName) -> bool {
        self.repository_managed.contains(name)
    }

    pub fn managers_of(&self, name: &TypeName) -> impl Iterator<Item = &TypeName> {
        self.managers.get(name).into_iter().flatten()
    }

    /// Used as the type of another type's identity field.
    pub fn is_identity_type(&self, name: &TypeName) -> bool {
        self.identity_types.contains(name)
    }

    pub fn implementors_of(&self, name: &TypeName) -> impl Iterator<Item = &TypeName> {
        self.implementors.get(name).into_iter().flatten()
    }

    pub fn has_implementors(&self, name: &TypeName) -> bool {
        self.implementors.get(name).is_some_and(|s| !s.is_empty())
    }

    pub fn is_driving_port_interface(&self, name: &TypeName) -> bool {
        self.driving_port_interfaces.contains(name)
    }
}

fn is_driving_port_shaped(d: &TypeDescriptor) -> bool {
    let simple = d.simple_name();
    DRIVING_PORT_SUFFIXES.iter().any(|s| simple.ends_with(s))
        || d
            .annotation_names()
            .any(|a| DRIVING_PORT_ANNOTATIONS.contains(&a))
        || package::is_driving_package(&d.package)
}

/// Model types a persistence method stores (parameters of writes) or loads (returns of reads).
fn managed_types(model: &SymbolModel, repo: &TypeDescriptor, m: &MethodDecl) -> Vec<TypeName> {
    let refs: Vec<&TypeRef> = if WRITE_PREFIXES.iter().any(|p| m.name.starts_with(p)) {
        // `deleteById(OrderId)` takes the key, not the managed type.
        if m.name.ends_with("ById") {
            Vec::new()
        } else {
            m.parameters.iter().collect()
        }
    } else if READ_PREFIXES.iter().any(|p| m.name.starts_with(p)) {
        m.return_type.iter().collect()
    } else {
        Vec::new()
    };

    let mut out = Vec::new();
    for r in refs {
        let Ok(parsed) = r.parse() else { continue };
        for base in parsed.all_bases() {
            if let Some(name) = model.resolve(repo, base) {
                if model.get(name).is_some_and(|t| t.kind != TypeKind::Interface) {
                    out.push(name.clone());
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{class, field, final_field, interface, method, record};

    fn order_model() -> SymbolModel {
        SymbolModel::new(vec![
            record("com.acme.OrderId", vec![field("value", "java.util.UUID")]),
            class("com.acme.Order").with_field(final_field("id", "OrderId")),
            interface("com.acme.OrderRepository")
                .with_method(method("save", &["Order"], None))
                .with_method(method("findById", &["OrderId"], Some("java.util.Optional<Order>"))),
            class("com.acme.JpaOrderRepository").implementing("OrderRepository"),
            interface("com.acme.ports.in.PlaceOrderUseCase")
                .with_method(method("place", &["Order"], None)),
        ])
        .expect("model")
    }

    #[test]
    fn repository_managed_types_come_from_writes_and_reads() {
        let facts = ModelFacts::build(&order_model());
        assert!(facts.is_repository_managed(&TypeName::new("com.acme.Order")));
        assert!(!facts.is_repository_managed(&TypeName::new("com.acme.OrderId")));
        assert_eq!(
            facts
                .managers_of(&TypeName::new("com.acme.Order"))
                .map(TypeName::as_str)
                .collect::<Vec<_>>(),
            vec!["com.acme.OrderRepository"]
        );
    }

    #[test]
    fn identity_types_and_implementors_are_indexed() {
        let facts = ModelFacts::build(&order_model());
        assert!(facts.is_identity_type(&TypeName::new("com.acme.OrderId")));
        assert!(facts.has_implementors(&TypeName::new("com.acme.OrderRepository")));
        assert!(!facts.has_implementors(&TypeName::new("com.acme.ports.in.PlaceOrderUseCase")));
    }

    #[test]
    fn driving_port_interfaces_by_suffix_or_package() {
        let facts = ModelFacts::build(&order_model());
        assert!(facts.is_driving_port_interface(&TypeName::new(
            "com.acme.ports.in.PlaceOrderUseCase"
        )));
        assert!(!facts.is_driving_port_interface(&TypeName::new("com.acme.OrderRepository")));
    }
}
