use crate::facts::ModelFacts;
use crate::model::{FieldDecl, MethodDecl, SymbolModel, TypeDescriptor, TypeKind, TypeRef, Visibility};
use hexguard_types::TypeName;
use std::collections::BTreeSet;

fn descriptor(name: &str, kind: TypeKind) -> TypeDescriptor {
    let name = TypeName::new(name);
    TypeDescriptor {
        package: name.package().to_string(),
        name,
        kind,
        annotations: BTreeSet::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        supertype: None,
        interfaces: Vec::new(),
        location: None,
    }
}

pub fn class(name: &str) -> TypeDescriptor {
    descriptor(name, TypeKind::Class)
}

pub fn interface(name: &str) -> TypeDescriptor {
    descriptor(name, TypeKind::Interface)
}

pub fn record(name: &str, fields: Vec<FieldDecl>) -> TypeDescriptor {
    let mut d = descriptor(name, TypeKind::Record);
    d.fields = fields
        .into_iter()
        .map(|f| FieldDecl { is_final: true, ..f })
        .collect();
    d
}

pub fn field(name: &str, ty: &str) -> FieldDecl {
    FieldDecl {
        name: name.to_string(),
        type_ref: TypeRef::new(ty),
        visibility: Visibility::Private,
        has_setter: false,
        is_final: false,
    }
}

pub fn final_field(name: &str, ty: &str) -> FieldDecl {
    FieldDecl {
        is_final: true,
        ..field(name, ty)
    }
}

pub fn setter_field(name: &str, ty: &str) -> FieldDecl {
    FieldDecl {
        has_setter: true,
        ..field(name, ty)
    }
}

pub fn method(name: &str, params: &[&str], ret: Option<&str>) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        parameters: params.iter().map(|p| TypeRef::new(*p)).collect(),
        return_type: ret.map(TypeRef::new),
        exceptions: Vec::new(),
    }
}

impl TypeDescriptor {
    pub fn with_field(mut self, f: FieldDecl) -> Self {
        self.fields.push(f);
        self
    }

    pub fn with_method(mut self, m: MethodDecl) -> Self {
        self.methods.push(m);
        self
    }

    pub fn extending(mut self, ty: &str) -> Self {
        self.supertype = Some(TypeRef::new(ty));
        self
    }

    pub fn implementing(mut self, ty: &str) -> Self {
        self.interfaces.push(TypeRef::new(ty));
        self
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.insert(annotation.to_string());
        self
    }
}

pub fn ctx_for(types: Vec<TypeDescriptor>) -> (SymbolModel, ModelFacts) {
    let model = SymbolModel::new(types).expect("valid test model");
    let facts = ModelFacts::build(&model);
    (model, facts)
}

/// OrderId, Order, LineItem and OrderRepository: a small, fully classifiable domain.
pub fn order_domain() -> Vec<TypeDescriptor> {
    vec![
        record(
            "com.acme.order.domain.OrderId",
            vec![field("value", "java.util.UUID")],
        ),
        class("com.acme.order.domain.Order")
            .with_field(final_field("id", "OrderId"))
            .with_field(final_field("items", "java.util.List<LineItem>"))
            .with_field(field("status", "String"))
            .with_method(method("addItem", &["LineItem"], None))
            .with_method(method("total", &[], Some("java.math.BigDecimal"))),
        record(
            "com.acme.order.domain.LineItem",
            vec![
                field("sku", "String"),
                field("quantity", "int"),
                field("unitPrice", "java.math.BigDecimal"),
            ],
        ),
        interface("com.acme.order.ports.out.OrderRepository")
            .with_method(method("save", &["com.acme.order.domain.Order"], None))
            .with_method(method(
                "findById",
                &["com.acme.order.domain.OrderId"],
                Some("java.util.Optional<com.acme.order.domain.Order>"),
            )),
    ]
}

/// An aggregate root with an identifier and a repository, optionally referencing `other`.
pub fn aggregate(pkg: &str, name: &str, other: Option<&str>) -> Vec<TypeDescriptor> {
    let mut root = class(&format!("{pkg}.{name}"))
        .with_field(final_field("id", &format!("{name}Id")))
        .with_method(method("rename", &["String"], None));
    if let Some(other) = other {
        root = root.with_field(field(&other.to_ascii_lowercase(), other));
    }
    vec![
        root,
        record(&format!("{pkg}.{name}Id"), vec![field("value", "long")]),
        interface(&format!("{pkg}.{name}Repository"))
            .with_method(method("save", &[name], None)),
    ]
}
