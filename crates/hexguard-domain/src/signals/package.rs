use super::{ExtractContext, Priority, Signal};
use crate::error::ExtractionError;
use crate::model::{MethodDecl, TypeDescriptor};
use hexguard_types::{PortKind, Role};

const P: Priority = Priority::Package;

const PORT_SEGMENTS: &[&str] = &["port", "ports"];
const DRIVING_QUALIFIERS: &[&str] = &["in", "driving", "inbound", "primary"];
const DRIVEN_QUALIFIERS: &[&str] = &["out", "driven", "outbound", "secondary"];
const ADAPTER_SEGMENTS: &[&str] = &["adapter", "adapters", "infrastructure", "infra"];
const DOMAIN_SEGMENTS: &[&str] = &["domain", "model"];
const QUERY_PREFIXES: &[&str] = &["get", "find", "list", "search", "query", "count", "load"];

fn segments(package: &str) -> Vec<&str> {
    package.split('.').filter(|s| !s.is_empty()).collect()
}

fn matches_port_side(package: &str, qualifiers: &[&str], standalone: &str) -> bool {
    let segs = segments(package);
    if segs.iter().any(|s| ADAPTER_SEGMENTS.contains(s)) {
        return false;
    }
    segs.windows(2)
        .any(|w| PORT_SEGMENTS.contains(&w[0]) && qualifiers.contains(&w[1]))
        || segs.contains(&standalone)
}

/// `ports.in`, `port.driving` and variants, or a standalone `driving` segment.
pub fn is_driving_package(package: &str) -> bool {
    matches_port_side(package, DRIVING_QUALIFIERS, "driving")
}

/// `ports.out`, `port.driven` and variants, or a standalone `driven` segment.
pub fn is_driven_package(package: &str) -> bool {
    matches_port_side(package, DRIVEN_QUALIFIERS, "driven")
}

/// Either side of the port boundary.
pub fn is_port_package(package: &str) -> bool {
    is_driving_package(package) || is_driven_package(package)
}

pub fn is_domain_package(package: &str) -> bool {
    segments(package).iter().any(|s| DOMAIN_SEGMENTS.contains(s))
}

pub fn is_application_package(package: &str) -> bool {
    segments(package).contains(&"application")
}

/// Command when every operation returns nothing, query when every operation reads.
fn driving_kind(methods: &[MethodDecl]) -> Option<PortKind> {
    if methods.is_empty() {
        return None;
    }
    if methods.iter().all(|m| !m.returns_value()) {
        return Some(PortKind::Command);
    }
    let reads = methods
        .iter()
        .all(|m| m.returns_value() && QUERY_PREFIXES.iter().any(|p| m.name.starts_with(p)));
    reads.then_some(PortKind::Query)
}

pub fn extract(
    ty: &TypeDescriptor,
    _ctx: &ExtractContext<'_>,
) -> Result<Vec<Signal>, ExtractionError> {
    let pkg = ty.package.as_str();
    // With operations declared, the package alone clears every preset threshold.
    let strength = if ty.methods.is_empty() { 0.25 } else { 0.7 };
    let mut out = Vec::new();

    if is_driving_package(pkg) {
        out.push(
            Signal::new(
                "package.driving-port",
                P,
                Role::DrivingPort,
                strength,
                format!("package '{pkg}'"),
            )
            .with_optional_kind(driving_kind(&ty.methods)),
        );
    } else if is_driven_package(pkg) {
        out.push(Signal::new(
            "package.driven-port",
            P,
            Role::DrivenPort,
            strength,
            format!("package '{pkg}'"),
        ));
    }

    if is_domain_package(pkg) {
        for role in Role::ASSIGNABLE.into_iter().filter(|r| r.is_domain_element()) {
            out.push(
                Signal::new("package.domain", P, role, 0.1, format!("package '{pkg}'"))
                    .corroborating(),
            );
        }
    }

    if is_application_package(pkg) {
        out.push(
            Signal::new(
                "package.application",
                P,
                Role::UseCase,
                0.1,
                format!("package '{pkg}'"),
            )
            .corroborating(),
        );
    }

    Ok(out)
}
