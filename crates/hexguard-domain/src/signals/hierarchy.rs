//! Bounded supertype walk against the closed exception/event taxonomy.

use crate::model::{SymbolModel, TypeDescriptor, TypeRef};

pub const MAX_DEPTH: usize = 8;

const EXCEPTION_BASES: &[&str] = &[
    "Throwable",
    "Exception",
    "RuntimeException",
    "Error",
    "DomainException",
    "IllegalArgumentException",
    "IllegalStateException",
];

const EVENT_BASES: &[&str] = &["DomainEvent"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Taxonomy {
    Exception,
    Event,
}

/// First taxonomy base reached from `ty`, with the base's simple name.
///
/// Walks at most [`MAX_DEPTH`] supertypes. At each step the declared supertype and
/// interfaces are compared by simple name; the walk continues only through types the
/// model declares.
pub fn classify<'a>(model: &'a SymbolModel, ty: &'a TypeDescriptor) -> Option<(Taxonomy, &'a str)> {
    let mut current = ty;
    for _ in 0..MAX_DEPTH {
        for r in current.interfaces.iter().chain(current.supertype.iter()) {
            if let Some(hit) = match_base(r) {
                return Some(hit);
            }
        }
        let next = current
            .supertype
            .as_ref()
            .and_then(|s| model.resolve_ref(current, s))
            .and_then(|name| model.get(name))?;
        current = next;
    }
    None
}

fn match_base(r: &TypeRef) -> Option<(Taxonomy, &str)> {
    let simple = r.simple_base();
    if EXCEPTION_BASES.contains(&simple) {
        Some((Taxonomy::Exception, simple))
    } else if EVENT_BASES.contains(&simple) {
        Some((Taxonomy::Event, simple))
    } else {
        None
    }
}
