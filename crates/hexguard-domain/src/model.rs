//! Symbol model: the read-only description of every type discovered in one run.
//!
//! Descriptors arrive fully extracted from an external front-end. Type references
//! are kept as written and only parsed on demand by the consumers that need them.

use crate::error::{ExtractionError, ModelError};
use hexguard_types::TypeName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Record,
    Enum,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Record => "record",
            TypeKind::Enum => "enum",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Package,
    #[default]
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// A type reference exactly as written in source, e.g. `java.util.List<com.acme.LineItem>`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(&self) -> Result<ParsedType, ExtractionError> {
        Parser::new(&self.0).parse_all()
    }

    /// Best-effort simple name of the outer type, without generics or array suffixes.
    ///
    /// Never fails; used by heuristics that only need the leading identifier.
    pub fn simple_base(&self) -> &str {
        let head = self.0.split('<').next().unwrap_or("");
        let head = head.trim().trim_end_matches("[]").trim_end_matches("...");
        head.rsplit(['.', '$']).next().unwrap_or(head).trim()
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        TypeRef::new(value)
    }
}

/// Container types whose type arguments are *contained* rather than merely referenced.
pub const CONTAINERS: &[&str] = &[
    "List",
    "Set",
    "Collection",
    "Iterable",
    "Map",
    "Optional",
    "Stream",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedType {
    /// Base name as written, with `$` normalized to `.` (`java.util.List`, `LineItem`, `?`).
    pub base: String,
    pub args: Vec<ParsedType>,
    /// Array dimensions, varargs counted as one.
    pub array_dims: u32,
}

impl ParsedType {
    pub fn simple_name(&self) -> &str {
        self.base.rsplit('.').next().unwrap_or(&self.base)
    }

    pub fn is_wildcard(&self) -> bool {
        self.base == "?"
    }

    pub fn is_container(&self) -> bool {
        CONTAINERS.contains(&self.simple_name())
    }

    /// Every base name in this reference, outermost first.
    pub fn all_bases(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_bases(&mut out);
        out
    }

    fn collect_bases<'a>(&'a self, out: &mut Vec<&'a str>) {
        if !self.is_wildcard() {
            out.push(&self.base);
        }
        for arg in &self.args {
            arg.collect_bases(out);
        }
    }
}

/// Deepest generic nesting a reference may have before it is rejected as malformed.
const MAX_TYPE_DEPTH: usize = 64;

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> ExtractionError {
        ExtractionError::MalformedTypeRef {
            raw: self.src.to_string(),
            reason: reason.into(),
        }
    }

    fn parse_all(mut self) -> Result<ParsedType, ExtractionError> {
        let ty = self.parse_type()?;
        self.skip_ws();
        if self.pos != self.bytes.len() {
            return Err(self.error(format!("unexpected trailing input at offset {}", self.pos)));
        }
        Ok(ty)
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.src[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'$' {
                // Stop before a varargs ellipsis.
                if b == b'.' && self.src[self.pos..].starts_with("...") {
                    break;
                }
                self.pos += 1;
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    fn parse_type(&mut self) -> Result<ParsedType, ExtractionError> {
        if self.depth >= MAX_TYPE_DEPTH {
            return Err(self.error(format!(
                "type arguments nested deeper than {MAX_TYPE_DEPTH} levels"
            )));
        }
        self.depth += 1;
        let parsed = self.parse_type_inner();
        self.depth -= 1;
        parsed
    }

    fn parse_type_inner(&mut self) -> Result<ParsedType, ExtractionError> {
        self.skip_ws();
        if self.eat("?") {
            self.skip_ws();
            if self.eat("extends") || self.eat("super") {
                return self.parse_type();
            }
            return Ok(ParsedType {
                base: "?".to_string(),
                args: Vec::new(),
                array_dims: 0,
            });
        }

        let name = self.ident();
        if name.is_empty() {
            return Err(self.error(format!("expected a type name at offset {}", self.pos)));
        }
        if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
            return Err(self.error(format!("invalid qualified name '{name}'")));
        }

        let mut args = Vec::new();
        self.skip_ws();
        if self.eat("<") {
            loop {
                args.push(self.parse_type()?);
                self.skip_ws();
                if self.eat(",") {
                    continue;
                }
                if self.eat(">") {
                    break;
                }
                return Err(self.error("unterminated type argument list"));
            }
        }

        let mut array_dims = 0;
        loop {
            self.skip_ws();
            if self.eat("[") {
                self.skip_ws();
                if !self.eat("]") {
                    return Err(self.error("unterminated array brackets"));
                }
                array_dims += 1;
            } else if self.eat("...") {
                array_dims += 1;
            } else {
                break;
            }
        }

        Ok(ParsedType {
            base: name.replace('$', "."),
            args,
            array_dims,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub type_ref: TypeRef,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub has_setter: bool,
    #[serde(default)]
    pub is_final: bool,
}

impl FieldDecl {
    /// A field named `id`, or a field whose type's simple name ends in `Id`.
    pub fn is_identity(&self) -> bool {
        self.name == "id" || self.type_ref.simple_base().ends_with("Id")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// `None` for `void`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub exceptions: Vec<TypeRef>,
}

impl MethodDecl {
    pub fn returns_value(&self) -> bool {
        self.return_type
            .as_ref()
            .is_some_and(|t| t.as_str().trim() != "void")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: TypeName,
    pub kind: TypeKind,
    /// Declaring package; derived from `name` when empty.
    #[serde(default)]
    pub package: String,
    /// Annotation names, simple or qualified, with or without a leading `@`.
    #[serde(default)]
    pub annotations: BTreeSet<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl TypeDescriptor {
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    pub fn has_identity_field(&self) -> bool {
        self.fields.iter().any(FieldDecl::is_identity)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }

    /// Annotation simple names (`@com.acme.AggregateRoot` -> `AggregateRoot`).
    pub fn annotation_names(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(|a| {
            let a = a.trim().trim_start_matches('@');
            let a = a.split('(').next().unwrap_or(a);
            a.rsplit('.').next().unwrap_or(a)
        })
    }

    /// Every type reference a descriptor holds structurally (fields, supertype, interfaces).
    pub fn structural_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.fields
            .iter()
            .map(|f| &f.type_ref)
            .chain(self.supertype.iter())
            .chain(self.interfaces.iter())
    }

    /// References made through method signatures: parameters, return types, thrown types.
    pub fn signature_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.methods.iter().flat_map(|m| {
            m.parameters
                .iter()
                .chain(m.return_type.iter())
                .chain(m.exceptions.iter())
        })
    }
}

/// Indexed, validated set of descriptors for one run.
#[derive(Clone, Debug, Default)]
pub struct SymbolModel {
    types: BTreeMap<TypeName, TypeDescriptor>,
    packages: BTreeSet<String>,
}

impl SymbolModel {
    /// Validate and index descriptors.
    ///
    /// Fails on duplicate qualified names, and on qualified references that point into a
    /// package the model declares but name a type absent from it. Malformed references are
    /// left for the consumers to report; they are not model errors.
    pub fn new(descriptors: Vec<TypeDescriptor>) -> Result<Self, ModelError> {
        let mut types = BTreeMap::new();
        let mut packages = BTreeSet::new();

        for mut d in descriptors {
            d.name = TypeName::new(d.name.as_str());
            if d.name.as_str().is_empty() {
                return Err(ModelError::EmptyName);
            }
            if d.package.trim().is_empty() {
                d.package = d.name.package().to_string();
            }
            packages.insert(d.package.clone());
            if types.contains_key(&d.name) {
                return Err(ModelError::DuplicateType { name: d.name });
            }
            types.insert(d.name.clone(), d);
        }

        let model = Self { types, packages };
        model.check_references()?;
        Ok(model)
    }

    fn check_references(&self) -> Result<(), ModelError> {
        for d in self.types.values() {
            for r in d.structural_refs().chain(d.signature_refs()) {
                let Ok(parsed) = r.parse() else { continue };
                for base in parsed.all_bases() {
                    let candidate = TypeName::new(base);
                    if !candidate.is_qualified() || self.types.contains_key(&candidate) {
                        continue;
                    }
                    // Nested types (`pkg.Outer.Inner`) resolve through their declared outer type.
                    if self.types.contains_key(&TypeName::new(candidate.package())) {
                        continue;
                    }
                    if self.packages.contains(candidate.package())
                        && self.resolve(d, base).is_none()
                    {
                        return Err(ModelError::DanglingReference {
                            from: d.name.clone(),
                            reference: candidate.clone(),
                            package: candidate.package().to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    /// Descriptors in ascending qualified-name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &TypeName> {
        self.types.keys()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn declares_package(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    /// Resolve a base name as written inside `from` to a declared type.
    ///
    /// Qualified names resolve directly. Unqualified names resolve to a type of the same
    /// simple name in `from`'s package, then to a nested type of `from`. Anything else is
    /// external and yields `None`.
    pub fn resolve(&self, from: &TypeDescriptor, base: &str) -> Option<&TypeName> {
        let direct = TypeName::new(base);
        if let Some((name, _)) = self.types.get_key_value(&direct) {
            return Some(name);
        }
        if direct.is_qualified() && self.packages.contains(direct.package()) {
            return None;
        }

        let sibling = if from.package.is_empty() {
            direct.clone()
        } else {
            TypeName::new(format!("{}.{}", from.package, direct))
        };
        if let Some((name, _)) = self.types.get_key_value(&sibling) {
            return Some(name);
        }

        let nested = TypeName::new(format!("{}.{}", from.name, direct));
        self.types.get_key_value(&nested).map(|(name, _)| name)
    }

    /// Resolve a whole type reference's outer base, ignoring generics.
    pub fn resolve_ref(&self, from: &TypeDescriptor, r: &TypeRef) -> Option<&TypeName> {
        let parsed = r.parse().ok()?;
        self.resolve(from, &parsed.base)
    }
}
