//! Signal extractors.
//!
//! Each family inspects one descriptor (plus precomputed [`ModelFacts`]) and reports
//! weighted hints toward roles. Families are pure and stateless. A family that cannot
//! interpret a descriptor returns an [`ExtractionError`] and contributes nothing.

pub mod annotation;
pub mod hierarchy;
pub mod naming;
pub mod package;
pub mod structural;
pub mod usage;

use crate::error::ExtractionError;
use crate::facts::ModelFacts;
use crate::model::{SymbolModel, TypeDescriptor};
use hexguard_types::{PortKind, Role};

/// Signal category. Lower values win ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Annotation = 0,
    Structural = 1,
    Naming = 2,
    Package = 3,
    Usage = 4,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Annotation => "annotation",
            Priority::Structural => "structural",
            Priority::Naming => "naming",
            Priority::Package => "package",
            Priority::Usage => "usage",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    /// Stable identifier, e.g. `naming.id-suffix`.
    pub id: &'static str,
    pub role: Role,
    pub strength: f64,
    pub priority: Priority,
    pub port_kind: Option<PortKind>,
    /// Only counts toward roles that already received a non-corroborating signal.
    pub corroborating: bool,
    pub detail: String,
}

impl Signal {
    pub fn new(
        id: &'static str,
        priority: Priority,
        role: Role,
        strength: f64,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id,
            role,
            strength,
            priority,
            port_kind: None,
            corroborating: false,
            detail: detail.into(),
        }
    }

    pub fn with_kind(mut self, kind: PortKind) -> Self {
        self.port_kind = Some(kind);
        self
    }

    pub fn with_optional_kind(mut self, kind: Option<PortKind>) -> Self {
        self.port_kind = kind;
        self
    }

    pub fn corroborating(mut self) -> Self {
        self.corroborating = true;
        self
    }
}

/// Read-only inputs shared by every extractor.
#[derive(Clone, Copy, Debug)]
pub struct ExtractContext<'a> {
    pub model: &'a SymbolModel,
    pub facts: &'a ModelFacts,
}

pub type ExtractFn =
    fn(&TypeDescriptor, &ExtractContext<'_>) -> Result<Vec<Signal>, ExtractionError>;

#[derive(Clone, Copy, Debug)]
pub struct SignalFamily {
    pub name: &'static str,
    pub priority: Priority,
    pub extract: ExtractFn,
}

impl SignalFamily {
    pub const fn new(name: &'static str, priority: Priority, extract: ExtractFn) -> Self {
        Self {
            name,
            priority,
            extract,
        }
    }
}

pub fn default_families() -> Vec<SignalFamily> {
    vec![
        SignalFamily::new("annotation", Priority::Annotation, annotation::extract),
        SignalFamily::new("structural", Priority::Structural, structural::extract),
        SignalFamily::new("naming", Priority::Naming, naming::extract),
        SignalFamily::new("package", Priority::Package, package::extract),
        SignalFamily::new("usage", Priority::Usage, usage::extract),
    ]
}
