#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Critical,
    Blocker,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableViolation {
    pub severity: RenderableSeverity,
    pub rule_id: String,
    pub message: String,
    pub involved: Vec<String>,
    /// Cycle path, start repeated at the end.
    pub cycle: Option<Vec<String>>,
    pub help: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableRoleCount {
    pub role: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableData {
    pub profile: String,
    pub types_scanned: u32,
    pub edges_total: u32,
    pub unclassified: u32,
    pub unclassified_ratio: f64,
    pub roles: Vec<RenderableRoleCount>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableReport {
    pub pass: bool,
    pub reasons: Vec<String>,
    pub violations: Vec<RenderableViolation>,
    pub data: RenderableData,
}
