use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Architectural role assigned to a type by the classifier.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    AggregateRoot,
    Entity,
    ValueObject,
    Identifier,
    DrivingPort,
    DrivenPort,
    UseCase,
    DomainService,
    DomainEvent,
    Exception,
    Validator,
    Specification,
    Unclassified,
}

impl Role {
    /// Every assignable role, excluding `Unclassified`.
    pub const ASSIGNABLE: [Role; 12] = [
        Role::AggregateRoot,
        Role::Entity,
        Role::ValueObject,
        Role::Identifier,
        Role::DrivingPort,
        Role::DrivenPort,
        Role::UseCase,
        Role::DomainService,
        Role::DomainEvent,
        Role::Exception,
        Role::Validator,
        Role::Specification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::AggregateRoot => "AGGREGATE_ROOT",
            Role::Entity => "ENTITY",
            Role::ValueObject => "VALUE_OBJECT",
            Role::Identifier => "IDENTIFIER",
            Role::DrivingPort => "DRIVING_PORT",
            Role::DrivenPort => "DRIVEN_PORT",
            Role::UseCase => "USE_CASE",
            Role::DomainService => "DOMAIN_SERVICE",
            Role::DomainEvent => "DOMAIN_EVENT",
            Role::Exception => "EXCEPTION",
            Role::Validator => "VALIDATOR",
            Role::Specification => "SPECIFICATION",
            Role::Unclassified => "UNCLASSIFIED",
        }
    }

    pub fn is_port(self) -> bool {
        matches!(self, Role::DrivingPort | Role::DrivenPort)
    }

    /// Roles that live inside the domain model (corroborated by `domain` packages).
    pub fn is_domain_element(self) -> bool {
        matches!(
            self,
            Role::AggregateRoot
                | Role::Entity
                | Role::ValueObject
                | Role::Identifier
                | Role::DomainService
                | Role::DomainEvent
                | Role::Exception
                | Role::Specification
        )
    }

    /// Roles that carry identity and are expected to declare an identity field.
    pub fn has_identity(self) -> bool {
        matches!(self, Role::AggregateRoot | Role::Entity)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts `AGGREGATE_ROOT`, `aggregate_root`, and `aggregate-root`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Role::ASSIGNABLE
            .into_iter()
            .chain(std::iter::once(Role::Unclassified))
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Sub-classification of driving and driven ports.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortKind {
    Repository,
    Gateway,
    EventPublisher,
    UseCase,
    Command,
    Query,
    Generic,
}

impl PortKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PortKind::Repository => "REPOSITORY",
            PortKind::Gateway => "GATEWAY",
            PortKind::EventPublisher => "EVENT_PUBLISHER",
            PortKind::UseCase => "USE_CASE",
            PortKind::Command => "COMMAND",
            PortKind::Query => "QUERY",
            PortKind::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_spellings() {
        assert_eq!("AGGREGATE_ROOT".parse::<Role>(), Ok(Role::AggregateRoot));
        assert_eq!("value_object".parse::<Role>(), Ok(Role::ValueObject));
        assert_eq!("driven-port".parse::<Role>(), Ok(Role::DrivenPort));
        assert!("aggregate".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&Role::DomainEvent).expect("serialize");
        assert_eq!(json, "\"DOMAIN_EVENT\"");
        let kind = serde_json::to_string(&PortKind::EventPublisher).expect("serialize");
        assert_eq!(kind, "\"EVENT_PUBLISHER\"");
    }

    #[test]
    fn as_str_matches_serde_names() {
        for role in Role::ASSIGNABLE {
            let json = serde_json::to_string(&role).expect("serialize");
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}
