use crate::signals::{Priority, Signal};
use hexguard_types::{PortKind, Role};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scored {
    pub role: Role,
    pub score: f64,
    /// Best (lowest) priority among the signals counted for this role.
    pub best_priority: Priority,
}

/// Signals that count: all primary signals, plus corroborating signals for roles that
/// already have a primary one.
pub fn counted(signals: &[Signal]) -> Vec<&Signal> {
    let primary: BTreeSet<Role> = signals
        .iter()
        .filter(|s| !s.corroborating)
        .map(|s| s.role)
        .collect();
    signals
        .iter()
        .filter(|s| !s.corroborating || primary.contains(&s.role))
        .collect()
}

/// Per-role totals capped at 1.0 and rounded to 4 decimals, best candidate first.
///
/// Ties are broken by best signal priority, then by role name.
pub fn rank(signals: &[&Signal]) -> Vec<Scored> {
    let mut totals: BTreeMap<Role, (f64, Priority)> = BTreeMap::new();
    for s in signals {
        let entry = totals.entry(s.role).or_insert((0.0, s.priority));
        entry.0 += s.strength;
        entry.1 = entry.1.min(s.priority);
    }

    let mut ranked: Vec<Scored> = totals
        .into_iter()
        .map(|(role, (sum, best_priority))| Scored {
            role,
            score: round4(sum.min(1.0)),
            best_priority,
        })
        .collect();
    ranked.sort_by(compare);
    ranked
}

fn compare(a: &Scored, b: &Scored) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.best_priority.cmp(&b.best_priority))
        .then(a.role.as_str().cmp(b.role.as_str()))
}

/// Port kind carried by the best hinting signal for `role`: best priority first, then
/// strength. `Generic` for port roles without any hint.
pub fn port_kind_for(role: Role, signals: &[&Signal]) -> Option<PortKind> {
    if !role.is_port() {
        return None;
    }
    let mut best: Option<&Signal> = None;
    for s in signals.iter().filter(|s| s.role == role && s.port_kind.is_some()) {
        let better = match best {
            None => true,
            Some(b) => {
                s.priority < b.priority || (s.priority == b.priority && s.strength > b.strength)
            }
        };
        if better {
            best = Some(s);
        }
    }
    Some(best.and_then(|s| s.port_kind).unwrap_or(PortKind::Generic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(role: Role, strength: f64, priority: Priority) -> Signal {
        Signal::new("test", priority, role, strength, "")
    }

    #[test]
    fn sums_are_capped_and_rounded() {
        let signals = [
            sig(Role::Identifier, 0.4, Priority::Structural),
            sig(Role::Identifier, 0.6, Priority::Naming),
            sig(Role::Identifier, 0.2, Priority::Usage),
            sig(Role::ValueObject, 0.1, Priority::Structural),
            sig(Role::ValueObject, 0.2, Priority::Structural),
        ];
        let refs: Vec<&Signal> = signals.iter().collect();
        let ranked = rank(&refs);
        assert_eq!(ranked[0].role, Role::Identifier);
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].score, 0.3);
    }

    #[test]
    fn corroborating_signals_need_a_primary() {
        let signals = [
            sig(Role::ValueObject, 0.6, Priority::Structural),
            sig(Role::ValueObject, 0.1, Priority::Package).corroborating(),
            sig(Role::Entity, 0.1, Priority::Package).corroborating(),
        ];
        let kept = counted(&signals);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|s| s.role == Role::ValueObject));
    }

    #[test]
    fn ties_prefer_better_priority_then_role_name() {
        let signals = [
            sig(Role::Validator, 0.5, Priority::Naming),
            sig(Role::DomainService, 0.5, Priority::Structural),
            sig(Role::Entity, 0.5, Priority::Structural),
        ];
        let refs: Vec<&Signal> = signals.iter().collect();
        let ranked = rank(&refs);
        let order: Vec<Role> = ranked.iter().map(|s| s.role).collect();
        assert_eq!(order, vec![Role::DomainService, Role::Entity, Role::Validator]);
    }

    #[test]
    fn port_kind_defaults_to_generic() {
        let signals = [sig(Role::DrivingPort, 0.5, Priority::Package)];
        let refs: Vec<&Signal> = signals.iter().collect();
        assert_eq!(port_kind_for(Role::DrivingPort, &refs), Some(PortKind::Generic));
        assert_eq!(port_kind_for(Role::Entity, &refs), None);

        let hinted = [
            sig(Role::DrivenPort, 0.5, Priority::Naming).with_kind(PortKind::Gateway),
            sig(Role::DrivenPort, 0.5, Priority::Structural).with_kind(PortKind::Repository),
        ];
        let refs: Vec<&Signal> = hinted.iter().collect();
        assert_eq!(port_kind_for(Role::DrivenPort, &refs), Some(PortKind::Repository));

        // A strong package guess does not override a naming hint.
        let mixed = [
            sig(Role::DrivingPort, 0.7, Priority::Package).with_kind(PortKind::Command),
            sig(Role::DrivingPort, 0.5, Priority::Naming).with_kind(PortKind::UseCase),
        ];
        let refs: Vec<&Signal> = mixed.iter().collect();
        assert_eq!(port_kind_for(Role::DrivingPort, &refs), Some(PortKind::UseCase));
    }
}
