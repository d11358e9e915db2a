//! Trigger conditions.
//!
//! A condition is an event kind plus a predicate over the event, the source
//! of the listening ability, and the current state. Predicates compose with
//! `All` and `Not`.

use serde::{Deserialize, Serialize};

use super::event::{EventKind, GameEvent};
use crate::core::{GameState, InstanceId};

/// Extra filter on top of the event kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerPredicate {
    /// No filter.
    Always,

    /// The event is about the ability's own source ("when this dies").
    SubjectIsSource,

    /// The event is about some other card ("whenever another creature...").
    SubjectIsNotSource,

    /// The subject was controlled by the source's current controller.
    SubjectControlledBySourceController,

    /// The source is on the battlefield right now.
    SourceOnBattlefield,

    All(Vec<TriggerPredicate>),
    Not(Box<TriggerPredicate>),
}

impl TriggerPredicate {
    /// Add another predicate with AND.
    #[must_use]
    pub fn and(self, other: TriggerPredicate) -> Self {
        match self {
            Self::All(mut predicates) => {
                predicates.push(other);
                Self::All(predicates)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    /// Negate this predicate.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    fn evaluate(&self, ctx: &ConditionContext<'_>) -> bool {
        match self {
            TriggerPredicate::Always => true,
            TriggerPredicate::SubjectIsSource => ctx.event.subject() == ctx.source,
            TriggerPredicate::SubjectIsNotSource => ctx.event.subject() != ctx.source,
            TriggerPredicate::SubjectControlledBySourceController => ctx
                .state
                .card(ctx.source)
                .is_ok_and(|source| source.controller == ctx.event.controller()),
            TriggerPredicate::SourceOnBattlefield => ctx.state.is_on_battlefield(ctx.source),
            TriggerPredicate::All(predicates) => predicates.iter().all(|p| p.evaluate(ctx)),
            TriggerPredicate::Not(inner) => !inner.evaluate(ctx),
        }
    }
}

/// What a condition is checked against.
pub struct ConditionContext<'a> {
    pub event: &'a GameEvent,
    pub state: &'a GameState,
    /// Source of the listening ability.
    pub source: InstanceId,
}

impl<'a> ConditionContext<'a> {
    pub fn new(event: &'a GameEvent, state: &'a GameState, source: InstanceId) -> Self {
        Self {
            event,
            state,
            source,
        }
    }
}

/// When a triggered ability fires.
///
/// ```
/// use rust_mtg::triggers::{EventKind, TriggerCondition, TriggerPredicate};
///
/// // "Whenever another creature dies, while this is on the battlefield"
/// let condition = TriggerCondition::on(EventKind::CreatureDied)
///     .with(TriggerPredicate::SubjectIsNotSource)
///     .with(TriggerPredicate::SourceOnBattlefield);
///
/// assert!(matches!(condition.predicate, TriggerPredicate::All(ref p) if p.len() == 2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerCondition {
    pub event: EventKind,
    pub predicate: TriggerPredicate,
}

impl TriggerCondition {
    /// Fire on every event of one kind.
    #[must_use]
    pub fn on(event: EventKind) -> Self {
        Self {
            event,
            predicate: TriggerPredicate::Always,
        }
    }

    /// Narrow the condition with another predicate (builder pattern).
    #[must_use]
    pub fn with(mut self, predicate: TriggerPredicate) -> Self {
        self.predicate = match self.predicate {
            TriggerPredicate::Always => predicate,
            current => current.and(predicate),
        };
        self
    }

    /// Check the condition.
    #[must_use]
    pub fn evaluate(&self, ctx: &ConditionContext<'_>) -> bool {
        ctx.event.kind() == self.event && self.predicate.evaluate(ctx)
    }
}
