//! Action-key dispatch: which settlement actions are graph references.
//!
//! # Overview
//!
//! Every settlement record carries an `action` mapping from an action key to
//! a value. The key vocabulary is open-ended and undocumented; this module
//! encodes it as [`ACTION_TABLE`], a static list of `(matcher, class)` rules.
//!
//! ## Classification order
//!
//! 1. Exact-match rules, in table order.
//! 2. Prefix rules, in table order.
//! 3. Anything else is an [`ActionError::Unrecognized`].
//!
//! ## Classes
//!
//! - [`ActionClass::Reference`]: the value names one node (or a list of
//!   nodes) of a fixed kind.
//! - [`ActionClass::Container`]: the value is a nested mapping of
//!   conditional sub-actions, resolved recursively.
//! - [`ActionClass::NoChild`]: a game-mechanical side effect with no
//!   narrative-graph significance.
//!
//! The vocabulary is closed: a new key must be added to the table before
//! extraction will accept it. [`Strictness::Lenient`] relaxes this for
//! interactive exploration only.

use serde_json::Value;
use tracing::warn;

use crate::error::ActionError;
use crate::kind::NodeKind;
use crate::loader::json_type_name;
use crate::node_id::NodeId;

/// Value of a reference key that means "a predefined global event".
pub const GLOBAL_EVENT_SENTINEL: &str = "1";

/// Literal ids whose reference kind is tagged wrongly in the source data.
///
/// `(kind the key implies, id, kind the id really is)`. Applied to scalar
/// numeric reference values only: a string id or a list element keeps the
/// kind its key implies.
pub const KIND_OVERRIDES: &[(NodeKind, u64, NodeKind)] = &[
    (NodeKind::Event, 5_000_515, NodeKind::Rite),
    (NodeKind::Rite, 5_320_511, NodeKind::Event),
];

/// How an action key is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Matcher {
    #[must_use]
    pub fn matches(self, key: &str) -> bool {
        match self {
            Self::Exact(exact) => key == exact,
            Self::Prefix(prefix) => key.starts_with(prefix),
        }
    }

    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// Side-effect families that never produce children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Option,
    Counter,
    Prompt,
    CardGrant,
    EndOfFlow,
    Achievement,
    Cleanup,
    Delay,
    Bookkeeping,
    Currency,
    UiHint,
    Cosmetic,
    /// Legacy `s1*`/`s2*` keys; they appear to edit character attributes.
    Legacy,
}

/// What an action key means for the reference graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    Reference(NodeKind),
    Container,
    NoChild(Effect),
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRule {
    pub matcher: Matcher,
    pub class: ActionClass,
}

const fn exact(key: &'static str, class: ActionClass) -> ActionRule {
    ActionRule {
        matcher: Matcher::Exact(key),
        class,
    }
}

const fn prefix(key: &'static str, class: ActionClass) -> ActionRule {
    ActionRule {
        matcher: Matcher::Prefix(key),
        class,
    }
}

const fn none(effect: Effect) -> ActionClass {
    ActionClass::NoChild(effect)
}

/// The action vocabulary, in priority order within each matcher family.
pub static ACTION_TABLE: &[ActionRule] = &[
    // references
    exact("event_on", ActionClass::Reference(NodeKind::Event)),
    exact("event_off", ActionClass::Reference(NodeKind::Event)),
    exact("event", ActionClass::Reference(NodeKind::Event)),
    exact("rite", ActionClass::Reference(NodeKind::Rite)),
    // conditional containers
    exact("success", ActionClass::Container),
    exact("failed", ActionClass::Container),
    exact("choose", ActionClass::Container),
    exact("all", ActionClass::Container),
    prefix("case:", ActionClass::Container),
    // side effects
    exact("option", none(Effect::Option)),
    prefix("global_counter", none(Effect::Counter)),
    prefix("counter", none(Effect::Counter)),
    exact("no_prompt", none(Effect::Prompt)),
    exact("prompt", none(Effect::Prompt)),
    prefix("loot", none(Effect::CardGrant)),
    exact("card", none(Effect::CardGrant)),
    exact("over", none(Effect::EndOfFlow)),
    exact("steam_achievement", none(Effect::Achievement)),
    prefix("clean.", none(Effect::Cleanup)),
    exact("delay_off", none(Effect::Delay)),
    exact("delay", none(Effect::Delay)),
    prefix("table.", none(Effect::Bookkeeping)),
    prefix("total.", none(Effect::Bookkeeping)),
    prefix("sudan_pool.", none(Effect::Bookkeeping)),
    prefix("focus.", none(Effect::Bookkeeping)),
    exact("enable_auto_gen_sudan_card", none(Effect::Bookkeeping)),
    exact("coin", none(Effect::Currency)),
    exact("金币", none(Effect::Currency)),
    prefix("rite_pop", none(Effect::UiHint)),
    prefix("hand_pop", none(Effect::UiHint)),
    prefix("think_pop", none(Effect::UiHint)),
    exact("sleep", none(Effect::Cosmetic)),
    exact("no_show", none(Effect::Cosmetic)),
    exact("close_box", none(Effect::Cosmetic)),
    exact("hand_card_refresh", none(Effect::Cosmetic)),
    exact("magic_sudan", none(Effect::Cosmetic)),
    exact("debug", none(Effect::Cosmetic)),
    exact("begin_guide", none(Effect::Cosmetic)),
    exact("slide", none(Effect::Cosmetic)),
    exact("difficulty", none(Effect::Cosmetic)),
    exact("change_name", none(Effect::Cosmetic)),
    exact("confirm", none(Effect::Cosmetic)),
    prefix("s1", none(Effect::Legacy)),
    prefix("s2", none(Effect::Legacy)),
];

/// Classify an action key against [`ACTION_TABLE`].
///
/// Returns `None` for keys outside the vocabulary.
#[must_use]
pub fn classify(key: &str) -> Option<ActionClass> {
    let exact_hit = ACTION_TABLE
        .iter()
        .find(|rule| rule.matcher.is_exact() && rule.matcher.matches(key));
    exact_hit
        .or_else(|| {
            ACTION_TABLE
                .iter()
                .find(|rule| !rule.matcher.is_exact() && rule.matcher.matches(key))
        })
        .map(|rule| rule.class)
}

/// What to do with keys that fail to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Fail the resolution. Used by batch extraction.
    #[default]
    Strict,
    /// Log a warning and yield no children. Used by the interactive tracer.
    Lenient,
}

/// Turns `(key, value)` action entries into candidate child references.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionResolver {
    strictness: Strictness,
}

impl ActionResolver {
    #[must_use]
    pub const fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    #[must_use]
    pub const fn strict() -> Self {
        Self::new(Strictness::Strict)
    }

    #[must_use]
    pub const fn lenient() -> Self {
        Self::new(Strictness::Lenient)
    }

    #[must_use]
    pub const fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Resolve one action entry into candidate children.
    ///
    /// The result may contain duplicates; callers deduplicate.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ActionError::Unrecognized`] for keys outside
    /// the vocabulary and [`ActionError::Malformed`] for values of the wrong
    /// shape. Lenient mode reports both as warnings instead.
    pub fn resolve(&self, key: &str, value: &Value) -> Result<Vec<NodeId>, ActionError> {
        match self.resolve_strict(key, value) {
            Err(err) if self.strictness == Strictness::Lenient => {
                warn!(key = err.key(), error = %err, "skipping action entry");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn resolve_strict(&self, key: &str, value: &Value) -> Result<Vec<NodeId>, ActionError> {
        match classify(key) {
            Some(ActionClass::Reference(kind)) => resolve_reference(kind, key, value),
            Some(ActionClass::Container) => self.resolve_container(key, value),
            Some(ActionClass::NoChild(_)) => Ok(Vec::new()),
            None => Err(ActionError::Unrecognized {
                key: key.to_string(),
            }),
        }
    }

    fn resolve_container(&self, key: &str, value: &Value) -> Result<Vec<NodeId>, ActionError> {
        let Value::Object(branches) = value else {
            return Err(ActionError::Malformed {
                key: key.to_string(),
                reason: format!("expected a mapping, found {}", json_type_name(value)),
            });
        };

        let mut children = Vec::new();
        for (sub_key, sub_value) in branches {
            children.extend(self.resolve(sub_key, sub_value)?);
        }
        Ok(children)
    }
}

fn resolve_reference(kind: NodeKind, key: &str, value: &Value) -> Result<Vec<NodeId>, ActionError> {
    if scalar_id(value).as_deref() == Some(GLOBAL_EVENT_SENTINEL) {
        return Ok(Vec::new());
    }

    if let Value::Array(items) = value {
        return items
            .iter()
            .map(|item| {
                scalar_id(item)
                    .map(|id| NodeId::new(kind, id))
                    .ok_or_else(|| malformed_id(key, item))
            })
            .collect();
    }

    let id = scalar_id(value).ok_or_else(|| malformed_id(key, value))?;
    Ok(vec![NodeId::new(overridden_kind(kind, value), id)])
}

fn overridden_kind(kind: NodeKind, value: &Value) -> NodeKind {
    let Some(number) = value.as_u64() else {
        return kind;
    };
    KIND_OVERRIDES
        .iter()
        .find(|(from, literal, _)| *from == kind && *literal == number)
        .map_or(kind, |(_, _, to)| *to)
}

/// Render a scalar reference value as a document id.
fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn malformed_id(key: &str, value: &Value) -> ActionError {
    ActionError::Malformed {
        key: key.to_string(),
        reason: format!("expected an id or list of ids, found {}", json_type_name(value)),
    }
}
