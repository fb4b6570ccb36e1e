//! Macro steps and the ordered list they live in

use std::fmt;
use std::ops::Deref;
use std::time::Duration;

/// Opaque step identifier, GUID-like, stable across edits and saves
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionId(String);

impl ActionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps an existing id. Empty strings are not ids.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a step does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionKind {
    /// Left button click
    PrimaryClick,
    /// Right button click
    SecondaryClick,
    /// Middle button click
    TertiaryClick,
    /// Wait only, coordinates ignored
    #[default]
    Pause,
}

/// Physical button behind a click kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::PrimaryClick,
        ActionKind::SecondaryClick,
        ActionKind::TertiaryClick,
        ActionKind::Pause,
    ];

    /// Tag used in `.emacro` files
    pub fn tag(self) -> &'static str {
        match self {
            ActionKind::PrimaryClick => "leftClick",
            ActionKind::SecondaryClick => "rightClick",
            ActionKind::TertiaryClick => "otherClick",
            ActionKind::Pause => "wait",
        }
    }

    /// Unknown tags become `Pause` so one bad record never rejects a file.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "leftClick" => ActionKind::PrimaryClick,
            "rightClick" => ActionKind::SecondaryClick,
            "otherClick" => ActionKind::TertiaryClick,
            _ => ActionKind::Pause,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::PrimaryClick => "Left",
            ActionKind::SecondaryClick => "Right",
            ActionKind::TertiaryClick => "Other",
            ActionKind::Pause => "Wait",
        }
    }

    pub fn button(self) -> Option<MouseButton> {
        match self {
            ActionKind::PrimaryClick => Some(MouseButton::Left),
            ActionKind::SecondaryClick => Some(MouseButton::Right),
            ActionKind::TertiaryClick => Some(MouseButton::Middle),
            ActionKind::Pause => None,
        }
    }

    pub fn is_pause(self) -> bool {
        self == ActionKind::Pause
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One step of a macro
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: ActionId,
    pub kind: ActionKind,
    pub x: f64,
    pub y: f64,
    /// Seconds to wait before the click, or the whole step for a pause
    pub delay: f64,
}

impl Action {
    /// Builds a step with a fresh id. Negative or non-finite delays clamp to zero.
    pub fn new(kind: ActionKind, x: f64, y: f64, delay: f64) -> Self {
        Self::with_id(ActionId::generate(), kind, x, y, delay)
    }

    pub fn with_id(id: ActionId, kind: ActionKind, x: f64, y: f64, delay: f64) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            delay: clamp_delay(delay),
        }
    }

    pub fn click(kind: ActionKind, x: f64, y: f64, delay: f64) -> Self {
        Self::new(kind, x, y, delay)
    }

    pub fn pause(delay: f64) -> Self {
        Self::new(ActionKind::Pause, 0.0, 0.0, delay)
    }

    /// Sleep before the step fires, `None` when there is nothing to wait for.
    /// Delays too long for `Duration` saturate to `Duration::MAX`.
    pub fn wait(&self) -> Option<Duration> {
        if self.delay > 0.0 {
            Some(Duration::try_from_secs_f64(self.delay).unwrap_or(Duration::MAX))
        } else {
            None
        }
    }

    pub fn kind_label(&self) -> &'static str {
        self.kind.label()
    }

    /// `x: 10  y: 20`, or `-` for a pause
    pub fn location_label(&self) -> String {
        if self.kind.is_pause() {
            return "-".to_string();
        }
        format!("x: {}  y: {}", self.x as i64, self.y as i64)
    }

    pub fn delay_label(&self) -> String {
        format_delay(self.delay)
    }
}

pub fn format_delay(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

pub(crate) fn clamp_delay(delay: f64) -> f64 {
    if delay.is_finite() && delay > 0.0 {
        delay
    } else {
        0.0
    }
}

/// Ordered steps of the macro being edited.
///
/// Playback order is list order. Only ids have to be unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionList {
    actions: Vec<Action>,
}

impl ActionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, action: Action) -> usize {
        self.actions.push(action);
        self.actions.len() - 1
    }

    /// Replaces the step's fields in place, keeping its id.
    pub fn replace_at(&mut self, index: usize, kind: ActionKind, x: f64, y: f64, delay: f64) -> bool {
        match self.actions.get_mut(index) {
            Some(action) => {
                action.kind = kind;
                action.x = x;
                action.y = y;
                action.delay = clamp_delay(delay);
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Action> {
        if index < self.actions.len() {
            Some(self.actions.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Immutable copy handed to a playback session
    pub fn snapshot(&self) -> Vec<Action> {
        self.actions.clone()
    }

    /// Sum of all step delays in seconds
    pub fn total_delay(&self) -> f64 {
        self.actions.iter().map(|a| a.delay).sum()
    }
}

impl Deref for ActionList {
    type Target = [Action];

    fn deref(&self) -> &Self::Target {
        &self.actions
    }
}

impl From<Vec<Action>> for ActionList {
    fn from(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

impl FromIterator<Action> for ActionList {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ActionList {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_map_both_ways() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_tag(kind.tag()), kind);
        }
    }

    #[test]
    fn unknown_tag_is_pause() {
        assert_eq!(ActionKind::from_tag("doubleClick"), ActionKind::Pause);
        assert_eq!(ActionKind::from_tag(""), ActionKind::Pause);
        assert_eq!(ActionKind::from_tag("LeftClick"), ActionKind::Pause);
    }

    #[test]
    fn fresh_ids_differ() {
        let a = Action::pause(1.0);
        let b = Action::pause(1.0);
        assert_ne!(a.id, b.id);
        assert!(ActionId::parse("  ").is_none());
    }

    #[test]
    fn labels() {
        let click = Action::click(ActionKind::SecondaryClick, 10.7, 20.2, 1.5);
        assert_eq!(click.kind_label(), "Right");
        assert_eq!(click.location_label(), "x: 10  y: 20");
        assert_eq!(click.delay_label(), "1.50s");

        let pause = Action::pause(3.0);
        assert_eq!(pause.location_label(), "-");
        assert_eq!(pause.delay_label(), "3.00s");
    }

    #[test]
    fn delay_is_never_negative() {
        assert_eq!(Action::pause(-2.0).delay, 0.0);
        assert_eq!(Action::pause(f64::NAN).delay, 0.0);
        assert!(Action::pause(0.0).wait().is_none());
        assert_eq!(Action::pause(0.25).wait(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn huge_delay_saturates() {
        let click = Action::click(ActionKind::PrimaryClick, 1.0, 2.0, 1e20);
        assert_eq!(click.wait(), Some(Duration::MAX));
        assert_eq!(Action::pause(f64::MAX).wait(), Some(Duration::MAX));
    }

    #[test]
    fn replace_keeps_id() {
        let mut list = ActionList::new();
        list.append(Action::pause(1.0));
        let id = list[0].id.clone();

        assert!(list.replace_at(0, ActionKind::PrimaryClick, 5.0, 6.0, 0.5));
        assert_eq!(list[0].id, id);
        assert_eq!(list[0].kind, ActionKind::PrimaryClick);
        assert!(!list.replace_at(3, ActionKind::Pause, 0.0, 0.0, 0.0));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut list = ActionList::new();
        list.append(Action::pause(1.0));
        let snapshot = list.snapshot();
        list.clear();
        assert_eq!(snapshot.len(), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_out_of_range() {
        let mut list: ActionList = vec![Action::pause(1.0), Action::pause(2.0)].into();
        assert!(list.remove_at(5).is_none());
        let removed = list.remove_at(0).unwrap();
        assert_eq!(removed.delay, 1.0);
        assert_eq!(list.len(), 1);
        assert_eq!(list.total_delay(), 2.0);
    }
}
