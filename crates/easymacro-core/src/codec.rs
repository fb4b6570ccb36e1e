//! `.emacro` interchange format
//!
//! A macro file is a bare JSON array of step records:
//!
//! ```json
//! [{"id":"8f1c...","delay":1.0,"x":0.0,"y":0.0,"kind":"wait"}]
//! ```
//!
//! Decoding is tolerant per field. A missing id is synthesized, missing numbers read as 0 and a
//! missing or unknown kind reads as `wait`. Only a document that is not an array of objects is
//! rejected.

use crate::action::{clamp_delay, Action, ActionId, ActionKind, ActionList};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

pub const FILE_EXTENSION: &str = "emacro";

/// Field order follows the on-disk layout
#[derive(Serialize)]
struct Record<'a> {
    id: &'a str,
    delay: f64,
    x: f64,
    y: f64,
    kind: &'static str,
}

impl<'a> From<&'a Action> for Record<'a> {
    fn from(action: &'a Action) -> Self {
        Self {
            id: action.id.as_str(),
            delay: action.delay,
            x: action.x,
            y: action.y,
            kind: action.kind.tag(),
        }
    }
}

/// Serialize steps in order. Ids are always written.
pub fn encode(actions: &[Action]) -> Result<String> {
    let records: Vec<Record<'_>> = actions.iter().map(Record::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

pub fn decode(text: &str) -> Result<ActionList> {
    let doc: Value = serde_json::from_str(text)?;
    let items = match doc {
        Value::Array(items) => items,
        other => {
            return Err(Error::malformed_document(format!(
                "expected an array of steps, found {}",
                value_kind(&other)
            )))
        }
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut actions = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Value::Object(record) = item else {
            return Err(Error::malformed_document(format!(
                "step {} is {}, not an object",
                i + 1,
                value_kind(item)
            )));
        };

        let mut action = decode_record(record);
        if !seen.insert(action.id.clone()) {
            tracing::debug!(id = %action.id, step = i + 1, "duplicate step id, assigning a new one");
            action.id = ActionId::generate();
            seen.insert(action.id.clone());
        }
        actions.push(action);
    }

    Ok(ActionList::from(actions))
}

fn decode_record(record: &Map<String, Value>) -> Action {
    let id = record
        .get("id")
        .and_then(Value::as_str)
        .and_then(ActionId::parse)
        .unwrap_or_else(ActionId::generate);
    let kind = record
        .get("kind")
        .and_then(Value::as_str)
        .map(ActionKind::from_tag)
        .unwrap_or(ActionKind::Pause);

    Action {
        id,
        kind,
        x: number(record, "x"),
        y: number(record, "y"),
        delay: clamp_delay(number(record, "delay")),
    }
}

fn number(record: &Map<String, Value>, field: &str) -> f64 {
    record.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sample() -> ActionList {
        vec![
            Action::pause(1.0),
            Action::click(ActionKind::PrimaryClick, 10.0, 20.0, 0.0),
            Action::click(ActionKind::SecondaryClick, 640.5, 360.25, 2.5),
            Action::click(ActionKind::TertiaryClick, 0.0, 1080.0, 0.1),
        ]
        .into()
    }

    #[test]
    fn round_trip_preserves_list() {
        let list = sample();
        let text = encode(&list).unwrap();
        assert_eq!(decode(&text).unwrap(), list);
    }

    #[test]
    fn round_trip_keeps_pause_coordinates() {
        let list: ActionList =
            vec![Action::with_id(ActionId::generate(), ActionKind::Pause, 3.0, 4.0, 1.0)].into();
        assert_eq!(decode(&encode(&list).unwrap()).unwrap(), list);
    }

    #[test]
    fn encode_writes_all_fields_in_order() {
        let list: ActionList = vec![Action::with_id(
            ActionId::parse("abc").unwrap(),
            ActionKind::PrimaryClick,
            1.0,
            2.0,
            0.5,
        )]
        .into();
        let text = encode(&list).unwrap();
        let compact: String = text.split_whitespace().collect();
        assert_eq!(
            compact,
            r#"[{"id":"abc","delay":0.5,"x":1.0,"y":2.0,"kind":"leftClick"}]"#
        );
    }

    #[test]
    fn missing_id_is_synthesized() {
        let list = decode(r#"[{"kind":"rightClick","x":5,"y":5,"delay":2}]"#).unwrap();
        assert_eq!(list.len(), 1);
        let action = &list[0];
        assert!(!action.id.as_str().is_empty());
        assert_eq!(action.kind, ActionKind::SecondaryClick);
        assert_eq!((action.x, action.y, action.delay), (5.0, 5.0, 2.0));
    }

    #[test]
    fn missing_fields_default() {
        let list = decode(r#"[{}]"#).unwrap();
        let action = &list[0];
        assert_eq!(action.kind, ActionKind::Pause);
        assert_eq!((action.x, action.y, action.delay), (0.0, 0.0, 0.0));
    }

    #[test]
    fn unknown_kind_falls_back_per_entry() {
        let list = decode(
            r#"[{"id":"a","kind":"scroll","delay":1},{"id":"b","kind":"leftClick","x":3,"y":4}]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].kind, ActionKind::Pause);
        assert_eq!(list[1].kind, ActionKind::PrimaryClick);
    }

    #[test]
    fn wrong_typed_fields_default() {
        let list = decode(r#"[{"id":7,"x":"left","delay":-4,"kind":3}]"#).unwrap();
        let action = &list[0];
        assert!(!action.id.as_str().is_empty());
        assert_eq!(action.x, 0.0);
        assert_eq!(action.delay, 0.0);
        assert_eq!(action.kind, ActionKind::Pause);
    }

    #[test]
    fn duplicate_ids_are_replaced() {
        let list = decode(r#"[{"id":"same"},{"id":"same"}]"#).unwrap();
        assert_eq!(list[0].id.as_str(), "same");
        assert_ne!(list[1].id, list[0].id);
    }

    #[test]
    fn empty_array_is_empty_list() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_sequence() {
        for text in [r#"{"steps":[]}"#, "42", "not json", r#"[1, 2]"#, r#"[{"id":"a"}, "b"]"#] {
            let err = decode(text).unwrap_err();
            assert_eq!(err.code, ErrorCode::MalformedDocument, "input: {text}");
        }
    }
}
