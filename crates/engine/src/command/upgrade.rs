use serde_json::{Map, Value, json};

use super::CURRENT_COMMAND_VERSION;
use crate::error::{CommandError, Result};

/// Rewrites a command payload of any known version into the current shape.
///
/// * v1 to v2: a single `modifier` becomes `modifiers`, and decorated-symbol
///   marks rename `symbolColor` to `hatStyle`.
/// * v2 to v3: `ordinalRange` modifiers become an `ordinalScope`, or a
///   `range` of two when anchor and active differ.
pub fn upgrade_command(mut command: Value) -> Result<Value> {
	let version = command
		.get("version")
		.and_then(Value::as_u64)
		.ok_or_else(|| CommandError::InvalidCommand("missing command version".into()))?;
	let version = u32::try_from(version).map_err(|_| CommandError::UnsupportedCommandVersion(u32::MAX))?;
	if version == 0 || version > CURRENT_COMMAND_VERSION {
		return Err(CommandError::UnsupportedCommandVersion(version));
	}
	if version < CURRENT_COMMAND_VERSION {
		tracing::debug!(version, "Upgrading command");
	}

	if version < 2 {
		for_each_primitive(&mut command, &mut upgrade_primitive_v1);
	}
	if version < 3 {
		for_each_primitive(&mut command, &mut upgrade_primitive_v2);
	}
	if let Some(object) = command.as_object_mut() {
		object.insert("version".into(), json!(CURRENT_COMMAND_VERSION));
	}
	Ok(command)
}

fn for_each_primitive(command: &mut Value, f: &mut dyn FnMut(&mut Map<String, Value>)) {
	if let Some(targets) = command.get_mut("targets").and_then(Value::as_array_mut) {
		for target in targets {
			visit_target(target, f);
		}
	}
}

fn visit_target(target: &mut Value, f: &mut dyn FnMut(&mut Map<String, Value>)) {
	let Some(object) = target.as_object_mut() else {
		return;
	};
	match object.get("type").and_then(Value::as_str) {
		Some("list") => {
			if let Some(elements) = object.get_mut("elements").and_then(Value::as_array_mut) {
				for element in elements {
					visit_target(element, f);
				}
			}
		}
		Some("range") => {
			for end in ["anchor", "active"] {
				if let Some(inner) = object.get_mut(end) {
					visit_target(inner, f);
				}
			}
		}
		_ => f(object),
	}
}

fn upgrade_primitive_v1(target: &mut Map<String, Value>) {
	if let Some(modifier) = target.remove("modifier") {
		target.insert("modifiers".into(), json!([modifier]));
	}
	if let Some(mark) = target.get_mut("mark") {
		rename_symbol_color(mark);
	}
}

fn rename_symbol_color(mark: &mut Value) {
	let Some(object) = mark.as_object_mut() else {
		return;
	};
	if let Some(color) = object.remove("symbolColor") {
		object.insert("hatStyle".into(), color);
	}
	for end in ["anchor", "active"] {
		if let Some(inner) = object.get_mut(end) {
			rename_symbol_color(inner);
		}
	}
}

fn upgrade_primitive_v2(target: &mut Map<String, Value>) {
	let Some(modifiers) = target.get_mut("modifiers").and_then(Value::as_array_mut) else {
		return;
	};
	for modifier in modifiers {
		if modifier.get("type").and_then(Value::as_str) == Some("ordinalRange") {
			*modifier = ordinal_range(modifier);
		}
	}
}

fn ordinal_range(old: &Value) -> Value {
	let scope_type = old.get("scopeType").cloned().unwrap_or(Value::Null);
	let anchor = old.get("anchor").cloned().unwrap_or(Value::Null);
	let active = old.get("active").cloned().unwrap_or(Value::Null);
	let ordinal = |start: Value| json!({"type": "ordinalScope", "scopeType": scope_type, "start": start, "length": 1});
	if anchor == active {
		return ordinal(anchor);
	}
	json!({
		"type": "range",
		"anchor": ordinal(anchor),
		"active": ordinal(active),
		"excludeAnchor": old.get("excludeAnchor").cloned().unwrap_or(json!(false)),
		"excludeActive": old.get("excludeActive").cloned().unwrap_or(json!(false)),
	})
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::command::{Command, TargetDescriptor};
	use crate::marks::Mark;
	use crate::scopes::ScopeType;
	use crate::stages::Modifier;

	#[test]
	fn test_v1_single_modifier_and_symbol_color() {
		let v1 = json!({
			"version": 1,
			"action": {"name": "setSelection"},
			"targets": [{
				"type": "primitive",
				"mark": {"type": "decoratedSymbol", "symbolColor": "blue", "character": "a"},
				"modifier": {"type": "containingScope", "scopeType": {"type": "token"}}
			}]
		});
		let command: Command = serde_json::from_value(upgrade_command(v1).unwrap()).unwrap();
		assert_eq!(command.version, CURRENT_COMMAND_VERSION);
		let TargetDescriptor::Primitive { mark, modifiers } = &command.targets[0] else {
			panic!("expected a primitive target");
		};
		assert_eq!(
			mark,
			&Mark::DecoratedSymbol {
				hat_style: "blue".into(),
				character: "a".into(),
			}
		);
		assert_eq!(modifiers.len(), 1);
	}

	#[test]
	fn test_v2_ordinal_range() {
		let v2 = json!({
			"version": 2,
			"action": {"name": "remove"},
			"targets": [{"type": "list", "elements": [{
				"type": "primitive",
				"mark": {"type": "cursor"},
				"modifiers": [
					{"type": "ordinalRange", "scopeType": {"type": "token"}, "anchor": 0, "active": 0},
					{"type": "ordinalRange", "scopeType": {"type": "line"}, "anchor": 1, "active": 3, "excludeActive": true}
				]
			}]}]
		});
		let command: Command = serde_json::from_value(upgrade_command(v2).unwrap()).unwrap();
		let TargetDescriptor::List { elements } = &command.targets[0] else {
			panic!("expected a list target");
		};
		let TargetDescriptor::Primitive { modifiers, .. } = &elements[0] else {
			panic!("expected a primitive target");
		};
		assert_eq!(
			modifiers[0],
			Modifier::OrdinalScope {
				scope_type: ScopeType::simple("token"),
				start: 0,
				length: 1,
				is_every: false,
			}
		);
		assert!(matches!(
			&modifiers[1],
			Modifier::Range {
				exclude_anchor: false,
				exclude_active: true,
				..
			}
		));
	}

	#[test]
	fn test_unknown_versions_are_rejected() {
		assert_eq!(
			upgrade_command(json!({"version": 9, "targets": []})),
			Err(CommandError::UnsupportedCommandVersion(9))
		);
		assert!(matches!(
			upgrade_command(json!({"targets": []})),
			Err(CommandError::InvalidCommand(_))
		));
	}
}
