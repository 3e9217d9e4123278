//! Built-in JSON element handlers.
//!
//! Thin async wrappers around the `fanout-utils` helpers, reading their
//! parameters from the run's extra args.

use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time::sleep;

use fanout_types::{ExtraArgs, HandlerError, UnitOutcome};
use fanout_utils::{
    change_case, format_template, keep_keys, remove_keys, rename_keys, sub_value, trim_chars,
};

use crate::handler::handler_fn;
use crate::registry::{HandlerRegistry, RegistryError};

/// Names of every built-in handler, sorted.
pub const NAMES: [&str; 10] = [
    "delay",
    "fail_on",
    "format",
    "keep_keys",
    "lower",
    "remove_keys",
    "rename_keys",
    "sub_value",
    "trim",
    "upper",
];

pub fn register_builtins(registry: &mut HandlerRegistry) -> Result<(), RegistryError> {
    registry.register(Box::new(handler_fn("upper", upper)))?;
    registry.register(Box::new(handler_fn("lower", lower)))?;
    registry.register(Box::new(handler_fn("trim", trim)))?;
    registry.register(Box::new(handler_fn("sub_value", sub_value_of)))?;
    registry.register(Box::new(handler_fn("format", format)))?;
    registry.register(Box::new(handler_fn("rename_keys", rename)))?;
    registry.register(Box::new(handler_fn("remove_keys", remove)))?;
    registry.register(Box::new(handler_fn("keep_keys", keep)))?;
    registry.register(Box::new(handler_fn("delay", delay)))?;
    registry.register(Box::new(handler_fn("fail_on", fail_on)))?;
    Ok(())
}

async fn upper(item: Value, _extra: ExtraArgs) -> UnitOutcome<Value> {
    Ok(change_case(item, true))
}

async fn lower(item: Value, _extra: ExtraArgs) -> UnitOutcome<Value> {
    Ok(change_case(item, false))
}

/// `[charlist?]`
async fn trim(item: Value, extra: ExtraArgs) -> UnitOutcome<Value> {
    let Value::String(text) = &item else {
        return Err(HandlerError::unsupported("string", &item));
    };
    let charlist = match extra.get(0) {
        None | Some(Value::Null) => None,
        Some(Value::String(set)) => Some(set.as_str()),
        Some(other) => {
            return Err(HandlerError::bad_args(format!(
                "charlist must be a string, got {other}"
            )));
        }
    };
    Ok(Value::String(trim_chars(text, charlist).to_string()))
}

/// `[separator, index]`
async fn sub_value_of(item: Value, extra: ExtraArgs) -> UnitOutcome<Value> {
    let Value::String(text) = &item else {
        return Err(HandlerError::unsupported("string", &item));
    };
    let separator = extra
        .str_at(0)
        .ok_or_else(|| HandlerError::bad_args("expected a separator string"))?;
    let index = extra
        .get(1)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| HandlerError::bad_args("expected a non-negative segment index"))?;
    Ok(sub_value(text, separator, index).map_or(Value::Null, |s| Value::String(s.to_string())))
}

/// Positional values substituted into `{n}` placeholders.
async fn format(item: Value, extra: ExtraArgs) -> UnitOutcome<Value> {
    match &item {
        Value::String(template) => Ok(Value::String(format_template(template, &extra))),
        _ => Err(HandlerError::unsupported("string", &item)),
    }
}

/// `[{old: new}]`; no mapping renames nothing.
async fn rename(item: Value, extra: ExtraArgs) -> UnitOutcome<Value> {
    let obj = object(item)?;
    match extra.get(0) {
        None | Some(Value::Null) => Ok(Value::Object(obj)),
        Some(Value::Object(renames)) => Ok(Value::Object(rename_keys(obj, renames))),
        Some(other) => Err(HandlerError::bad_args(format!(
            "renames must be an object, got {other}"
        ))),
    }
}

/// `[[keys]]`; no list removes nothing.
async fn remove(item: Value, extra: ExtraArgs) -> UnitOutcome<Value> {
    let obj = object(item)?;
    let keys = key_list(&extra)?;
    Ok(Value::Object(remove_keys(obj, &keys)))
}

/// `[[keys]]`; no list keeps nothing.
async fn keep(item: Value, extra: ExtraArgs) -> UnitOutcome<Value> {
    let obj = object(item)?;
    let keys = key_list(&extra)?;
    Ok(Value::Object(keep_keys(obj, &keys)))
}

/// `[millis]`
async fn delay(item: Value, extra: ExtraArgs) -> UnitOutcome<Value> {
    let millis = match extra.get(0) {
        None | Some(Value::Null) => 0,
        Some(value) => value
            .as_u64()
            .ok_or_else(|| HandlerError::bad_args(format!("delay must be whole millis, got {value}")))?,
    };
    sleep(Duration::from_millis(millis)).await;
    Ok(item)
}

/// `[value]`
async fn fail_on(item: Value, extra: ExtraArgs) -> UnitOutcome<Value> {
    let needle = extra
        .get(0)
        .ok_or_else(|| HandlerError::bad_args("expected a value to fail on"))?;
    if item == *needle {
        return Err(HandlerError::failed_with("item matched fail_on value", item));
    }
    Ok(item)
}

fn object(item: Value) -> UnitOutcome<Map<String, Value>> {
    match item {
        Value::Object(obj) => Ok(obj),
        other => Err(HandlerError::unsupported("object", &other)),
    }
}

fn key_list(extra: &ExtraArgs) -> UnitOutcome<Vec<&str>> {
    match extra.get(0) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(keys)) => keys
            .iter()
            .map(|key| {
                key.as_str()
                    .ok_or_else(|| HandlerError::bad_args(format!("key must be a string, got {key}")))
            })
            .collect(),
        Some(other) => Err(HandlerError::bad_args(format!(
            "keys must be an array, got {other}"
        ))),
    }
}
