//! ABI lookups and the JSON projection of decoded values.
//!
//! Encoding and decoding are alloy's `json_abi` + `dyn_abi`. What lives here
//! is the glue the contract handles need on top:
//!
//! - overload resolution by name and argument count
//! - the JSON shape handed to facades: integers as decimal strings,
//!   addresses and byte strings as lowercase hex, named tuples as objects
//! - the one-line rendering of argument values used in failure messages
//!
//! | Outputs | Projection |
//! |---------|------------|
//! | none | `null` |
//! | one | the value itself |
//! | several | object keyed by output name, or by position when unnamed |

use alloy::dyn_abi::{DynSolValue, EventExt, FunctionExt, JsonAbiExt, Specifier};
use alloy::json_abi::{Event, Function, JsonAbi, Param};
use alloy::primitives::ruint::UintTryFrom;
use alloy::primitives::{keccak256, B256, U256};
use serde_json::{Map, Value};

use crate::domain::error::AbiError;

/// Parse a standard JSON ABI document.
pub fn parse_abi(json: &str) -> Result<JsonAbi, AbiError> {
    serde_json::from_str(json).map_err(|e| AbiError::Parse(e.to_string()))
}

/// Name-and-arity lookups over a parsed ABI.
pub trait AbiLookup {
    /// The overload of `name` taking exactly `arity` arguments.
    fn function_with_arity(&self, name: &str, arity: usize) -> Result<&Function, AbiError>;

    fn event_named(&self, name: &str) -> Result<&Event, AbiError>;

    /// The function whose 4-byte selector prefixes `calldata`.
    fn function_for_calldata(&self, calldata: &[u8]) -> Option<&Function>;
}

impl AbiLookup for JsonAbi {
    fn function_with_arity(&self, name: &str, arity: usize) -> Result<&Function, AbiError> {
        self.function(name)
            .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == arity))
            .ok_or_else(|| AbiError::FunctionNotFound {
                name: name.to_string(),
                arity,
            })
    }

    fn event_named(&self, name: &str) -> Result<&Event, AbiError> {
        self.event(name)
            .and_then(|events| events.first())
            .ok_or_else(|| AbiError::EventNotFound(name.to_string()))
    }

    fn function_for_calldata(&self, calldata: &[u8]) -> Option<&Function> {
        let selector = calldata.get(..4)?;
        self.functions().find(|f| f.selector().as_slice() == selector)
    }
}

// =============================================================================
// ARGUMENT VALUES
// =============================================================================

/// A `uint256` argument.
pub fn uint256<T>(value: T) -> DynSolValue
where
    U256: UintTryFrom<T>,
{
    DynSolValue::Uint(U256::from(value), 256)
}

/// A `uint8` argument.
pub fn uint8(value: u8) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 8)
}

pub fn string(value: impl Into<String>) -> DynSolValue {
    DynSolValue::String(value.into())
}

// =============================================================================
// ENCODING
// =============================================================================

/// Selector plus encoded arguments.
pub fn encode_call(function: &Function, args: &[DynSolValue]) -> Result<Vec<u8>, AbiError> {
    function
        .abi_encode_input(args)
        .map_err(|e| AbiError::InvalidArguments {
            name: function.name.clone(),
            reason: e.to_string(),
        })
}

/// Deployment payload: `bytecode` followed by the encoded constructor
/// arguments.
pub fn encode_deployment(
    abi: &JsonAbi,
    bytecode: &[u8],
    args: &[DynSolValue],
) -> Result<Vec<u8>, AbiError> {
    let mut data = bytecode.to_vec();
    match &abi.constructor {
        Some(constructor) => {
            let encoded =
                constructor
                    .abi_encode_input(args)
                    .map_err(|e| AbiError::InvalidArguments {
                        name: "constructor".to_string(),
                        reason: e.to_string(),
                    })?;
            data.extend_from_slice(&encoded);
        }
        None if args.is_empty() => {}
        None => {
            return Err(AbiError::InvalidArguments {
                name: "constructor".to_string(),
                reason: format!("expected 0 argument(s), got {}", args.len()),
            })
        }
    }
    Ok(data)
}

/// Topics and data of a log emitting `event` with `values`, in input order.
///
/// Dynamic indexed values are hashed, as the EVM does.
pub fn encode_event(event: &Event, values: &[DynSolValue]) -> Result<(Vec<B256>, Vec<u8>), AbiError> {
    if values.len() != event.inputs.len() {
        return Err(AbiError::InvalidArguments {
            name: event.name.clone(),
            reason: format!(
                "expected {} argument(s), got {}",
                event.inputs.len(),
                values.len()
            ),
        });
    }
    let mut topics = Vec::new();
    if !event.anonymous {
        topics.push(event.selector());
    }
    let mut body = Vec::new();
    for (param, value) in event.inputs.iter().zip(values) {
        let kind = param
            .resolve()
            .map_err(|e| AbiError::UnsupportedType(e.to_string()))?;
        if !kind.matches(value) {
            return Err(AbiError::InvalidArguments {
                name: event.name.clone(),
                reason: format!("{} is not a {}", render(value), param.ty),
            });
        }
        if !param.indexed {
            body.push(value.clone());
        } else if value.is_dynamic() {
            topics.push(keccak256(value.abi_encode_packed()));
        } else {
            topics.push(B256::from_slice(&value.abi_encode()[..32]));
        }
    }
    Ok((topics, DynSolValue::Tuple(body).abi_encode_params()))
}

// =============================================================================
// DECODING
// =============================================================================

/// Arguments of `calldata` addressed to `function`, selector included.
pub fn decode_call(function: &Function, calldata: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    let args = calldata
        .get(4..)
        .ok_or_else(|| AbiError::InvalidData("calldata shorter than a selector".into()))?;
    function
        .abi_decode_input(args, true)
        .map_err(|e| AbiError::InvalidData(e.to_string()))
}

/// Decoded return values. Empty data for a function with outputs means the
/// call never reached a matching contract.
pub fn decode_output(function: &Function, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    if data.is_empty() && !function.outputs.is_empty() {
        return Err(AbiError::InvalidReturnValues);
    }
    function
        .abi_decode_output(data, true)
        .map_err(|e| AbiError::InvalidData(e.to_string()))
}

/// JSON projection of a call result.
pub fn decode_output_json(function: &Function, data: &[u8]) -> Result<Value, AbiError> {
    let values = decode_output(function, data)?;
    Ok(match values.as_slice() {
        [] => Value::Null,
        [single] => to_json(single, &function.outputs[0].components),
        _ => Value::Object(named(&function.outputs, &values)),
    })
}

/// Event arguments keyed by input name.
pub fn decode_event(
    event: &Event,
    topics: &[B256],
    data: &[u8],
) -> Result<Map<String, Value>, AbiError> {
    let decoded = event
        .decode_log_parts(topics.iter().copied(), data, true)
        .map_err(|e| AbiError::InvalidData(format!("{}: {}", event.name, e)))?;
    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();

    let mut values = Map::new();
    for (position, input) in event.inputs.iter().enumerate() {
        let value = if input.indexed {
            indexed.next()
        } else {
            body.next()
        }
        .ok_or_else(|| {
            AbiError::InvalidData(format!("{} is missing input {}", event.name, position))
        })?;
        values.insert(key(&input.name, position), to_json(&value, &input.components));
    }
    Ok(values)
}

// =============================================================================
// PROJECTION
// =============================================================================

/// JSON shape of one decoded value. `components` names the fields of a
/// tuple, or of the tuples inside an array.
pub fn to_json(value: &DynSolValue, components: &[Param]) -> Value {
    match value {
        DynSolValue::Bool(flag) => Value::Bool(*flag),
        DynSolValue::Uint(number, _) => Value::String(number.to_string()),
        DynSolValue::Int(number, _) => Value::String(number.to_string()),
        DynSolValue::Address(address) => Value::String(lower_hex(address.as_slice())),
        DynSolValue::String(text) => Value::String(text.clone()),
        DynSolValue::Bytes(bytes) => Value::String(lower_hex(bytes)),
        DynSolValue::FixedBytes(word, size) => Value::String(lower_hex(&word[..*size])),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            Value::Array(items.iter().map(|item| to_json(item, components)).collect())
        }
        DynSolValue::Tuple(items) if items.len() == components.len() => {
            Value::Object(named(components, items))
        }
        DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(|item| to_json(item, &[])).collect())
        }
        other => Value::String(render(other)),
    }
}

fn named(params: &[Param], values: &[DynSolValue]) -> Map<String, Value> {
    params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(position, (param, value))| {
            (key(&param.name, position), to_json(value, &param.components))
        })
        .collect()
}

fn key(name: &str, position: usize) -> String {
    if name.is_empty() {
        position.to_string()
    } else {
        name.to_string()
    }
}

fn lower_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// One-line rendering used in call signatures: `3`, `"text"`, `0xab..`,
/// `[1, 2]`, `(1, "a")`.
pub fn render(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(flag) => flag.to_string(),
        DynSolValue::Uint(number, _) => number.to_string(),
        DynSolValue::Int(number, _) => number.to_string(),
        DynSolValue::Address(address) => lower_hex(address.as_slice()),
        DynSolValue::String(text) => format!("{:?}", text),
        DynSolValue::Bytes(bytes) => lower_hex(bytes),
        DynSolValue::FixedBytes(word, size) => lower_hex(&word[..*size]),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            format!("[{}]", join(items))
        }
        DynSolValue::Tuple(items) => format!("({})", join(items)),
        other => format!("{:?}", other),
    }
}

fn join(items: &[DynSolValue]) -> String {
    items.iter().map(render).collect::<Vec<_>>().join(", ")
}
