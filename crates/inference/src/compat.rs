//! Load-time fix-ups for model artifacts exported by older converters.
//!
//! Older exports serialize depthwise convolutions with a `groups` attribute that
//! current runtimes reject. The rewrite works directly on the protobuf wire
//! format so every field it does not touch is copied byte for byte.

use prost::encoding::{WireType, decode_key, decode_varint, encode_key, encode_varint};
use serde::Deserialize;
use std::borrow::Cow;
use thiserror::Error;

// ONNX field numbers (onnx.proto3)
const MODEL_GRAPH: u32 = 7;
const GRAPH_NODE: u32 = 1;
const NODE_OP_TYPE: u32 = 4;
const NODE_ATTRIBUTE: u32 = 5;
const ATTRIBUTE_NAME: u32 = 1;

#[derive(Error, Debug)]
pub enum CompatError {
    #[error("Malformed model protobuf: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Field {0} is truncated")]
    Truncated(u32),

    #[error("Field {0} uses unsupported group encoding")]
    GroupEncoding(u32),
}

/// Which attribute to drop, and from which operator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LegacyAttributeRule {
    pub op_type: String,
    pub attribute: String,
}

impl Default for LegacyAttributeRule {
    fn default() -> Self {
        Self {
            op_type: "DepthwiseConv2D".to_string(),
            attribute: "groups".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Stripped<'a> {
    pub model: Cow<'a, [u8]>,
    pub removed: usize,
}

/// Remove `rule.attribute` from every top-level graph node whose op type is
/// `rule.op_type`. Returns the input untouched, without copying, when nothing
/// matches.
pub fn strip_legacy_attribute<'a>(
    model: &'a [u8],
    rule: &LegacyAttributeRule,
) -> Result<Stripped<'a>, CompatError> {
    let mut removed = 0;
    let rewritten = rewrite_fields(model, MODEL_GRAPH, |graph| {
        rewrite_fields(graph, GRAPH_NODE, |node| rewrite_node(node, rule, &mut removed))
    })?;

    let model = match rewritten {
        Some(bytes) => Cow::Owned(bytes),
        None => Cow::Borrowed(model),
    };

    Ok(Stripped { model, removed })
}

/// Replace the length-delimited fields numbered `number` with what `rewrite`
/// returns. `None` from `rewrite` keeps the field as is; the output buffer is
/// only allocated once some field changes.
fn rewrite_fields<'a, F>(
    message: &'a [u8],
    number: u32,
    mut rewrite: F,
) -> Result<Option<Vec<u8>>, CompatError>
where
    F: FnMut(&'a [u8]) -> Result<Option<Vec<u8>>, CompatError>,
{
    let mut out: Option<Vec<u8>> = None;

    for field in fields(message)? {
        let replaced = match field.payload {
            Some(body) if field.number == number => rewrite(body)?,
            _ => None,
        };

        match replaced {
            Some(body) => {
                let out = out.get_or_insert_with(|| {
                    let mut buf = Vec::with_capacity(message.len());
                    buf.extend_from_slice(&message[..field.start]);
                    buf
                });
                write_length_delimited(out, number, &body);
            }
            None => {
                if let Some(out) = out.as_mut() {
                    out.extend_from_slice(field.raw);
                }
            }
        }
    }

    Ok(out)
}

fn rewrite_node(
    node: &[u8],
    rule: &LegacyAttributeRule,
    removed: &mut usize,
) -> Result<Option<Vec<u8>>, CompatError> {
    let fields = fields(node)?;

    let op_type = fields
        .iter()
        .find(|f| f.number == NODE_OP_TYPE)
        .and_then(|f| f.payload);
    if op_type != Some(rule.op_type.as_bytes()) {
        return Ok(None);
    }

    let mut out = Vec::with_capacity(node.len());
    let mut dropped = 0;
    for field in fields {
        if let (NODE_ATTRIBUTE, Some(attribute)) = (field.number, field.payload) {
            if attribute_name(attribute)? == Some(rule.attribute.as_bytes()) {
                dropped += 1;
                continue;
            }
        }
        out.extend_from_slice(field.raw);
    }

    if dropped == 0 {
        return Ok(None);
    }
    *removed += dropped;
    Ok(Some(out))
}

fn attribute_name(attribute: &[u8]) -> Result<Option<&[u8]>, CompatError> {
    Ok(fields(attribute)?
        .into_iter()
        .find(|f| f.number == ATTRIBUTE_NAME)
        .and_then(|f| f.payload))
}

struct Field<'a> {
    number: u32,
    /// Offset of the key within the enclosing message
    start: usize,
    /// Key and value exactly as encoded
    raw: &'a [u8],
    /// Body of a length-delimited value
    payload: Option<&'a [u8]>,
}

fn fields(message: &[u8]) -> Result<Vec<Field<'_>>, CompatError> {
    let mut fields = Vec::new();
    let mut cursor = message;

    while !cursor.is_empty() {
        let start = message.len() - cursor.len();
        let (number, wire_type) = decode_key(&mut cursor)?;

        let payload = match wire_type {
            WireType::Varint => {
                decode_varint(&mut cursor)?;
                None
            }
            WireType::SixtyFourBit => {
                cursor = skip(cursor, 8, number)?;
                None
            }
            WireType::ThirtyTwoBit => {
                cursor = skip(cursor, 4, number)?;
                None
            }
            WireType::LengthDelimited => {
                let len = usize::try_from(decode_varint(&mut cursor)?)
                    .map_err(|_| CompatError::Truncated(number))?;
                let body = cursor.get(..len).ok_or(CompatError::Truncated(number))?;
                cursor = &cursor[len..];
                Some(body)
            }
            WireType::StartGroup | WireType::EndGroup => {
                return Err(CompatError::GroupEncoding(number));
            }
        };

        let end = message.len() - cursor.len();
        fields.push(Field {
            number,
            start,
            raw: &message[start..end],
            payload,
        });
    }

    Ok(fields)
}

fn skip(cursor: &[u8], len: usize, number: u32) -> Result<&[u8], CompatError> {
    cursor.get(len..).ok_or(CompatError::Truncated(number))
}

fn write_length_delimited(out: &mut Vec<u8>, number: u32, body: &[u8]) {
    encode_key(number, WireType::LengthDelimited, out);
    encode_varint(body.len() as u64, out);
    out.extend_from_slice(body);
}
