//! Micheline expressions.
//!
//! `Micheline` mirrors the node's JSON form exactly (`{"int": …}`,
//! `{"string": …}`, `{"bytes": …}`, `{"prim": …, "args": …, "annots": …}`
//! or a JSON array for sequences) so that values round-trip through serde
//! unchanged. The `codec` module holds the binary form used by the forger.

pub mod codec;
pub mod primitives;

use serde::{Deserialize, Serialize};

/// A Micheline node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Micheline {
    /// Arbitrary-precision integer literal, as decimal text.
    Int { int: String },
    /// String literal.
    String { string: String },
    /// Byte literal, as hex.
    Bytes { bytes: String },
    /// Primitive application.
    Prim(Prim),
    /// Sequence of nodes.
    Seq(Vec<Micheline>),
}

/// A primitive application such as `Pair` or `PUSH`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prim {
    pub prim: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Micheline>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annots: Vec<String>,
}

impl Micheline {
    pub fn int(value: impl ToString) -> Self {
        Micheline::Int { int: value.to_string() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Micheline::String { string: value.into() }
    }

    pub fn bytes(hex: impl Into<String>) -> Self {
        Micheline::Bytes { bytes: hex.into() }
    }

    /// A primitive with no arguments.
    pub fn prim(name: &str) -> Self {
        Self::prim_args(name, Vec::new())
    }

    /// A primitive with arguments.
    pub fn prim_args(name: &str, args: Vec<Micheline>) -> Self {
        Micheline::Prim(Prim {
            prim: name.to_string(),
            args,
            annots: Vec::new(),
        })
    }

    /// `Pair a b`.
    pub fn pair(left: Micheline, right: Micheline) -> Self {
        Self::prim_args("Pair", vec![left, right])
    }

    pub fn seq(items: Vec<Micheline>) -> Self {
        Micheline::Seq(items)
    }

    /// Attach annotations to a primitive. Other nodes are returned unchanged.
    pub fn with_annots(self, annots: &[&str]) -> Self {
        match self {
            Micheline::Prim(mut p) => {
                p.annots = annots.iter().map(|a| a.to_string()).collect();
                Micheline::Prim(p)
            }
            other => other,
        }
    }

    /// The string literal, if this node is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Micheline::String { string } => Some(string),
            _ => None,
        }
    }

    /// The integer literal text, if this node is one.
    pub fn as_int(&self) -> Option<&str> {
        match self {
            Micheline::Int { int } => Some(int),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shapes() {
        let value = Micheline::seq(vec![
            Micheline::prim("DROP"),
            Micheline::prim_args("NIL", vec![Micheline::prim("operation")]),
            Micheline::pair(Micheline::string("tz1"), Micheline::int(5)),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"prim": "DROP"},
                {"prim": "NIL", "args": [{"prim": "operation"}]},
                {"prim": "Pair", "args": [{"string": "tz1"}, {"int": "5"}]}
            ])
        );
        let back: Micheline = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_annotations_parse() {
        let json = serde_json::json!({"prim": "unit", "annots": ["%default"]});
        let value: Micheline = serde_json::from_value(json).unwrap();
        assert_eq!(value, Micheline::prim("unit").with_annots(&["%default"]));
    }

    #[test]
    fn test_bytes_and_accessors() {
        let value: Micheline = serde_json::from_str(r#"{"bytes":"00ff"}"#).unwrap();
        assert_eq!(value, Micheline::bytes("00ff"));
        assert_eq!(Micheline::string("a").as_string(), Some("a"));
        assert_eq!(Micheline::int(3).as_int(), Some("3"));
        assert_eq!(Micheline::int(3).as_string(), None);
    }

    fn nested(depth: usize) -> Micheline {
        let mut value = Micheline::int(0);
        for _ in 0..depth {
            value = Micheline::prim_args("Some", vec![value]);
        }
        value
    }

    #[test]
    fn test_codec_accepts_nesting_up_to_the_bound() {
        let value = nested(codec::MAX_DEPTH);
        let bytes = codec::encode(&value).unwrap();
        assert_eq!(codec::decode(&bytes).unwrap(), value);
    }

    #[test]
    fn test_encode_rejects_excessive_nesting() {
        let err = codec::encode(&nested(codec::MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(
            err,
            crate::OperationError::Forge(ref m) if m == "micheline nesting too deep"
        ));
    }

    #[test]
    fn test_decode_rejects_excessive_nesting() {
        // 200k single-arg prims around a trailing int
        let mut bytes = [0x05, 0x00].repeat(200_000);
        bytes.extend_from_slice(&[0x00, 0x00]);
        let mut reader = tz_primitives::util::ByteReader::new(&bytes);
        let err = codec::read(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            crate::OperationError::Forge(ref m) if m == "micheline nesting too deep"
        ));
        assert!(codec::decode(&bytes).is_err());
    }
}
