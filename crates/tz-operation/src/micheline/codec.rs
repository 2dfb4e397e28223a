//! Binary Micheline encoding.
//!
//! | Tag | Node                                   |
//! |-----|----------------------------------------|
//! | 0   | int (zarith integer)                   |
//! | 1   | string (u32 BE length + UTF-8)         |
//! | 2   | sequence (u32 BE length + nodes)       |
//! | 3-8 | prim with 0/1/2 args, without/with annots |
//! | 9   | prim with any args (length-prefixed) and annots |
//! | 10  | bytes (u32 BE length + raw)            |

use num_bigint::BigInt;
use tz_primitives::util::{ByteReader, ByteWriter};

use super::primitives::{code_of, name_of};
use super::{Micheline, Prim};
use crate::OperationError;

const TAG_INT: u8 = 0;
const TAG_STRING: u8 = 1;
const TAG_SEQ: u8 = 2;
const TAG_PRIM_GENERIC: u8 = 9;
const TAG_BYTES: u8 = 10;

/// Deepest nesting of sequences and prim arguments either direction accepts.
pub const MAX_DEPTH: usize = 1024;

fn check_depth(depth: usize) -> Result<(), OperationError> {
    if depth > MAX_DEPTH {
        return Err(OperationError::Forge("micheline nesting too deep".to_string()));
    }
    Ok(())
}

/// Encode a node to its binary form.
pub fn encode(value: &Micheline) -> Result<Vec<u8>, OperationError> {
    let mut writer = ByteWriter::new();
    write(&mut writer, value)?;
    Ok(writer.into_bytes())
}

/// Decode exactly one node spanning all of `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Micheline, OperationError> {
    let mut reader = ByteReader::new(bytes);
    let value = read(&mut reader)?;
    if reader.remaining() != 0 {
        return Err(OperationError::Forge(format!(
            "trailing {} bytes after expression",
            reader.remaining()
        )));
    }
    Ok(value)
}

/// Append the binary form of `value` to `writer`.
pub fn write(writer: &mut ByteWriter, value: &Micheline) -> Result<(), OperationError> {
    write_at(writer, value, 0)
}

fn write_at(
    writer: &mut ByteWriter,
    value: &Micheline,
    depth: usize,
) -> Result<(), OperationError> {
    check_depth(depth)?;
    match value {
        Micheline::Int { int } => {
            let n: BigInt = int
                .parse()
                .map_err(|_| OperationError::Forge(format!("invalid int literal {int:?}")))?;
            writer.write_u8(TAG_INT);
            writer.write_zarith_int(&n);
        }
        Micheline::String { string } => {
            writer.write_u8(TAG_STRING);
            writer.write_dynamic(string.as_bytes());
        }
        Micheline::Bytes { bytes } => {
            let raw = tz_primitives::util::hex_to_bytes(bytes)?;
            writer.write_u8(TAG_BYTES);
            writer.write_dynamic(&raw);
        }
        Micheline::Seq(items) => {
            let mut inner = ByteWriter::new();
            for item in items {
                write_at(&mut inner, item, depth + 1)?;
            }
            writer.write_u8(TAG_SEQ);
            writer.write_dynamic(&inner.into_bytes());
        }
        Micheline::Prim(prim) => write_prim(writer, prim, depth)?,
    }
    Ok(())
}

fn write_prim(writer: &mut ByteWriter, prim: &Prim, depth: usize) -> Result<(), OperationError> {
    let code =
        code_of(&prim.prim).ok_or_else(|| OperationError::UnknownPrimitive(prim.prim.clone()))?;
    let has_annots = !prim.annots.is_empty();
    let argc = prim.args.len();

    if argc <= 2 {
        let tag = 3 + 2 * argc as u8 + u8::from(has_annots);
        writer.write_u8(tag);
        writer.write_u8(code);
        for arg in &prim.args {
            write_at(writer, arg, depth + 1)?;
        }
        if has_annots {
            writer.write_dynamic(prim.annots.join(" ").as_bytes());
        }
    } else {
        let mut args = ByteWriter::new();
        for arg in &prim.args {
            write_at(&mut args, arg, depth + 1)?;
        }
        writer.write_u8(TAG_PRIM_GENERIC);
        writer.write_u8(code);
        writer.write_dynamic(&args.into_bytes());
        writer.write_dynamic(prim.annots.join(" ").as_bytes());
    }
    Ok(())
}

/// Read one node from `reader`.
///
/// Fails with a forge error once nesting exceeds [`MAX_DEPTH`].
pub fn read(reader: &mut ByteReader) -> Result<Micheline, OperationError> {
    read_at(reader, 0)
}

fn read_at(reader: &mut ByteReader, depth: usize) -> Result<Micheline, OperationError> {
    check_depth(depth)?;
    let tag = reader.read_u8()?;
    match tag {
        TAG_INT => Ok(Micheline::int(reader.read_zarith_int()?)),
        TAG_STRING => {
            let raw = reader.read_dynamic()?;
            let text = std::str::from_utf8(raw)
                .map_err(|e| OperationError::Forge(format!("string literal: {e}")))?;
            Ok(Micheline::string(text))
        }
        TAG_SEQ => {
            let raw = reader.read_dynamic()?;
            let mut inner = ByteReader::new(raw);
            let mut items = Vec::new();
            while inner.remaining() > 0 {
                items.push(read_at(&mut inner, depth + 1)?);
            }
            Ok(Micheline::Seq(items))
        }
        3..=8 => {
            let argc = usize::from((tag - 3) / 2);
            let has_annots = (tag - 3) % 2 == 1;
            let prim = read_prim_name(reader)?;
            let args = (0..argc)
                .map(|_| read_at(reader, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            let annots = if has_annots {
                read_annots(reader)?
            } else {
                Vec::new()
            };
            Ok(Micheline::Prim(Prim { prim, args, annots }))
        }
        TAG_PRIM_GENERIC => {
            let prim = read_prim_name(reader)?;
            let raw = reader.read_dynamic()?;
            let mut inner = ByteReader::new(raw);
            let mut args = Vec::new();
            while inner.remaining() > 0 {
                args.push(read_at(&mut inner, depth + 1)?);
            }
            let annots = read_annots(reader)?;
            Ok(Micheline::Prim(Prim { prim, args, annots }))
        }
        TAG_BYTES => Ok(Micheline::bytes(hex::encode(reader.read_dynamic()?))),
        other => Err(OperationError::Forge(format!("unknown micheline tag {other}"))),
    }
}

fn read_prim_name(reader: &mut ByteReader) -> Result<String, OperationError> {
    let code = reader.read_u8()?;
    name_of(code)
        .map(str::to_string)
        .ok_or_else(|| OperationError::UnknownPrimitive(format!("{code:#04x}")))
}

fn read_annots(reader: &mut ByteReader) -> Result<Vec<String>, OperationError> {
    let raw = reader.read_dynamic()?;
    let text = std::str::from_utf8(raw)
        .map_err(|e| OperationError::Forge(format!("annotations: {e}")))?;
    Ok(text.split(' ').filter(|a| !a.is_empty()).map(str::to_string).collect())
}
