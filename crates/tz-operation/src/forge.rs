//! Local operation forger.
//!
//! Encodes a `ForgedOperation` to the protocol's binary form without asking
//! a node, and parses that form back. The node's forge result is only
//! trusted after `verify_forge` has reproduced it byte for byte.
//!
//! # Wire format
//!
//! | Field    | Size                         |
//! |----------|------------------------------|
//! | branch   | 32 bytes                     |
//! | contents | tag byte + per-kind body, repeated |

use tracing::{debug, warn};
use tz_primitives::base58::{b58c_decode, b58c_encode, Prefix};
use tz_primitives::keys::{Curve, PublicKey};
use tz_primitives::util::{bytes_to_hex, hex_to_bytes, ByteReader, ByteWriter};

use crate::address::Address;
use crate::content::{ForgedOperation, ManagerFields, OperationContent, Script, TransactionParameters};
use crate::micheline::{codec, Micheline};
use crate::OperationError;

const TAG_ACTIVATE_ACCOUNT: u8 = 4;
const TAG_REVEAL: u8 = 107;
const TAG_TRANSACTION: u8 = 108;
const TAG_ORIGINATION: u8 = 109;
const TAG_DELEGATION: u8 = 110;

const PRESENT: u8 = 0xff;
const ABSENT: u8 = 0x00;

/// Entrypoints with a one-byte code.
const NAMED_ENTRYPOINTS: [&str; 6] = [
    "default",
    "root",
    "do",
    "set_delegate",
    "remove_delegate",
    "deposit",
];

/// Encode an operation group to bytes. `protocol` and `signature` are
/// not part of the forged bytes.
pub fn forge(op: &ForgedOperation) -> Result<Vec<u8>, OperationError> {
    let mut writer = ByteWriter::new();
    writer.write_bytes(&b58c_decode(&op.branch, Prefix::BlockHash)?);
    for content in &op.contents {
        write_content(&mut writer, content)?;
    }
    Ok(writer.into_bytes())
}

/// Encode an operation group to lower-case hex.
pub fn forge_hex(op: &ForgedOperation) -> Result<String, OperationError> {
    Ok(bytes_to_hex(&forge(op)?))
}

/// Check that `remote_hex`, forged by a node, equals the local encoding.
///
/// # Returns
/// `Ok(())` on an exact match, otherwise `ValidationError` carrying both
/// encodings. Nothing derived from a mismatching encoding may be signed.
pub fn verify_forge(remote_hex: &str, op: &ForgedOperation) -> Result<(), OperationError> {
    let local = forge_hex(&op.unsigned())?;
    if remote_hex.eq_ignore_ascii_case(&local) {
        debug!(bytes = local.len() / 2, "forge verified");
        return Ok(());
    }
    warn!(remote = %remote_hex, local = %local, "remote forge does not match local encoding");
    Err(OperationError::ValidationError {
        remote: remote_hex.to_string(),
        local,
    })
}

/// Parse forged bytes back into an unsigned operation group.
pub fn parse(bytes: &[u8]) -> Result<ForgedOperation, OperationError> {
    let mut reader = ByteReader::new(bytes);
    let branch = b58c_encode(reader.read_bytes(32)?, Prefix::BlockHash);
    let mut contents = Vec::new();
    while reader.remaining() > 0 {
        contents.push(read_content(&mut reader)?);
    }
    Ok(ForgedOperation::new(branch, contents))
}

/// Parse hex forged bytes.
pub fn parse_hex(hex_str: &str) -> Result<ForgedOperation, OperationError> {
    parse(&hex_to_bytes(hex_str)?)
}

// -----------------------------------------------------------------
// Encoding
// -----------------------------------------------------------------

fn write_content(writer: &mut ByteWriter, content: &OperationContent) -> Result<(), OperationError> {
    match content {
        OperationContent::Reveal { manager, public_key } => {
            writer.write_u8(TAG_REVEAL);
            write_manager(writer, manager)?;
            write_public_key(writer, public_key)?;
        }
        OperationContent::Transaction {
            manager,
            amount,
            destination,
            parameters,
        } => {
            writer.write_u8(TAG_TRANSACTION);
            write_manager(writer, manager)?;
            writer.write_zarith_u64(*amount);
            Address::parse(destination)?.write_contract_id(writer);
            match parameters.as_ref().filter(|p| !is_default_unit(p)) {
                Some(params) => {
                    writer.write_u8(PRESENT);
                    write_entrypoint(writer, &params.entrypoint)?;
                    writer.write_dynamic(&codec::encode(&params.value)?);
                }
                None => writer.write_u8(ABSENT),
            }
        }
        OperationContent::Origination {
            manager,
            balance,
            delegate,
            script,
        } => {
            writer.write_u8(TAG_ORIGINATION);
            write_manager(writer, manager)?;
            writer.write_zarith_u64(*balance);
            write_optional_delegate(writer, delegate.as_deref())?;
            writer.write_dynamic(&codec::encode(&script.code)?);
            writer.write_dynamic(&codec::encode(&script.storage)?);
        }
        OperationContent::Delegation { manager, delegate } => {
            writer.write_u8(TAG_DELEGATION);
            write_manager(writer, manager)?;
            write_optional_delegate(writer, delegate.as_deref())?;
        }
        OperationContent::ActivateAccount { pkh, secret } => {
            writer.write_u8(TAG_ACTIVATE_ACCOUNT);
            writer.write_bytes(&b58c_decode(pkh, Prefix::Ed25519PublicKeyHash)?);
            let secret = hex_to_bytes(secret)?;
            if secret.len() != 20 {
                return Err(OperationError::Forge(format!(
                    "activation secret must be 20 bytes, got {}",
                    secret.len()
                )));
            }
            writer.write_bytes(&secret);
        }
    }
    Ok(())
}

/// The node omits parameters that call `default` with `Unit`.
fn is_default_unit(params: &TransactionParameters) -> bool {
    params.entrypoint == "default"
        && matches!(&params.value, Micheline::Prim(p) if p.prim == "Unit" && p.args.is_empty())
}

fn write_manager(writer: &mut ByteWriter, manager: &ManagerFields) -> Result<(), OperationError> {
    Address::parse(&manager.source)?.write_implicit(writer)?;
    writer.write_zarith_u64(manager.fee);
    writer.write_zarith_u64(manager.counter);
    writer.write_zarith_u64(manager.gas_limit);
    writer.write_zarith_u64(manager.storage_limit);
    Ok(())
}

fn write_public_key(writer: &mut ByteWriter, public_key: &str) -> Result<(), OperationError> {
    let pk = PublicKey::from_b58(public_key)?;
    writer.write_u8(match pk.curve() {
        Curve::Ed25519 => 0,
        Curve::Secp256k1 => 1,
        Curve::P256 => 2,
    });
    writer.write_bytes(&pk.to_bytes());
    Ok(())
}

fn write_optional_delegate(
    writer: &mut ByteWriter,
    delegate: Option<&str>,
) -> Result<(), OperationError> {
    match delegate {
        Some(pkh) => {
            writer.write_u8(PRESENT);
            Address::parse(pkh)?.write_implicit(writer)
        }
        None => {
            writer.write_u8(ABSENT);
            Ok(())
        }
    }
}

fn write_entrypoint(writer: &mut ByteWriter, entrypoint: &str) -> Result<(), OperationError> {
    if let Some(code) = NAMED_ENTRYPOINTS.iter().position(|e| *e == entrypoint) {
        writer.write_u8(code as u8);
        return Ok(());
    }
    let len = u8::try_from(entrypoint.len())
        .map_err(|_| OperationError::Forge(format!("entrypoint too long: {entrypoint}")))?;
    writer.write_u8(0xff);
    writer.write_u8(len);
    writer.write_bytes(entrypoint.as_bytes());
    Ok(())
}

// -----------------------------------------------------------------
// Decoding
// -----------------------------------------------------------------

fn read_content(reader: &mut ByteReader) -> Result<OperationContent, OperationError> {
    let tag = reader.read_u8()?;
    let content = match tag {
        TAG_REVEAL => OperationContent::Reveal {
            manager: read_manager(reader)?,
            public_key: read_public_key(reader)?,
        },
        TAG_TRANSACTION => {
            let manager = read_manager(reader)?;
            let amount = reader.read_zarith_u64()?;
            let destination = Address::read_contract_id(reader)?.to_string();
            let parameters = if read_presence(reader)? {
                let entrypoint = read_entrypoint(reader)?;
                let value = codec::decode(reader.read_dynamic()?)?;
                Some(TransactionParameters { entrypoint, value })
            } else {
                None
            };
            OperationContent::Transaction {
                manager,
                amount,
                destination,
                parameters,
            }
        }
        TAG_ORIGINATION => {
            let manager = read_manager(reader)?;
            let balance = reader.read_zarith_u64()?;
            let delegate = read_optional_delegate(reader)?;
            let code = codec::decode(reader.read_dynamic()?)?;
            let storage = codec::decode(reader.read_dynamic()?)?;
            OperationContent::Origination {
                manager,
                balance,
                delegate,
                script: Script { code, storage },
            }
        }
        TAG_DELEGATION => OperationContent::Delegation {
            manager: read_manager(reader)?,
            delegate: read_optional_delegate(reader)?,
        },
        TAG_ACTIVATE_ACCOUNT => OperationContent::ActivateAccount {
            pkh: b58c_encode(reader.read_bytes(20)?, Prefix::Ed25519PublicKeyHash),
            secret: bytes_to_hex(reader.read_bytes(20)?),
        },
        other => {
            return Err(OperationError::Forge(format!("unsupported content tag {other}")));
        }
    };
    Ok(content)
}

fn read_presence(reader: &mut ByteReader) -> Result<bool, OperationError> {
    match reader.read_u8()? {
        PRESENT => Ok(true),
        ABSENT => Ok(false),
        other => Err(OperationError::Forge(format!("invalid presence flag {other:#04x}"))),
    }
}

fn read_manager(reader: &mut ByteReader) -> Result<ManagerFields, OperationError> {
    Ok(ManagerFields {
        source: Address::read_implicit(reader)?.to_string(),
        fee: reader.read_zarith_u64()?,
        counter: reader.read_zarith_u64()?,
        gas_limit: reader.read_zarith_u64()?,
        storage_limit: reader.read_zarith_u64()?,
    })
}

fn read_public_key(reader: &mut ByteReader) -> Result<String, OperationError> {
    let (curve, len) = match reader.read_u8()? {
        0 => (Curve::Ed25519, 32),
        1 => (Curve::Secp256k1, 33),
        2 => (Curve::P256, 33),
        other => return Err(OperationError::Forge(format!("unknown public key tag {other}"))),
    };
    Ok(PublicKey::from_raw(curve, reader.read_bytes(len)?)?.to_b58())
}

fn read_optional_delegate(reader: &mut ByteReader) -> Result<Option<String>, OperationError> {
    if read_presence(reader)? {
        Ok(Some(Address::read_implicit(reader)?.to_string()))
    } else {
        Ok(None)
    }
}

fn read_entrypoint(reader: &mut ByteReader) -> Result<String, OperationError> {
    let code = reader.read_u8()?;
    if let Some(name) = NAMED_ENTRYPOINTS.get(code as usize) {
        return Ok(name.to_string());
    }
    if code != 0xff {
        return Err(OperationError::Forge(format!("unknown entrypoint code {code}")));
    }
    let len = reader.read_u8()? as usize;
    String::from_utf8(reader.read_bytes(len)?.to_vec())
        .map_err(|e| OperationError::Forge(format!("entrypoint name: {e}")))
}
