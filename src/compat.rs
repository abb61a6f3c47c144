//! Compatibility layer for Solana SDK message types
//!
//! Externally-built transactions can arrive as Legacy or V0 messages. These
//! helpers give one API over both for reading headers and account keys and
//! for turning a compiled instruction back into an `Instruction`.

use solana_sdk::{
    instruction::{AccountMeta, CompiledInstruction, Instruction},
    message::{MessageHeader, VersionedMessage},
    pubkey::Pubkey,
};
use thiserror::Error;

/// A compiled instruction that cannot be rebuilt from the static keys alone
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("instruction for program {program_id} references accounts outside the static keys")]
pub struct UnresolvedAccounts {
    pub program_id: Pubkey,
}

/// Get the message header from a `VersionedMessage`.
#[inline]
#[must_use]
pub fn get_message_header(message: &VersionedMessage) -> &MessageHeader {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.header,
        VersionedMessage::V0(v0_msg) => &v0_msg.header,
    }
}

/// Get the static account keys from a `VersionedMessage`.
///
/// For V0 messages this excludes addresses loaded from lookup tables.
#[inline]
#[must_use]
pub fn get_static_account_keys(message: &VersionedMessage) -> &[Pubkey] {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.account_keys,
        VersionedMessage::V0(v0_msg) => &v0_msg.account_keys,
    }
}

#[inline]
#[must_use]
pub fn get_compiled_instructions(message: &VersionedMessage) -> &[CompiledInstruction] {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.instructions,
        VersionedMessage::V0(v0_msg) => &v0_msg.instructions,
    }
}

/// Whether the static account at `index` must sign
#[inline]
#[must_use]
pub fn is_signer_index(header: &MessageHeader, index: usize) -> bool {
    index < header.num_required_signatures as usize
}

/// Whether the static account at `index` is writable, derived from the header layout:
/// `[writable signers | readonly signers | writable non-signers | readonly non-signers]`
#[must_use]
pub fn is_writable_index(header: &MessageHeader, num_static_keys: usize, index: usize) -> bool {
    let num_signers = header.num_required_signatures as usize;
    if index >= num_static_keys {
        return false;
    }
    if index < num_signers {
        index < num_signers.saturating_sub(header.num_readonly_signed_accounts as usize)
    } else {
        index < num_static_keys.saturating_sub(header.num_readonly_unsigned_accounts as usize)
    }
}

/// Rebuild a compiled instruction against the message's static keys
///
/// Returns `None` when any index points outside the static keys (for example
/// into an address lookup table, which cannot be resolved offline).
#[must_use]
pub fn decompile_instruction(message: &VersionedMessage, ix: &CompiledInstruction) -> Option<Instruction> {
    let header = get_message_header(message);
    let keys = get_static_account_keys(message);

    let program_id = *keys.get(ix.program_id_index as usize)?;
    let accounts = ix
        .accounts
        .iter()
        .map(|&idx| {
            let idx = idx as usize;
            keys.get(idx).map(|pubkey| AccountMeta {
                pubkey: *pubkey,
                is_signer: is_signer_index(header, idx),
                is_writable: is_writable_index(header, keys.len(), idx),
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(Instruction {
        program_id,
        accounts,
        data: ix.data.clone(),
    })
}

/// First instruction invoking `program_id`, decompiled
///
/// `Ok(None)` means no instruction targets the program.
pub fn find_program_instruction(
    message: &VersionedMessage,
    program_id: &Pubkey,
) -> Result<Option<Instruction>, UnresolvedAccounts> {
    let keys = get_static_account_keys(message);
    let found = get_compiled_instructions(message)
        .iter()
        .find(|ix| keys.get(ix.program_id_index as usize) == Some(program_id));

    match found {
        Some(ix) => decompile_instruction(message, ix)
            .map(Some)
            .ok_or(UnresolvedAccounts {
                program_id: *program_id,
            }),
        None => Ok(None),
    }
}
