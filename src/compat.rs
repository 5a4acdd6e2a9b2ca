//! Uniform inspection of legacy and v0 messages
//!
//! Envelopes may be compiled as either message version. Signers, and anyone
//! checking an envelope before signing, need the same answers from both:
//! which keys must sign, which accounts are written, which programs run.

use solana_sdk::{
    message::{MessageHeader, VersionedMessage},
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};

#[inline]
#[must_use]
pub fn get_message_header(message: &VersionedMessage) -> &MessageHeader {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.header,
        VersionedMessage::V0(v0_msg) => &v0_msg.header,
    }
}

/// Keys embedded in the message (lookup-table addresses excluded)
#[inline]
#[must_use]
pub fn get_static_account_keys(message: &VersionedMessage) -> &[Pubkey] {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.account_keys,
        VersionedMessage::V0(v0_msg) => &v0_msg.account_keys,
    }
}

/// Keys that must sign, fee payer first
#[inline]
#[must_use]
pub fn get_required_signers(message: &VersionedMessage) -> &[Pubkey] {
    let header = get_message_header(message);
    let account_keys = get_static_account_keys(message);
    let num_signers = header.num_required_signatures as usize;

    &account_keys[..num_signers.min(account_keys.len())]
}

/// Static keys the message may write to
#[must_use]
pub fn get_writable_accounts(message: &VersionedMessage) -> Vec<Pubkey> {
    let header = get_message_header(message);
    let keys = get_static_account_keys(message);
    let signed = header.num_required_signatures as usize;
    let writable_signed = signed.saturating_sub(header.num_readonly_signed_accounts as usize);
    let writable_unsigned_end = keys
        .len()
        .saturating_sub(header.num_readonly_unsigned_accounts as usize);

    keys.iter()
        .enumerate()
        .filter(|(i, _)| *i < writable_signed || (*i >= signed && *i < writable_unsigned_end))
        .map(|(_, k)| *k)
        .collect()
}

/// Programs invoked by the message, in instruction order
#[must_use]
pub fn get_invoked_programs(message: &VersionedMessage) -> Vec<Pubkey> {
    let keys = get_static_account_keys(message);
    message
        .instructions()
        .iter()
        .filter_map(|ix| keys.get(ix.program_id_index as usize).copied())
        .collect()
}

/// Whether every signature slot is still the zero placeholder
#[must_use]
pub fn is_unsigned(tx: &VersionedTransaction) -> bool {
    tx.signatures.iter().all(|s| *s == Signature::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::{InstructionEncoder, PlaceBet};
    use crate::types::ProgramContext;
    use solana_sdk::{
        hash::Hash,
        message::{v0::Message as MessageV0, Message},
        system_program,
    };

    fn bet_ix(bettor: Pubkey) -> solana_sdk::instruction::Instruction {
        InstructionEncoder::new(&ProgramContext::default())
            .place_bet(&PlaceBet {
                market_id: 1,
                outcome: false,
                amount: 5_000,
                bettor,
                whitelist: None,
            })
            .unwrap()
    }

    fn both_versions(bettor: Pubkey) -> [VersionedMessage; 2] {
        let ix = bet_ix(bettor);
        let legacy = Message::new(&[ix.clone()], Some(&bettor));
        let v0 = MessageV0::try_compile(&bettor, &[ix], &[], Hash::default()).unwrap();
        [VersionedMessage::Legacy(legacy), VersionedMessage::V0(v0)]
    }

    #[test]
    fn test_required_signers_both_versions() {
        let bettor = Pubkey::new_unique();
        for message in both_versions(bettor) {
            assert_eq!(get_message_header(&message).num_required_signatures, 1);
            assert_eq!(get_required_signers(&message), &[bettor]);
            assert_eq!(get_static_account_keys(&message)[0], bettor);
        }
    }

    #[test]
    fn test_writable_accounts_exclude_readonly() {
        let bettor = Pubkey::new_unique();
        let ctx = ProgramContext::default();
        for message in both_versions(bettor) {
            let writable = get_writable_accounts(&message);
            assert!(writable.contains(&bettor));
            assert!(!writable.contains(&system_program::id()));
            assert!(!writable.contains(&ctx.program_id));
        }
    }

    #[test]
    fn test_invoked_programs() {
        let bettor = Pubkey::new_unique();
        for message in both_versions(bettor) {
            assert_eq!(get_invoked_programs(&message), vec![ProgramContext::default().program_id]);
        }
    }

    #[test]
    fn test_is_unsigned() {
        let bettor = Pubkey::new_unique();
        let [legacy, _] = both_versions(bettor);
        let mut tx = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: legacy,
        };
        assert!(is_unsigned(&tx));
        tx.signatures[0] = Signature::from([1u8; 64]);
        assert!(!is_unsigned(&tx));
    }
}
