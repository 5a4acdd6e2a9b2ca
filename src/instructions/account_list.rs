//! Ordered account references for an instruction

use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, system_program};

/// Builds the account list in ABI order.
///
/// Optional slots are never dropped: when the account does not apply, the
/// slot carries the program id itself as a read-only non-signer. That is the
/// program's convention for "none"; omitting the slot shifts every later
/// account and the transaction fails on submission.
#[derive(Debug, Clone)]
pub struct AccountList {
    program_id: Pubkey,
    metas: Vec<AccountMeta>,
}

impl AccountList {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            metas: Vec::with_capacity(8),
        }
    }

    pub fn writable(mut self, key: Pubkey) -> Self {
        self.metas.push(AccountMeta::new(key, false));
        self
    }

    pub fn readonly(mut self, key: Pubkey) -> Self {
        self.metas.push(AccountMeta::new_readonly(key, false));
        self
    }

    /// Writable signer (payer / owner)
    pub fn signer(mut self, key: Pubkey) -> Self {
        self.metas.push(AccountMeta::new(key, true));
        self
    }

    /// Read-only signer (authority that pays nothing)
    pub fn readonly_signer(mut self, key: Pubkey) -> Self {
        self.metas.push(AccountMeta::new_readonly(key, true));
        self
    }

    /// Optional slot: the account when present, the program-id placeholder
    /// otherwise
    pub fn optional(mut self, key: Option<Pubkey>, writable: bool) -> Self {
        let meta = match key {
            Some(key) if writable => AccountMeta::new(key, false),
            Some(key) => AccountMeta::new_readonly(key, false),
            None => self.placeholder(),
        };
        self.metas.push(meta);
        self
    }

    pub fn system_program(self) -> Self {
        self.readonly(system_program::id())
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }

    pub fn into_metas(self) -> Vec<AccountMeta> {
        self.metas
    }

    fn placeholder(&self) -> AccountMeta {
        AccountMeta::new_readonly(self.program_id, false)
    }
}

/// Whether `meta` is the "absent optional account" placeholder
pub fn is_placeholder(meta: &AccountMeta, program_id: &Pubkey) -> bool {
    meta.pubkey == *program_id && !meta.is_signer && !meta.is_writable
}
