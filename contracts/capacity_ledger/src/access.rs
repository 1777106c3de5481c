//! Role guards run at the top of every privileged entry point.
use soroban_sdk::{Address, Env};

use crate::error::LedgerError;
use crate::storage;

pub fn require_owner(e: &Env, caller: &Address) -> Result<(), LedgerError> {
    caller.require_auth();
    if *caller != storage::get_owner(e)? {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}

/// Owner or one of the whitelisted allocators.
pub fn require_allocator(e: &Env, caller: &Address) -> Result<(), LedgerError> {
    caller.require_auth();
    if *caller == storage::get_owner(e)? || storage::get_whitelist(e).contains(caller) {
        return Ok(());
    }
    Err(LedgerError::Unauthorized)
}

pub fn require_signer(e: &Env, caller: &Address) -> Result<(), LedgerError> {
    caller.require_auth();
    storage::get_owner(e)?;
    if !storage::get_signers(e).contains(caller) {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}
