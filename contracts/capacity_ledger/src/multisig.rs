//! N-of-M signer approval for moving held tokens out of the ledger.
use soroban_sdk::{log, token, Address, Env, Vec};

use crate::error::LedgerError;
use crate::events::Event;
use crate::storage;
use crate::types::WithdrawalProposal;

/// Deduplicated signer list, validated against `threshold`.
pub fn signer_set(e: &Env, signers: Vec<Address>, threshold: u32) -> Result<Vec<Address>, LedgerError> {
    let mut set = Vec::new(e);
    for s in signers.iter() {
        if !set.contains(&s) {
            set.push_back(s);
        }
    }
    if threshold == 0 || threshold > set.len() {
        return Err(LedgerError::InvalidThreshold);
    }
    Ok(set)
}

pub fn propose(
    e: &Env,
    proposer: Address,
    token: Option<Address>,
    recipient: Address,
    amount: i128,
) -> Result<u32, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount);
    }
    let token = match token {
        Some(t) => t,
        None => storage::get_token(e)?,
    };

    let id = storage::next_proposal_id(e);
    let proposal = WithdrawalProposal {
        id,
        proposer: proposer.clone(),
        token,
        recipient: recipient.clone(),
        amount,
        executed: false,
        confirmations: Vec::new(e),
    };
    storage::put_proposal(e, &proposal);

    log!(e, "withdrawal proposed", id, amount);
    e.events().publish((Event::ProposalCreated, id), (proposer, recipient, amount));
    Ok(id)
}

pub fn confirm(e: &Env, signer: Address, id: u32) -> Result<(), LedgerError> {
    let mut proposal = storage::get_proposal(e, id)?;
    if proposal.executed {
        return Err(LedgerError::AlreadyExecuted);
    }
    if proposal.confirmations.contains(&signer) {
        return Ok(());
    }
    proposal.confirmations.push_back(signer.clone());
    storage::put_proposal(e, &proposal);

    e.events().publish((Event::ProposalConfirmed, id), signer);
    Ok(())
}

/// Confirmations from addresses that are still signers.
pub fn confirmation_count(e: &Env, proposal: &WithdrawalProposal) -> u32 {
    let signers = storage::get_signers(e);
    proposal.confirmations.iter().filter(|c| signers.contains(c)).count() as u32
}

pub fn execute(e: &Env, id: u32) -> Result<(), LedgerError> {
    let mut proposal = storage::get_proposal(e, id)?;
    if proposal.executed {
        return Err(LedgerError::AlreadyExecuted);
    }
    if confirmation_count(e, &proposal) < storage::get_threshold(e) {
        return Err(LedgerError::NotEnoughConfirmations);
    }

    let client = token::Client::new(e, &proposal.token);
    let me = e.current_contract_address();
    if client.balance(&me) < proposal.amount {
        return Err(LedgerError::InsufficientBalance);
    }

    // flag is persisted before any value leaves
    proposal.executed = true;
    storage::put_proposal(e, &proposal);
    client.transfer(&me, &proposal.recipient, &proposal.amount);

    log!(e, "withdrawal executed", id, proposal.amount);
    e.events().publish((Event::ProposalExecuted, id), (proposal.recipient, proposal.amount));
    Ok(())
}

pub fn add_signer(e: &Env, by: Address, signer: Address) -> Result<(), LedgerError> {
    let mut signers = storage::get_signers(e);
    if signers.contains(&signer) {
        return Err(LedgerError::SignerExists);
    }
    signers.push_back(signer.clone());
    storage::put_signers(e, &signers);

    e.events().publish((Event::SignerAdded, signer), by);
    Ok(())
}

pub fn remove_signer(e: &Env, by: Address, signer: Address) -> Result<(), LedgerError> {
    let mut signers = storage::get_signers(e);
    let index = signers.first_index_of(&signer).ok_or(LedgerError::SignerNotFound)?;
    if signers.len() - 1 < storage::get_threshold(e) {
        return Err(LedgerError::InvalidThreshold);
    }
    signers.remove(index);
    storage::put_signers(e, &signers);

    e.events().publish((Event::SignerRemoved, signer), by);
    Ok(())
}
