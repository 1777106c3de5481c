use soroban_sdk::{contracttype, Address, Env};

use crate::types::{AllocationRecord, NodeType};

#[contracttype]
#[derive(Clone, Copy, PartialEq)]
pub enum Event {
    NodeCreated,          // (node_id) -> stake_address
    NodeStatus,           // (node_id) -> active
    WhitelistUpdated,     // (account) -> enabled
    StatusUpdated,        // () -> (allocation_paused, rewards_paused)
    Allocated,            // (user, node_id) -> (stake_address, node_type, amount)
    Deallocated,          // (user, node_id) -> (stake_address, node_type, amount)
    BatchItemFailed,      // (index) -> error code
    RewardDistributed,    // (user, stake_address) -> (amount, day)
    Deposited,            // (from) -> amount
    ProposalCreated,      // (id) -> (proposer, recipient, amount)
    ProposalConfirmed,    // (id) -> signer
    ProposalExecuted,     // (id) -> (recipient, amount)
    SignerAdded,          // (signer) -> by
    SignerRemoved,        // (signer) -> by
    OwnershipTransferred, // (old) -> new
}

pub fn allocated(e: &Env, record: &AllocationRecord) {
    e.events().publish(
        (Event::Allocated, record.user.clone(), record.node_id),
        (record.stake_address.clone(), record.node_type, record.amount),
    );
}

pub fn deallocated(e: &Env, user: &Address, stake: &Address, node_type: NodeType, amount: u64, node_id: u32) {
    e.events().publish(
        (Event::Deallocated, user.clone(), node_id),
        (stake.clone(), node_type, amount),
    );
}

pub fn reward_distributed(e: &Env, user: &Address, stake: &Address, amount: i128, day: u32) {
    e.events().publish((Event::RewardDistributed, user.clone(), stake.clone()), (amount, day));
}
