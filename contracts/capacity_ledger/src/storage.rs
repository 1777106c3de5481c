use soroban_sdk::{contracttype, Address, Env, String, Vec};

use crate::error::LedgerError;
use crate::types::{AllocationRecord, Node, NodeCapacity, WithdrawalProposal};

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_THRESHOLD: u32 = INSTANCE_BUMP - DAY_IN_LEDGERS;
const PERSISTENT_BUMP: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_THRESHOLD: u32 = PERSISTENT_BUMP - DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // instance
    Owner,
    Token,
    RewardCurve,
    AllocationPaused,
    RewardsPaused,
    Whitelist,
    Signers,
    Threshold,
    NodeCount,
    ProposalCount,
    Available,
    // persistent
    Node(u32),
    NodeIp(String),
    Capacity(u32),
    Allocations(Address),
    Proposal(u32),
}

pub fn bump_instance(e: &Env) {
    e.storage().instance().extend_ttl(INSTANCE_THRESHOLD, INSTANCE_BUMP);
}

fn bump(e: &Env, key: &DataKey) {
    e.storage().persistent().extend_ttl(key, PERSISTENT_THRESHOLD, PERSISTENT_BUMP);
}

pub fn is_initialized(e: &Env) -> bool {
    e.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(e: &Env) -> Result<Address, LedgerError> {
    e.storage().instance().get(&DataKey::Owner).ok_or(LedgerError::NotInitialized)
}

pub fn put_owner(e: &Env, owner: &Address) {
    e.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_token(e: &Env) -> Result<Address, LedgerError> {
    e.storage().instance().get(&DataKey::Token).ok_or(LedgerError::NotInitialized)
}

pub fn put_token(e: &Env, token: &Address) {
    e.storage().instance().set(&DataKey::Token, token);
}

pub fn get_reward_curve(e: &Env) -> Result<Address, LedgerError> {
    e.storage().instance().get(&DataKey::RewardCurve).ok_or(LedgerError::NotInitialized)
}

pub fn put_reward_curve(e: &Env, curve: &Address) {
    e.storage().instance().set(&DataKey::RewardCurve, curve);
}

pub fn allocation_paused(e: &Env) -> bool {
    e.storage().instance().get(&DataKey::AllocationPaused).unwrap_or(false)
}

pub fn rewards_paused(e: &Env) -> bool {
    e.storage().instance().get(&DataKey::RewardsPaused).unwrap_or(false)
}

pub fn put_paused(e: &Env, allocation: bool, rewards: bool) {
    e.storage().instance().set(&DataKey::AllocationPaused, &allocation);
    e.storage().instance().set(&DataKey::RewardsPaused, &rewards);
}

pub fn get_whitelist(e: &Env) -> Vec<Address> {
    e.storage().instance().get(&DataKey::Whitelist).unwrap_or(Vec::new(e))
}

pub fn put_whitelist(e: &Env, list: &Vec<Address>) {
    e.storage().instance().set(&DataKey::Whitelist, list);
}

pub fn get_signers(e: &Env) -> Vec<Address> {
    e.storage().instance().get(&DataKey::Signers).unwrap_or(Vec::new(e))
}

pub fn put_signers(e: &Env, signers: &Vec<Address>) {
    e.storage().instance().set(&DataKey::Signers, signers);
}

pub fn get_threshold(e: &Env) -> u32 {
    e.storage().instance().get(&DataKey::Threshold).unwrap_or(0)
}

pub fn put_threshold(e: &Env, threshold: u32) {
    e.storage().instance().set(&DataKey::Threshold, &threshold);
}

pub fn node_count(e: &Env) -> u32 {
    e.storage().instance().get(&DataKey::NodeCount).unwrap_or(0)
}

/// Node ids start at 1.
pub fn next_node_id(e: &Env) -> u32 {
    let n = node_count(e) + 1;
    e.storage().instance().set(&DataKey::NodeCount, &n);
    n
}

/// Proposal ids start at 0.
pub fn next_proposal_id(e: &Env) -> u32 {
    let k = DataKey::ProposalCount;
    let n: u32 = e.storage().instance().get(&k).unwrap_or(0);
    e.storage().instance().set(&k, &(n + 1));
    n
}

pub fn get_node(e: &Env, id: u32) -> Option<Node> {
    let key = DataKey::Node(id);
    let node = e.storage().persistent().get(&key);
    if node.is_some() {
        bump(e, &key);
    }
    node
}

pub fn put_node(e: &Env, node: &Node) {
    let key = DataKey::Node(node.id);
    e.storage().persistent().set(&key, node);
    bump(e, &key);
}

pub fn has_ip(e: &Env, ip: &String) -> bool {
    e.storage().persistent().has(&DataKey::NodeIp(ip.clone()))
}

pub fn put_ip(e: &Env, ip: &String, id: u32) {
    let key = DataKey::NodeIp(ip.clone());
    e.storage().persistent().set(&key, &id);
    bump(e, &key);
}

pub fn get_capacity(e: &Env, id: u32) -> NodeCapacity {
    e.storage().persistent().get(&DataKey::Capacity(id)).unwrap_or(NodeCapacity::Open)
}

pub fn put_capacity(e: &Env, id: u32, state: &NodeCapacity) {
    let key = DataKey::Capacity(id);
    e.storage().persistent().set(&key, state);
    bump(e, &key);

    let has_room = !matches!(state, NodeCapacity::Whole | NodeCapacity::Partial(0));
    let mut pool = available_nodes(e);
    match (has_room, pool.binary_search(id)) {
        (true, Err(at)) => pool.insert(at, id),
        (false, Ok(at)) => {
            pool.remove(at);
        }
        _ => return,
    }
    e.storage().instance().set(&DataKey::Available, &pool);
}

/// Ids of nodes with unclaimed capacity, ascending. Paused nodes stay listed.
pub fn available_nodes(e: &Env) -> Vec<u32> {
    e.storage().instance().get(&DataKey::Available).unwrap_or(Vec::new(e))
}

pub fn get_allocations(e: &Env, user: &Address) -> Vec<AllocationRecord> {
    let key = DataKey::Allocations(user.clone());
    match e.storage().persistent().get(&key) {
        Some(v) => {
            bump(e, &key);
            v
        }
        None => Vec::new(e),
    }
}

pub fn put_allocations(e: &Env, user: &Address, records: &Vec<AllocationRecord>) {
    let key = DataKey::Allocations(user.clone());
    if records.is_empty() {
        e.storage().persistent().remove(&key);
    } else {
        e.storage().persistent().set(&key, records);
        bump(e, &key);
    }
}

pub fn get_proposal(e: &Env, id: u32) -> Result<WithdrawalProposal, LedgerError> {
    e.storage().persistent().get(&DataKey::Proposal(id)).ok_or(LedgerError::ProposalNotFound)
}

pub fn put_proposal(e: &Env, proposal: &WithdrawalProposal) {
    let key = DataKey::Proposal(proposal.id);
    e.storage().persistent().set(&key, proposal);
    bump(e, &key);
}
