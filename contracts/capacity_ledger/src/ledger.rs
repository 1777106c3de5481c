//! Capacity ledger: the node registry and each node's claim state.
use soroban_sdk::{log, Address, Env, String, Vec};

use crate::error::LedgerError;
use crate::events::Event;
use crate::storage;
use crate::types::{Node, NodeCapacity, NodeDescriptor, DEFAULT_CAPACITY, MAX_NODES, MAX_WHITELIST};

impl NodeCapacity {
    pub fn remaining(&self, capacity: u64) -> u64 {
        match self {
            NodeCapacity::Open => capacity,
            NodeCapacity::Partial(r) => *r,
            NodeCapacity::Whole => 0,
        }
    }

    /// State after drawing `amount` units as a fractional claim.
    pub fn take(&self, capacity: u64, amount: u64) -> Result<NodeCapacity, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let left = self
            .remaining(capacity)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientCapacity)?;
        Ok(NodeCapacity::Partial(left))
    }

    /// State after returning `amount` fractional units.
    pub fn release(&self, capacity: u64, amount: u64) -> Result<NodeCapacity, LedgerError> {
        let back = match self {
            NodeCapacity::Whole => return Err(LedgerError::RecordNotFound),
            other => other.remaining(capacity).checked_add(amount).ok_or(LedgerError::Overflow)?,
        };
        if back > capacity {
            return Err(LedgerError::Overflow);
        }
        if back == capacity {
            Ok(NodeCapacity::Open)
        } else {
            Ok(NodeCapacity::Partial(back))
        }
    }
}

pub fn create_node(e: &Env, descriptor: NodeDescriptor) -> Result<u32, LedgerError> {
    if storage::has_ip(e, &descriptor.ip) {
        return Err(LedgerError::DuplicateKey);
    }
    if storage::node_count(e) >= MAX_NODES {
        return Err(LedgerError::NodeLimitReached);
    }

    let id = storage::next_node_id(e);
    let node = Node {
        id,
        ip: descriptor.ip,
        name: descriptor.name,
        description: descriptor.description,
        active: true,
        capacity: DEFAULT_CAPACITY,
        stake_address: descriptor.stake_address,
        created_at: e.ledger().timestamp(),
        created_height: e.ledger().sequence(),
    };
    storage::put_ip(e, &node.ip, id);
    storage::put_capacity(e, id, &NodeCapacity::Open);
    storage::put_node(e, &node);

    log!(e, "node created", id, node.ip.clone());
    e.events().publish((Event::NodeCreated, id), node.stake_address);
    Ok(id)
}

pub fn create_nodes(e: &Env, descriptors: Vec<NodeDescriptor>) -> Result<Vec<u32>, LedgerError> {
    let mut seen: Vec<String> = Vec::new(e);
    for d in descriptors.iter() {
        if seen.contains(&d.ip) || storage::has_ip(e, &d.ip) {
            return Err(LedgerError::DuplicateKey);
        }
        seen.push_back(d.ip);
    }
    if storage::node_count(e) + descriptors.len() > MAX_NODES {
        return Err(LedgerError::NodeLimitReached);
    }

    let mut ids = Vec::new(e);
    for d in descriptors.iter() {
        ids.push_back(create_node(e, d)?);
    }
    Ok(ids)
}

pub fn load(e: &Env, id: u32) -> Result<Node, LedgerError> {
    storage::get_node(e, id).ok_or(LedgerError::NodeNotFound)
}

pub fn set_status(e: &Env, id: u32, paused: bool) -> Result<(), LedgerError> {
    let mut node = load(e, id)?;
    node.active = !paused;
    storage::put_node(e, &node);

    log!(e, "node status", id, node.active);
    e.events().publish((Event::NodeStatus, id), node.active);
    Ok(())
}

pub fn remaining_capacity(e: &Env, id: u32) -> Result<u64, LedgerError> {
    let node = load(e, id)?;
    Ok(storage::get_capacity(e, id).remaining(node.capacity))
}

pub fn is_whole_claimed(e: &Env, id: u32) -> Result<bool, LedgerError> {
    load(e, id)?;
    Ok(storage::get_capacity(e, id) == NodeCapacity::Whole)
}

pub fn is_active(e: &Env, id: u32) -> bool {
    storage::get_node(e, id).map(|n| n.active).unwrap_or(false)
}

pub fn whitelist_set(e: &Env, account: &Address, enabled: bool) -> Result<(), LedgerError> {
    let mut list = storage::get_whitelist(e);
    match (enabled, list.first_index_of(account)) {
        (true, None) => {
            if list.len() >= MAX_WHITELIST {
                return Err(LedgerError::InvalidAmount);
            }
            list.push_back(account.clone());
        }
        (false, Some(i)) => {
            list.remove(i);
        }
        _ => return Ok(()),
    }
    storage::put_whitelist(e, &list);
    e.events().publish((Event::WhitelistUpdated, account.clone()), enabled);
    Ok(())
}
