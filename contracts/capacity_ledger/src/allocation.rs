//! Allocation engine.
//!
//! Every instruction is planned on a [`Draft`]: node states it touches are
//! kept in an in-memory overlay and the new records are buffered. Nothing is
//! written until the whole instruction has been planned, so a failing
//! instruction leaves storage exactly as it found it, also inside a batch.
use soroban_sdk::{log, Address, Env, Map, Vec};

use crate::error::LedgerError;
use crate::events::{self, Event};
use crate::storage;
use crate::types::{
    AllocationRecord, AllocationRequest, BatchOutcome, CombinedAllocation, Node, NodeCapacity,
    NodeType, DEFAULT_CAPACITY, MAX_BATCH, MEDIUM_UNIT, SCALE, SMALL_UNIT,
};

struct Draft<'a> {
    e: &'a Env,
    user: Address,
    stake_address: Address,
    touched: Map<u32, NodeCapacity>,
    records: Vec<AllocationRecord>,
}

impl<'a> Draft<'a> {
    fn new(e: &'a Env, user: Address, stake_address: Address) -> Self {
        Draft {
            e,
            user,
            stake_address,
            touched: Map::new(e),
            records: Vec::new(e),
        }
    }

    fn state(&self, id: u32) -> NodeCapacity {
        self.touched.get(id).unwrap_or_else(|| storage::get_capacity(self.e, id))
    }

    fn active_node(&self, id: u32) -> Option<Node> {
        storage::get_node(self.e, id).filter(|n| n.active)
    }

    fn claim(&mut self, node_id: u32, next: NodeCapacity, node_type: NodeType, amount: u64) {
        self.touched.set(node_id, next);
        self.records.push_back(AllocationRecord {
            user: self.user.clone(),
            stake_address: self.stake_address.clone(),
            node_type,
            amount,
            node_id,
        });
    }

    /// Draws one fractional claim from `node`, if it fits.
    fn try_take(&mut self, node: &Node, node_type: NodeType, amount: u64) -> bool {
        match self.state(node.id).take(node.capacity, amount) {
            Ok(next) => {
                self.claim(node.id, next, node_type, amount);
                true
            }
            Err(_) => false,
        }
    }

    /// Claims `count` untouched nodes outright, lowest id first.
    fn whole_nodes(&mut self, count: u32) -> Result<(), LedgerError> {
        let mut left = count;
        for id in storage::available_nodes(self.e).iter() {
            if left == 0 {
                break;
            }
            if self.state(id) != NodeCapacity::Open {
                continue;
            }
            if let Some(node) = self.active_node(id) {
                self.claim(id, NodeCapacity::Whole, NodeType::Whole, node.capacity);
                left -= 1;
            }
        }
        if left > 0 {
            return Err(LedgerError::InsufficientCapacity);
        }
        Ok(())
    }

    /// Greedy lowest-id-first packing of `count` equal fractions.
    fn units(&mut self, node_type: NodeType, unit: u64, count: u32) -> Result<(), LedgerError> {
        let pool = storage::available_nodes(self.e);
        let mut left = count;
        let mut at = 0;
        while left > 0 {
            let id = pool.get(at).ok_or(LedgerError::InsufficientCapacity)?;
            let fitted = match self.active_node(id) {
                Some(node) => self.try_take(&node, node_type, unit),
                None => false,
            };
            if fitted {
                left -= 1;
            } else {
                at += 1;
            }
        }
        Ok(())
    }

    /// First active node that can hold `amount` in one piece.
    fn node_fitting(&self, amount: u64) -> Option<Node> {
        storage::available_nodes(self.e)
            .iter()
            .filter_map(|id| self.active_node(id))
            .find(|node| self.state(node.id).remaining(node.capacity) >= amount)
    }

    /// A commodity record names one node, so the amount is never split.
    fn commodity(&mut self, amount: u64) -> Result<(), LedgerError> {
        let node = self.node_fitting(amount).ok_or(LedgerError::InsufficientCapacity)?;
        self.try_take(&node, NodeType::Commodity, amount);
        Ok(())
    }

    fn combined(&mut self, combo: &CombinedAllocation) -> Result<(), LedgerError> {
        let total = combined_total(combo)?;
        if let Some(node) = self.node_fitting(total) {
            for _ in 0..combo.medium {
                self.try_take(&node, NodeType::Medium, MEDIUM_UNIT);
            }
            for _ in 0..combo.small {
                self.try_take(&node, NodeType::Small, SMALL_UNIT);
            }
            if combo.commodity > 0 {
                self.try_take(&node, NodeType::Commodity, combo.commodity);
            }
            return Ok(());
        }

        log!(self.e, "no single node fits combined total", total);
        self.units(NodeType::Medium, MEDIUM_UNIT, combo.medium)?;
        self.units(NodeType::Small, SMALL_UNIT, combo.small)?;
        if combo.commodity > 0 {
            self.commodity(combo.commodity)?;
        }
        Ok(())
    }

    fn commit(self) -> u32 {
        for (id, state) in self.touched.iter() {
            storage::put_capacity(self.e, id, &state);
        }
        let mut live = storage::get_allocations(self.e, &self.user);
        for record in self.records.iter() {
            events::allocated(self.e, &record);
            live.push_back(record);
        }
        storage::put_allocations(self.e, &self.user, &live);

        let created = self.records.len();
        log!(self.e, "allocated", self.user, created);
        created
    }
}

fn combined_total(combo: &CombinedAllocation) -> Result<u64, LedgerError> {
    let total = (combo.medium as u64)
        .checked_mul(MEDIUM_UNIT)
        .and_then(|m| (combo.small as u64).checked_mul(SMALL_UNIT).and_then(|s| m.checked_add(s)))
        .and_then(|t| t.checked_add(combo.commodity))
        .ok_or(LedgerError::InvalidTotal)?;
    if total == 0 || total > DEFAULT_CAPACITY {
        return Err(LedgerError::InvalidTotal);
    }
    Ok(total)
}

pub fn ensure_open(e: &Env) -> Result<(), LedgerError> {
    if storage::allocation_paused(e) {
        return Err(LedgerError::Paused);
    }
    Ok(())
}

/// Applies one instruction. Caller has already checked role and pause flag.
pub fn allocate(
    e: &Env,
    user: Address,
    stake_address: Address,
    node_type: u32,
    quantity: u32,
    amount: u64,
) -> Result<u32, LedgerError> {
    let shape = NodeType::from_tag(node_type).ok_or(LedgerError::InvalidShape)?;
    if shape != NodeType::Commodity && quantity == 0 {
        return Err(LedgerError::InvalidAmount);
    }

    let mut draft = Draft::new(e, user, stake_address);
    match shape {
        NodeType::Whole => draft.whole_nodes(quantity)?,
        NodeType::Medium => draft.units(NodeType::Medium, MEDIUM_UNIT, quantity)?,
        NodeType::Small => draft.units(NodeType::Small, SMALL_UNIT, quantity)?,
        NodeType::Commodity => {
            if amount == 0 || amount > DEFAULT_CAPACITY {
                return Err(LedgerError::InvalidAmount);
            }
            draft.commodity(amount)?
        }
    }
    Ok(draft.commit())
}

pub fn allocate_combined(
    e: &Env,
    user: Address,
    stake_address: Address,
    combo: CombinedAllocation,
) -> Result<u32, LedgerError> {
    let mut draft = Draft::new(e, user, stake_address);
    draft.combined(&combo)?;
    Ok(draft.commit())
}

/// Runs each request on its own; a failed request is reported and skipped.
pub fn allocate_batch(e: &Env, requests: Vec<AllocationRequest>) -> Result<Vec<BatchOutcome>, LedgerError> {
    if requests.len() > MAX_BATCH {
        return Err(LedgerError::BatchTooLarge);
    }

    let mut outcomes = Vec::new(e);
    for (index, req) in requests.iter().enumerate() {
        let outcome = match allocate(e, req.user, req.stake_address, req.node_type, req.quantity, req.amount) {
            Ok(created) => BatchOutcome::Applied(created),
            Err(err) => {
                log!(e, "batch item failed", index as u32, err as u32);
                e.events().publish((Event::BatchItemFailed, index as u32), err as u32);
                BatchOutcome::Failed(err as u32)
            }
        };
        outcomes.push_back(outcome);
    }
    Ok(outcomes)
}

pub fn deallocate(
    e: &Env,
    user: Address,
    stake_address: Address,
    node_type: NodeType,
    amount: u64,
    node_id: u32,
) -> Result<(), LedgerError> {
    let target = AllocationRecord {
        user: user.clone(),
        stake_address: stake_address.clone(),
        node_type,
        amount,
        node_id,
    };
    let mut live = storage::get_allocations(e, &user);
    let index = live.first_index_of(&target).ok_or(LedgerError::RecordNotFound)?;

    let node = storage::get_node(e, node_id).ok_or(LedgerError::NodeNotFound)?;
    let state = storage::get_capacity(e, node_id);
    let next = match (node_type, state) {
        (NodeType::Whole, NodeCapacity::Whole) => NodeCapacity::Open,
        (NodeType::Whole, _) => return Err(LedgerError::RecordNotFound),
        (_, state) => state.release(node.capacity, amount)?,
    };

    live.remove(index);
    storage::put_allocations(e, &user, &live);
    storage::put_capacity(e, node_id, &next);

    log!(e, "deallocated", user, node_id, amount);
    events::deallocated(e, &user, &stake_address, node_type, amount, node_id);
    Ok(())
}

/// Σ amount · SCALE / DEFAULT_CAPACITY over `records`.
pub fn equivalent_of(records: &Vec<AllocationRecord>) -> Result<u64, LedgerError> {
    let mut sum: u128 = 0;
    for r in records.iter() {
        sum += r.amount as u128;
    }
    let scaled = sum * SCALE as u128 / DEFAULT_CAPACITY as u128;
    u64::try_from(scaled).map_err(|_| LedgerError::Overflow)
}

pub fn user_equivalent(e: &Env, user: &Address) -> Result<u64, LedgerError> {
    equivalent_of(&storage::get_allocations(e, user))
}
