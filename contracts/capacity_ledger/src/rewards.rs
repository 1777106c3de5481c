//! Reward distribution proportional to capacity-equivalent.
use soroban_sdk::{contractclient, log, token, Address, Env, Map, Vec};

use crate::error::LedgerError;
use crate::events;
use crate::ledger;
use crate::storage;
use crate::types::{DEFAULT_CAPACITY, SCALE};

/// Any contract serving a daily reward curve.
#[contractclient(name = "RewardCurveClient")]
pub trait RewardCurve {
    /// Reward per whole-node equivalent for `day` (1-based).
    fn daily_reward(e: Env, day: u32) -> i128;
    fn current_day(e: Env) -> u32;
}

pub fn ensure_open(e: &Env) -> Result<(), LedgerError> {
    if storage::rewards_paused(e) {
        return Err(LedgerError::Paused);
    }
    Ok(())
}

pub fn current_day(e: &Env) -> Result<u32, LedgerError> {
    let curve = storage::get_reward_curve(e)?;
    Ok(RewardCurveClient::new(e, &curve).current_day())
}

fn daily_rate(e: &Env, day: u32) -> Result<i128, LedgerError> {
    if day == 0 {
        return Err(LedgerError::InvalidDay);
    }
    let curve = storage::get_reward_curve(e)?;
    Ok(RewardCurveClient::new(e, &curve).daily_reward(&day))
}

/// Owed amount per stake address for one user at `rate`. Records on paused
/// nodes don't count.
fn owed_by_destination(e: &Env, user: &Address, rate: i128) -> Result<Map<Address, i128>, LedgerError> {
    let mut claimed: Map<Address, u64> = Map::new(e);
    for record in storage::get_allocations(e, user).iter() {
        if !ledger::is_active(e, record.node_id) {
            continue;
        }
        let sum = claimed.get(record.stake_address.clone()).unwrap_or(0);
        claimed.set(record.stake_address, sum.checked_add(record.amount).ok_or(LedgerError::Overflow)?);
    }
    if claimed.is_empty() {
        return Err(LedgerError::NoActiveAllocations);
    }

    let mut owed = Map::new(e);
    for (stake, amount) in claimed.iter() {
        let equivalent = amount as i128 * SCALE as i128 / DEFAULT_CAPACITY as i128;
        let due = rate
            .checked_mul(equivalent)
            .ok_or(LedgerError::Overflow)?
            / SCALE as i128;
        owed.set(stake, due);
    }
    Ok(owed)
}

pub fn preview(e: &Env, user: &Address, day: u32) -> Result<i128, LedgerError> {
    let rate = daily_rate(e, day)?;
    let owed = owed_by_destination(e, user, rate)?;
    Ok(owed.values().iter().sum())
}

/// Pays every user their share for `day`. Any user without active records
/// aborts the whole call. Returns the total paid out.
pub fn distribute(e: &Env, users: Vec<Address>, day: u32) -> Result<i128, LedgerError> {
    let rate = daily_rate(e, day)?;

    let mut plan: Vec<(Address, Map<Address, i128>)> = Vec::new(e);
    let mut total: i128 = 0;
    for user in users.iter() {
        let owed = owed_by_destination(e, &user, rate)?;
        for due in owed.values().iter() {
            total = total.checked_add(due).ok_or(LedgerError::Overflow)?;
        }
        plan.push_back((user, owed));
    }

    let token_addr = storage::get_token(e)?;
    let token = token::Client::new(e, &token_addr);
    let me = e.current_contract_address();
    if token.balance(&me) < total {
        return Err(LedgerError::InsufficientBalance);
    }

    for (user, owed) in plan.iter() {
        let mut paid: i128 = 0;
        for (stake, due) in owed.iter() {
            events::reward_distributed(e, &user, &stake, due, day);
            paid += due;
        }
        if paid > 0 {
            token.transfer(&me, &user, &paid);
        }
        log!(e, "reward paid", user, paid, day);
    }
    Ok(total)
}
