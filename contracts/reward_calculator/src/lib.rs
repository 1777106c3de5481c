#![no_std]
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Env, Symbol, Vec
};

const DAY_SECS: u64 = 86_400;
const DAYS_PER_YEAR: u32 = 365;
/// Past this year the reward stays flat.
pub const MAX_YEARS: u32 = 30;
const MAX_BATCH_DAYS: u32 = 366;
/// Largest initial reward the yearly step-down can scale without overflow.
pub const MAX_INITIAL_REWARD: i128 = i128::MAX / 9;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CurveError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidDay = 3,
    InvalidYear = 4,
    InvalidParameters = 5,
}

#[contracttype]
#[derive(Clone)]
enum DataKey {
    InitialReward,
    DeployedAt,
}

fn t_queried() -> Symbol { symbol_short!("queried") }

fn initial_reward(e: &Env) -> Result<i128, CurveError> {
    e.storage().instance().get(&DataKey::InitialReward).ok_or(CurveError::NotInitialized)
}

fn year_of(day: u32) -> u32 {
    (day - 1) / DAYS_PER_YEAR + 1
}

/// Initial reward stepped down 10% per year, truncating at every step.
fn reward_for_year(initial: i128, year: u32) -> i128 {
    let mut r = initial;
    for _ in 1..year.min(MAX_YEARS) {
        r = r * 9 / 10;
    }
    r
}

#[contract]
pub struct DecreasingRewardCalculator;

#[contractimpl]
impl DecreasingRewardCalculator {
    pub fn init(e: Env, initial_reward: i128) -> Result<(), CurveError> {
        // one-time init
        if e.storage().instance().has(&DataKey::DeployedAt) {
            return Err(CurveError::AlreadyInitialized);
        }
        if !(0..=MAX_INITIAL_REWARD).contains(&initial_reward) {
            return Err(CurveError::InvalidParameters);
        }
        e.storage().instance().set(&DataKey::InitialReward, &initial_reward);
        e.storage().instance().set(&DataKey::DeployedAt, &e.ledger().timestamp());
        Ok(())
    }

    pub fn deployed_at(e: Env) -> Result<u64, CurveError> {
        e.storage().instance().get(&DataKey::DeployedAt).ok_or(CurveError::NotInitialized)
    }

    /// 1-based day since deployment; a started day counts as a full one.
    pub fn current_day(e: Env) -> Result<u32, CurveError> {
        let elapsed = e.ledger().timestamp().saturating_sub(Self::deployed_at(e.clone())?);
        let day = elapsed.div_ceil(DAY_SECS).max(1);
        Ok(u32::try_from(day).unwrap_or(u32::MAX))
    }

    pub fn daily_reward(e: Env, day: u32) -> Result<i128, CurveError> {
        if day == 0 {
            return Err(CurveError::InvalidDay);
        }
        let year = year_of(day);
        let reward = reward_for_year(initial_reward(&e)?, year);
        e.events().publish((t_queried(), day), (year, reward));
        Ok(reward)
    }

    /// (reward, day) for today.
    pub fn current_daily_reward(e: Env) -> Result<(i128, u32), CurveError> {
        let day = Self::current_day(e.clone())?;
        Ok((Self::daily_reward(e, day)?, day))
    }

    /// (reward, fixed) where `fixed` marks the flat tail past `MAX_YEARS`.
    pub fn yearly_reward(e: Env, year: u32) -> Result<(i128, bool), CurveError> {
        if year == 0 {
            return Err(CurveError::InvalidYear);
        }
        Ok((reward_for_year(initial_reward(&e)?, year), year > MAX_YEARS))
    }

    pub fn batch_daily_rewards(e: Env, start_day: u32, count: u32) -> Result<Vec<i128>, CurveError> {
        if start_day == 0 || count == 0 || count > MAX_BATCH_DAYS {
            return Err(CurveError::InvalidParameters);
        }
        let initial = initial_reward(&e)?;
        let mut out = Vec::new(&e);
        for day in start_day..start_day.saturating_add(count) {
            out.push_back(reward_for_year(initial, year_of(day)));
        }
        Ok(out)
    }
}
