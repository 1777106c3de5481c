#![no_std]
use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Vec};

mod access;
mod allocation;
mod error;
mod events;
mod ledger;
mod multisig;
mod rewards;
mod storage;
mod types;

pub use error::LedgerError;
pub use rewards::{RewardCurve, RewardCurveClient};
pub use types::*;

use events::Event;

#[contract]
pub struct CapacityLedger;

#[contractimpl]
impl CapacityLedger {
    /// One-time initializer.
    pub fn init(
        e: Env,
        owner: Address,
        token: Address,
        reward_curve: Address,
        signers: Vec<Address>,
        threshold: u32,
    ) -> Result<(), LedgerError> {
        if storage::is_initialized(&e) {
            return Err(LedgerError::AlreadyInitialized);
        }
        let signers = multisig::signer_set(&e, signers, threshold)?;

        storage::put_owner(&e, &owner);
        storage::put_token(&e, &token);
        storage::put_reward_curve(&e, &reward_curve);
        storage::put_signers(&e, &signers);
        storage::put_threshold(&e, threshold);
        storage::put_paused(&e, false, false);
        storage::bump_instance(&e);

        log!(&e, "ledger initialized", owner, threshold);
        Ok(())
    }

    pub fn transfer_ownership(e: Env, caller: Address, new_owner: Address) -> Result<(), LedgerError> {
        access::require_owner(&e, &caller)?;
        storage::put_owner(&e, &new_owner);
        e.events().publish((Event::OwnershipTransferred, caller), new_owner);
        Ok(())
    }

    /// Global switches for the allocation and the reward paths.
    pub fn set_allocation_status(
        e: Env,
        caller: Address,
        pause_allocation: bool,
        pause_rewards: bool,
    ) -> Result<(), LedgerError> {
        access::require_owner(&e, &caller)?;
        storage::put_paused(&e, pause_allocation, pause_rewards);
        e.events().publish((Event::StatusUpdated,), (pause_allocation, pause_rewards));
        Ok(())
    }

    pub fn set_whitelist(e: Env, caller: Address, account: Address, enabled: bool) -> Result<(), LedgerError> {
        access::require_owner(&e, &caller)?;
        ledger::whitelist_set(&e, &account, enabled)
    }

    pub fn create_node(e: Env, caller: Address, descriptor: NodeDescriptor) -> Result<u32, LedgerError> {
        access::require_owner(&e, &caller)?;
        storage::bump_instance(&e);
        ledger::create_node(&e, descriptor)
    }

    pub fn create_nodes(e: Env, caller: Address, descriptors: Vec<NodeDescriptor>) -> Result<Vec<u32>, LedgerError> {
        access::require_owner(&e, &caller)?;
        storage::bump_instance(&e);
        ledger::create_nodes(&e, descriptors)
    }

    /// `paused = true` takes the node out of allocation and rewards.
    pub fn set_node_status(e: Env, caller: Address, node_id: u32, paused: bool) -> Result<(), LedgerError> {
        access::require_owner(&e, &caller)?;
        ledger::set_status(&e, node_id, paused)
    }

    /// Claims capacity for `user`. `node_type`: 1 whole node, 2 medium
    /// (1/5), 3 small (1/20), 4 commodity (`amount` units). Shapes 1-3 take
    /// `quantity` units. Returns the number of records created.
    pub fn allocate(
        e: Env,
        caller: Address,
        user: Address,
        stake_address: Address,
        node_type: u32,
        quantity: u32,
        amount: u64,
    ) -> Result<u32, LedgerError> {
        access::require_allocator(&e, &caller)?;
        allocation::ensure_open(&e)?;
        storage::bump_instance(&e);
        allocation::allocate(&e, user, stake_address, node_type, quantity, amount)
    }

    pub fn allocate_combined(
        e: Env,
        caller: Address,
        user: Address,
        stake_address: Address,
        combination: CombinedAllocation,
    ) -> Result<u32, LedgerError> {
        access::require_allocator(&e, &caller)?;
        allocation::ensure_open(&e)?;
        storage::bump_instance(&e);
        allocation::allocate_combined(&e, user, stake_address, combination)
    }

    /// Up to 20 independent instructions; each one applies fully or not at
    /// all and its outcome is reported at the same index.
    pub fn allocate_batch(
        e: Env,
        caller: Address,
        requests: Vec<AllocationRequest>,
    ) -> Result<Vec<BatchOutcome>, LedgerError> {
        access::require_allocator(&e, &caller)?;
        allocation::ensure_open(&e)?;
        storage::bump_instance(&e);
        allocation::allocate_batch(&e, requests)
    }

    pub fn deallocate(
        e: Env,
        caller: Address,
        user: Address,
        stake_address: Address,
        node_type: NodeType,
        amount: u64,
        node_id: u32,
    ) -> Result<(), LedgerError> {
        access::require_owner(&e, &caller)?;
        allocation::deallocate(&e, user, stake_address, node_type, amount, node_id)
    }

    /// Pays `users` for the reward curve's current day.
    pub fn config_rewards(e: Env, caller: Address, users: Vec<Address>) -> Result<i128, LedgerError> {
        access::require_owner(&e, &caller)?;
        rewards::ensure_open(&e)?;
        let day = rewards::current_day(&e)?;
        rewards::distribute(&e, users, day)
    }

    pub fn config_rewards_for_day(
        e: Env,
        caller: Address,
        users: Vec<Address>,
        day: u32,
    ) -> Result<i128, LedgerError> {
        access::require_owner(&e, &caller)?;
        rewards::ensure_open(&e)?;
        rewards::distribute(&e, users, day)
    }

    pub fn deposit(e: Env, from: Address, amount: i128) -> Result<(), LedgerError> {
        from.require_auth();
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let token = token::Client::new(&e, &storage::get_token(&e)?);
        token.transfer(&from, &e.current_contract_address(), &amount);
        e.events().publish((Event::Deposited, from), amount);
        Ok(())
    }

    pub fn propose_withdrawal(
        e: Env,
        signer: Address,
        token: Option<Address>,
        recipient: Address,
        amount: i128,
    ) -> Result<u32, LedgerError> {
        access::require_signer(&e, &signer)?;
        multisig::propose(&e, signer, token, recipient, amount)
    }

    pub fn confirm_withdrawal(e: Env, signer: Address, proposal_id: u32) -> Result<(), LedgerError> {
        access::require_signer(&e, &signer)?;
        multisig::confirm(&e, signer, proposal_id)
    }

    pub fn execute_withdrawal(e: Env, signer: Address, proposal_id: u32) -> Result<(), LedgerError> {
        access::require_signer(&e, &signer)?;
        multisig::execute(&e, proposal_id)
    }

    pub fn add_signer(e: Env, signer: Address, new_signer: Address) -> Result<(), LedgerError> {
        access::require_signer(&e, &signer)?;
        multisig::add_signer(&e, signer, new_signer)
    }

    pub fn remove_signer(e: Env, signer: Address, old_signer: Address) -> Result<(), LedgerError> {
        access::require_signer(&e, &signer)?;
        multisig::remove_signer(&e, signer, old_signer)
    }

    pub fn owner(e: Env) -> Result<Address, LedgerError> {
        storage::get_owner(&e)
    }

    pub fn node(e: Env, node_id: u32) -> Result<Node, LedgerError> {
        ledger::load(&e, node_id)
    }

    pub fn node_count(e: Env) -> u32 {
        storage::node_count(&e)
    }

    pub fn remaining_capacity(e: Env, node_id: u32) -> Result<u64, LedgerError> {
        ledger::remaining_capacity(&e, node_id)
    }

    pub fn is_whole_node_claimed(e: Env, node_id: u32) -> Result<bool, LedgerError> {
        ledger::is_whole_claimed(&e, node_id)
    }

    pub fn user_allocations(e: Env, user: Address) -> Vec<AllocationRecord> {
        storage::get_allocations(&e, &user)
    }

    /// Held capacity in whole nodes, scaled by `SCALE`.
    pub fn user_equivalent(e: Env, user: Address) -> Result<u64, LedgerError> {
        allocation::user_equivalent(&e, &user)
    }

    pub fn reward_preview(e: Env, user: Address, day: u32) -> Result<i128, LedgerError> {
        rewards::preview(&e, &user, day)
    }

    pub fn is_whitelisted(e: Env, account: Address) -> bool {
        storage::get_whitelist(&e).contains(&account)
    }

    pub fn whitelist_count(e: Env) -> u32 {
        storage::get_whitelist(&e).len()
    }

    pub fn allocation_paused(e: Env) -> bool {
        storage::allocation_paused(&e)
    }

    pub fn rewards_paused(e: Env) -> bool {
        storage::rewards_paused(&e)
    }

    pub fn withdrawal_proposal(e: Env, proposal_id: u32) -> Result<WithdrawalProposal, LedgerError> {
        storage::get_proposal(&e, proposal_id)
    }

    pub fn signers(e: Env) -> Vec<Address> {
        storage::get_signers(&e)
    }

    pub fn threshold(e: Env) -> u32 {
        storage::get_threshold(&e)
    }

    pub fn balance(e: Env) -> Result<i128, LedgerError> {
        let token = token::Client::new(&e, &storage::get_token(&e)?);
        Ok(token.balance(&e.current_contract_address()))
    }
}
