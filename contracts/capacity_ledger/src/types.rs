use soroban_sdk::{contracttype, Address, String, Vec};

/// Allocatable units on a freshly created node.
pub const DEFAULT_CAPACITY: u64 = 1_000_000;
/// Fixed-point multiplier for equivalence figures.
pub const SCALE: u64 = 1_000_000;
pub const MEDIUM_UNIT: u64 = DEFAULT_CAPACITY / 5;
pub const SMALL_UNIT: u64 = DEFAULT_CAPACITY / 20;

pub const MAX_WHITELIST: u32 = 3;
pub const MAX_BATCH: u32 = 20;
pub const MAX_NODES: u32 = 2000;

/// Caller-supplied part of a node; the ledger fills in the rest.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeDescriptor {
    pub ip: String,
    pub name: String,
    pub description: String,
    pub stake_address: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub id: u32,
    pub ip: String,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub capacity: u64,
    pub stake_address: Address,
    pub created_at: u64,      // unix seconds
    pub created_height: u32,  // ledger sequence
}

/// Claim state of a single node.
///
/// `Whole` is kept apart from `Partial(0)`: a node packed full by fractions
/// can be topped up again once one of them is released, a whole-node claim
/// only through its own deallocation.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeCapacity {
    Open,
    Partial(u64),
    Whole,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum NodeType {
    Whole = 1,
    Medium = 2,
    Small = 3,
    Commodity = 4,
}

impl NodeType {
    pub fn from_tag(tag: u32) -> Option<NodeType> {
        match tag {
            1 => Some(NodeType::Whole),
            2 => Some(NodeType::Medium),
            3 => Some(NodeType::Small),
            4 => Some(NodeType::Commodity),
            _ => None,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocationRecord {
    pub user: Address,
    pub stake_address: Address,
    pub node_type: NodeType,
    pub amount: u64,
    pub node_id: u32,
}

/// One instruction of `allocate_batch`. `quantity` drives shapes 1-3,
/// `amount` the commodity shape.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocationRequest {
    pub user: Address,
    pub stake_address: Address,
    pub node_type: u32,
    pub quantity: u32,
    pub amount: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CombinedAllocation {
    pub medium: u32,
    pub small: u32,
    pub commodity: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BatchOutcome {
    Applied(u32),  // records created
    Failed(u32),   // LedgerError code
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalProposal {
    pub id: u32,
    pub proposer: Address,
    pub token: Address,
    pub recipient: Address,
    pub amount: i128,
    pub executed: bool,
    pub confirmations: Vec<Address>,
}
