use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LedgerError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    DuplicateKey = 4,
    NodeNotFound = 5,
    NodeLimitReached = 6,
    InvalidShape = 7,
    InvalidAmount = 8,
    InvalidTotal = 9,
    InvalidDay = 10,
    InsufficientCapacity = 11,
    Paused = 12,
    BatchTooLarge = 13,
    RecordNotFound = 14,
    NoActiveAllocations = 15,
    NotEnoughConfirmations = 16,
    AlreadyExecuted = 17,
    ProposalNotFound = 18,
    SignerExists = 20,
    SignerNotFound = 21,
    InvalidThreshold = 22,
    InsufficientBalance = 23,
    Overflow = 24,
}
