multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Proposal — one ballot option within a round
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    /// Opaque identifier, 1..=32 bytes. Immutable once the round opens.
    pub name: ManagedBuffer<M>,
    pub vote_count: u64,
}

// ============================================================
// Voter Record — per-round ballot and delegation target
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct VoterRecord<M: ManagedTypeApi> {
    /// Votes this ballot is worth. 0 until granted; accumulates via delegation.
    pub weight: u64,
    /// Latches true on vote or delegation, never resets within the round.
    pub voted: bool,
    /// Terminal delegate, set only when the record delegated its weight.
    pub delegate: Option<ManagedAddress<M>>,
    /// Chosen proposal index. Meaningful only if voted and delegate is None.
    pub choice: usize,
}

impl<M: ManagedTypeApi> Default for VoterRecord<M> {
    fn default() -> Self {
        VoterRecord {
            weight: 0,
            voted: false,
            delegate: None,
            choice: 0,
        }
    }
}
