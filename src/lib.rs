#![no_std]

multiversx_sc::imports!();

pub mod ballot_proxy;
pub mod types;

use types::{Proposal, VoterRecord};

// ============================================================
// Constants
// ============================================================

/// Weight granted to a voter by the chairperson (and to the
/// chairperson itself in the opening round)
const GRANTED_VOTE_WEIGHT: u64 = 1;

/// Proposal names are opaque identifiers of at most 32 bytes
const MAX_PROPOSAL_NAME_LEN: usize = 32;

// ============================================================
// Contract
// ============================================================

#[multiversx_sc::contract]
pub trait RoundBallot {
    // ========================================================
    // Init / Upgrade
    // ========================================================

    /// The deployer becomes both owner and chairperson, round 0 opens
    /// with the given proposals, and the chairperson receives its
    /// weight-1 ballot for round 0 only.
    #[init]
    fn init(&self, proposal_names: MultiValueEncoded<ManagedBuffer>) {
        let caller = self.blockchain().get_caller();
        self.owner().set(&caller);
        self.chairperson().set(&caller);
        self.current_round().set(0u64);

        let proposal_count = self.store_round_proposals(0, proposal_names);

        let record = VoterRecord {
            weight: GRANTED_VOTE_WEIGHT,
            ..VoterRecord::default()
        };
        self.voters(0, &caller).set(&record);
        self.round_voters(0).insert(caller.clone());

        self.right_granted_event(0, &caller);
        self.round_opened_event(0, proposal_count);
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINT: grantRight
    // Chairperson hands out one weight-1 ballot per voter per round.
    // ========================================================

    #[endpoint(grantRight)]
    fn grant_right(&self, voter: ManagedAddress) {
        let caller = self.blockchain().get_caller();
        require!(
            caller == self.chairperson().get(),
            "Only the chairperson may grant voting rights"
        );

        let round = self.current_round().get();
        let mut record = self.voter_record(round, &voter);
        require!(!record.voted, "Already voted");
        require!(record.weight == 0, "Voter already has the right to vote");

        record.weight = GRANTED_VOTE_WEIGHT;
        self.voters(round, &voter).set(&record);
        self.round_voters(round).insert(voter.clone());

        self.right_granted_event(round, &voter);
    }

    // ========================================================
    // ENDPOINT: delegate
    // Irrevocably hands the caller's weight to another voter for the
    // rest of the round. The recorded delegate is the terminal of the
    // target's own delegation chain, not the argument verbatim.
    // ========================================================

    #[endpoint(delegate)]
    fn delegate(&self, to: ManagedAddress) {
        let caller = self.blockchain().get_caller();
        let round = self.current_round().get();

        let mut sender = self.voter_record(round, &caller);
        require!(!sender.voted, "Already voted");
        require!(to != caller, "Self-delegation is disallowed");

        // Resolve the terminal delegate before touching any state.
        // Committed delegations are acyclic, so an honest chain never
        // visits more records than the round's ledger holds.
        let max_hops = self.round_voters(round).len();
        let mut hops = 0usize;
        let mut terminal = to;
        loop {
            let next = match self.voter_record(round, &terminal).delegate {
                Some(next) => next,
                None => break,
            };
            require!(next != caller, "Delegation loop detected");
            hops += 1;
            require!(hops <= max_hops, "Delegation loop detected");
            terminal = next;
        }

        sender.voted = true;
        sender.delegate = Some(terminal.clone());
        self.voters(round, &caller).set(&sender);
        self.round_voters(round).insert(caller.clone());

        let mut target = self.voter_record(round, &terminal);
        if target.voted {
            // Terminal already voted: count the weight on its proposal now.
            self.add_to_proposal(round, target.choice, sender.weight);
        } else {
            // Weight accumulates for the terminal's future vote or delegation.
            target.weight += sender.weight;
            self.voters(round, &terminal).set(&target);
            self.round_voters(round).insert(terminal.clone());
        }

        self.vote_delegated_event(round, &caller, &terminal, sender.weight);
    }

    // ========================================================
    // ENDPOINT: vote
    // ========================================================

    #[endpoint(vote)]
    fn vote(&self, proposal_index: usize) {
        let caller = self.blockchain().get_caller();
        let round = self.current_round().get();

        let mut record = self.voter_record(round, &caller);
        require!(record.weight > 0, "No right to vote");
        require!(!record.voted, "Already voted");
        require!(
            proposal_index < self.proposals(round).len(),
            "Invalid proposal index"
        );

        record.voted = true;
        record.choice = proposal_index;
        self.voters(round, &caller).set(&record);
        self.add_to_proposal(round, proposal_index, record.weight);

        self.vote_cast_event(round, &caller, proposal_index, record.weight);
    }

    // ========================================================
    // ENDPOINT: confirmWinner
    // Freezes the round's result. Happens at most once per round and
    // is what unlocks opening the next round's proposals.
    // ========================================================

    #[endpoint(confirmWinner)]
    fn confirm_winner(&self) {
        self.require_admin();

        let round = self.current_round().get();
        require!(
            self.round_winner(round).is_empty(),
            "Winner already confirmed"
        );

        let winning = self.winning_proposal();
        let name = self.proposals(round).get(winning + 1).name;
        self.round_winner(round).set(&name);

        self.winner_confirmed_event(round, winning, &name);
    }

    // ========================================================
    // ENDPOINT: openNextRound
    // Gated on the current round's confirmed winner. Every round
    // starts with an empty ledger; rights must be granted anew.
    // ========================================================

    #[endpoint(openNextRound)]
    fn open_next_round(&self, proposal_names: MultiValueEncoded<ManagedBuffer>) {
        let caller = self.blockchain().get_caller();
        require!(
            caller == self.chairperson().get(),
            "Only the chairperson may open a new round"
        );

        let round = self.current_round().get();
        require!(
            !self.round_winner(round).is_empty(),
            "Previous round winner not confirmed"
        );

        let next = round + 1;
        let proposal_count = self.store_round_proposals(next, proposal_names);
        self.current_round().set(next);

        self.round_opened_event(next, proposal_count);
    }

    // ========================================================
    // ENDPOINTS: role transfer
    // ========================================================

    #[endpoint(setChairperson)]
    fn set_chairperson(&self, new_chairperson: ManagedAddress) {
        self.require_admin();
        let previous = self.chairperson().get();
        self.chairperson().set(&new_chairperson);
        self.chairperson_set_event(&previous, &new_chairperson);
    }

    #[endpoint(setOwner)]
    fn set_owner(&self, new_owner: ManagedAddress) {
        self.require_admin();
        let previous = self.owner().get();
        self.owner().set(&new_owner);
        self.owner_set_event(&previous, &new_owner);
    }

    // ========================================================
    // INTERNAL
    // ========================================================

    fn require_admin(&self) {
        let caller = self.blockchain().get_caller();
        require!(
            caller == self.owner().get() || caller == self.chairperson().get(),
            "Caller is not an admin"
        );
    }

    /// Stored record for `(round, address)`, or the zero-weight default
    /// if the address has no entry in that round's ledger.
    fn voter_record(&self, round: u64, address: &ManagedAddress) -> VoterRecord<Self::Api> {
        let mapper = self.voters(round, address);
        if mapper.is_empty() {
            VoterRecord::default()
        } else {
            mapper.get()
        }
    }

    fn store_round_proposals(
        &self,
        round: u64,
        proposal_names: MultiValueEncoded<ManagedBuffer>,
    ) -> usize {
        for name in proposal_names {
            // An empty name would make the confirmed-winner slot for the
            // round indistinguishable from an unconfirmed one.
            require!(
                !name.is_empty() && name.len() <= MAX_PROPOSAL_NAME_LEN,
                "Invalid proposal name"
            );
            self.proposals(round).push(&Proposal {
                name,
                vote_count: 0,
            });
        }
        self.proposals(round).len()
    }

    fn add_to_proposal(&self, round: u64, index: usize, weight: u64) {
        let mut proposal = self.proposals(round).get(index + 1);
        proposal.vote_count += weight;
        self.proposals(round).set(index + 1, &proposal);
    }

    // ========================================================
    // VIEWS — read-only queries
    // ========================================================

    /// Leading proposal of the current round. Scans in index order and
    /// moves only on a strictly greater count, so the lowest index wins
    /// ties; with no votes at all, index 0 is the winner.
    #[view(winningProposal)]
    fn winning_proposal(&self) -> usize {
        let round = self.current_round().get();
        let count = self.proposals(round).len();
        require!(count > 0, "Invalid proposal index");

        let mut winning = 0usize;
        let mut max_count = 0u64;
        for i in 1..=count {
            let proposal = self.proposals(round).get(i);
            if proposal.vote_count > max_count {
                max_count = proposal.vote_count;
                winning = i - 1;
            }
        }
        winning
    }

    #[view(winnerName)]
    fn winner_name(&self) -> ManagedBuffer {
        let round = self.current_round().get();
        let winning = self.winning_proposal();
        self.proposals(round).get(winning + 1).name
    }

    /// Queries carry no meaningful caller, so admin status is checked
    /// for an explicit address.
    #[view(isAdmin)]
    fn is_admin(&self, address: ManagedAddress) -> bool {
        address == self.owner().get() || address == self.chairperson().get()
    }

    #[view(getCurrentRound)]
    fn get_current_round(&self) -> u64 {
        self.current_round().get()
    }

    #[view(winnerOf)]
    fn winner_of(&self, round: u64) -> OptionalValue<ManagedBuffer> {
        let mapper = self.round_winner(round);
        if mapper.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(mapper.get())
        }
    }

    #[view(getProposal)]
    fn get_proposal(&self, round: u64, index: usize) -> Proposal<Self::Api> {
        require!(
            index < self.proposals(round).len(),
            "Invalid proposal index"
        );
        self.proposals(round).get(index + 1)
    }

    #[view(getProposals)]
    fn get_proposals(&self, round: u64) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        let count = self.proposals(round).len();
        for i in 1..=count {
            result.push(self.proposals(round).get(i));
        }
        result
    }

    #[view(getVoter)]
    fn get_voter(&self, round: u64, address: ManagedAddress) -> VoterRecord<Self::Api> {
        self.voter_record(round, &address)
    }

    #[view(hasVoted)]
    fn has_voted(&self, round: u64, address: ManagedAddress) -> bool {
        self.voter_record(round, &address).voted
    }

    #[view(getVoterCount)]
    fn get_voter_count(&self, round: u64) -> usize {
        self.round_voters(round).len()
    }

    #[view(getChairperson)]
    fn get_chairperson(&self) -> ManagedAddress {
        self.chairperson().get()
    }

    #[view(getOwner)]
    fn get_owner(&self) -> ManagedAddress {
        self.owner().get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("roundOpened")]
    fn round_opened_event(&self, #[indexed] round: u64, proposal_count: usize);

    #[event("rightGranted")]
    fn right_granted_event(&self, #[indexed] round: u64, #[indexed] voter: &ManagedAddress);

    #[event("voteCast")]
    fn vote_cast_event(
        &self,
        #[indexed] round: u64,
        #[indexed] voter: &ManagedAddress,
        #[indexed] proposal_index: usize,
        weight: u64,
    );

    #[event("voteDelegated")]
    fn vote_delegated_event(
        &self,
        #[indexed] round: u64,
        #[indexed] from: &ManagedAddress,
        #[indexed] to: &ManagedAddress,
        weight: u64,
    );

    #[event("winnerConfirmed")]
    fn winner_confirmed_event(
        &self,
        #[indexed] round: u64,
        #[indexed] proposal_index: usize,
        name: &ManagedBuffer,
    );

    #[event("chairpersonSet")]
    fn chairperson_set_event(
        &self,
        #[indexed] previous: &ManagedAddress,
        #[indexed] new_chairperson: &ManagedAddress,
    );

    #[event("ownerSet")]
    fn owner_set_event(
        &self,
        #[indexed] previous: &ManagedAddress,
        #[indexed] new_owner: &ManagedAddress,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    // ── Roles ──

    #[storage_mapper("owner")]
    fn owner(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("chairperson")]
    fn chairperson(&self) -> SingleValueMapper<ManagedAddress>;

    // ── Round registry ──

    #[storage_mapper("currentRound")]
    fn current_round(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, round: u64) -> VecMapper<Proposal<Self::Api>>;

    /// Confirmed winner name; empty while the round is unconfirmed.
    #[storage_mapper("roundWinner")]
    fn round_winner(&self, round: u64) -> SingleValueMapper<ManagedBuffer>;

    // ── Voter ledger ──

    #[storage_mapper("voters")]
    fn voters(
        &self,
        round: u64,
        address: &ManagedAddress,
    ) -> SingleValueMapper<VoterRecord<Self::Api>>;

    /// Every address with a stored record in the round; bounds the
    /// delegation walk.
    #[storage_mapper("roundVoters")]
    fn round_voters(&self, round: u64) -> UnorderedSetMapper<ManagedAddress>;
}
