#![no_std]

//! # Lucky Survivor
//!
//! A round-based elimination game. Whitelisted players join a pending
//! game; once started, each round walks the same cycle:
//!
//! 1. **SELECTION** — every active player holds one slot (their "bao")
//!    and may keep it or give it to another active player. Players who
//!    never act implicitly keep their own slot.
//! 2. **REVEALING** — the administrator triggers the bomb reveal. The
//!    ledger PRNG draws `min(elimination_count, active - 1)` slots
//!    without replacement; each drawn slot eliminates its *effective
//!    holder* (the recorded bao target, defaulting to the slot owner).
//!    Victims are credited the round's consolation prize in the vault.
//! 3. **VOTING** — survivors vote STOP or CONTINUE (one shot each).
//!    STOP with more votes than CONTINUE ends the game and splits the
//!    unreserved prize pool equally among survivors; otherwise the next
//!    round begins.
//!
//! `elimination_count` is fixed at `start_game` as a quarter of the
//! initial roster and never recomputed, so late rounds clamp against the
//! shrinking pool. A reveal that leaves a single survivor ends the game
//! immediately and awards that survivor the remaining pool.
//!
//! Funds live in the prize-vault contract; join eligibility comes from
//! the whitelist contract. Both are reached through contract clients and
//! are configured by the administrator.

use soroban_sdk::{
    contract, contractclient, contracterror, contractevent, contractimpl, contracttype, Address,
    Env, Map, String, Vec,
};

// ═══════════════════════════════════════════════════════════════════════════════
//  External trait interfaces
// ═══════════════════════════════════════════════════════════════════════════════

/// Identity gateway: resolves invite codes to the registered owner.
#[contractclient(name = "GatewayClient")]
pub trait InviteGateway {
    fn lookup_code(env: Env, code: u64) -> Option<Address>;
}

/// Prize escrow. `credit` reserves a claimable amount for a beneficiary;
/// `get_unreserved` reports the pool not yet promised to anyone.
#[contractclient(name = "VaultClient")]
pub trait PrizeVault {
    fn credit(env: Env, beneficiary: Address, asset: Address, amount: i128);

    fn get_unreserved(env: Env, asset: Address) -> i128;
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GameError {
    AdminNotSet = 1,
    WhitelistNotSet = 2,
    VaultNotSet = 3,
    PrizeAssetNotSet = 4,
    GameNotInitialized = 5,
    WrongPhase = 6,
    NotEnoughPlayers = 7,
    PrizeScheduleNotSet = 8,
    InvalidInviteCode = 9,
    PlayerAlreadyJoined = 10,
    PlayerNotJoined = 11,
    PlayerNotActive = 12,
    TargetNotActive = 13,
    PlayerAlreadyVoted = 14,
    InvalidVoteChoice = 15,
    InvalidRound = 16,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Game status (compact u32 encoding for storage efficiency)
// ═══════════════════════════════════════════════════════════════════════════════

pub type GameStatus = u32;

pub const STATUS_PENDING: GameStatus = 0;
pub const STATUS_SELECTION: GameStatus = 1;
pub const STATUS_REVEALING: GameStatus = 2;
pub const STATUS_VOTING: GameStatus = 3;
pub const STATUS_ENDED: GameStatus = 4;

pub type VoteChoice = u32;

pub const VOTE_STOP: VoteChoice = 0;
pub const VOTE_CONTINUE: VoteChoice = 1;

// ═══════════════════════════════════════════════════════════════════════════════
//  Events
// ═══════════════════════════════════════════════════════════════════════════════

#[contractevent]
pub struct EvPlayerJoined {
    pub player: Address,
    pub display_name: String,
}

#[contractevent]
pub struct EvGameStarted {
    pub player_count: u32,
    pub elimination_count: u32,
}

#[contractevent]
pub struct EvBaoChosen {
    pub player: Address,
    pub target: Address,
}

#[contractevent]
pub struct EvSelectionFinalized {
    pub round: u32,
}

#[contractevent]
pub struct EvBombsRevealed {
    pub round: u32,
    pub victim_count: u32,
    pub survivor_count: u32,
}

#[contractevent]
pub struct EvVoteCast {
    pub player: Address,
    pub choice: u32,
}

#[contractevent]
pub struct EvVotingFinalized {
    pub round: u32,
    pub stop_count: u32,
    pub continue_count: u32,
    pub stopped: bool,
}

#[contractevent]
pub struct EvGameEnded {
    pub round: u32,
    pub survivor_count: u32,
    pub pool_paid: i128,
}

#[contractevent]
pub struct EvGameReset {
    pub generation: u32,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Game state & storage keys
// ═══════════════════════════════════════════════════════════════════════════════

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlayerRecord {
    pub address: Address,
    pub display_name: String,
    pub active: bool,
    pub acted_this_phase: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameInstance {
    pub status: u32,
    pub round: u32,
    pub elimination_count: u32,
    /// Bumped on every reset; versions the singleton record across runs.
    pub generation: u32,
    pub players: Vec<PlayerRecord>,
    pub round_victims: Vec<Address>,
    pub round_selections: Map<Address, Address>,
    pub votes: Map<Address, u32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VotingState {
    pub stop_count: u32,
    pub continue_count: u32,
    pub missing_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundPrizes {
    pub consolation: i128,
    pub remaining_pool: i128,
}

#[contracttype]
#[derive(Clone)]
enum StorageKey {
    Admin,
    WhitelistAddress,
    VaultAddress,
    PrizeAsset,
    Game,
    PrizeSchedule,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// The reveal formula needs at least one survivor besides the victims.
const MIN_PLAYERS: u32 = 2;

/// A quarter of the initial roster is eliminated per round.
const ELIMINATION_DIVISOR: u32 = 4;

// Ledger rate is approximately 5 seconds per ledger on Stellar
const LEDGER_RATE_SECS: u32 = 5;

// TTL expressed in human-readable time units (30 days)
const TTL_SECONDS: u32 = 30 * 24 * 60 * 60;
const GAME_TTL_LEDGERS: u32 = TTL_SECONDS / LEDGER_RATE_SECS;

// ═══════════════════════════════════════════════════════════════════════════════
//  Contract
// ═══════════════════════════════════════════════════════════════════════════════

#[contract]
pub struct SurvivorGame;

#[contractimpl]
impl SurvivorGame {
    pub fn __constructor(
        env: Env,
        admin: Address,
        whitelist: Address,
        vault: Address,
        prize_asset: Address,
    ) {
        env.storage().instance().set(&StorageKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&StorageKey::WhitelistAddress, &whitelist);
        env.storage().instance().set(&StorageKey::VaultAddress, &vault);
        env.storage().instance().set(&StorageKey::PrizeAsset, &prize_asset);
        Self::write_game(&env, &Self::fresh_game(&env, 0));
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Player surface (sponsored entry calls)
    // ───────────────────────────────────────────────────────────────────────────

    /// Join the pending game. The invite code must resolve to the joining
    /// player in the whitelist gateway.
    pub fn join_game(
        env: Env,
        player: Address,
        invite_code: u64,
        display_name: String,
    ) -> Result<(), GameError> {
        player.require_auth();

        let mut game = Self::read_game(&env)?;
        if game.status != STATUS_PENDING {
            return Err(GameError::WrongPhase);
        }

        let gateway = GatewayClient::new(&env, &Self::load_whitelist(&env)?);
        match gateway.lookup_code(&invite_code) {
            Some(ref owner) if *owner == player => {}
            _ => return Err(GameError::InvalidInviteCode),
        }

        if Self::find_player(&game, &player).is_some() {
            return Err(GameError::PlayerAlreadyJoined);
        }

        game.players.push_back(PlayerRecord {
            address: player.clone(),
            display_name: display_name.clone(),
            active: true,
            acted_this_phase: false,
        });

        EvPlayerJoined {
            player,
            display_name,
        }
        .publish(&env);

        Self::write_game(&env, &game);
        Ok(())
    }

    /// Record the caller's bao target for this round. The target may be the
    /// caller (keep) or any other active player (give). Re-invoking before
    /// `finalize_selection` overwrites the prior choice.
    pub fn choose_bao(env: Env, player: Address, target: Address) -> Result<(), GameError> {
        player.require_auth();

        let mut game = Self::read_game(&env)?;
        if game.status != STATUS_SELECTION {
            return Err(GameError::WrongPhase);
        }

        let idx = Self::find_player(&game, &player).ok_or(GameError::PlayerNotJoined)?;
        let mut record = game.players.get(idx).ok_or(GameError::PlayerNotJoined)?;
        if !record.active {
            return Err(GameError::PlayerNotActive);
        }

        let target_idx = Self::find_player(&game, &target).ok_or(GameError::TargetNotActive)?;
        let target_record = game.players.get(target_idx).ok_or(GameError::TargetNotActive)?;
        if !target_record.active {
            return Err(GameError::TargetNotActive);
        }

        game.round_selections.set(player.clone(), target.clone());
        record.acted_this_phase = true;
        game.players.set(idx, record);

        EvBaoChosen { player, target }.publish(&env);

        Self::write_game(&env, &game);
        Ok(())
    }

    /// Cast a STOP/CONTINUE vote. One shot: voting twice fails, unlike the
    /// overwritable bao selection.
    pub fn vote(env: Env, player: Address, choice: u32) -> Result<(), GameError> {
        player.require_auth();

        let mut game = Self::read_game(&env)?;
        if game.status != STATUS_VOTING {
            return Err(GameError::WrongPhase);
        }
        if choice > VOTE_CONTINUE {
            return Err(GameError::InvalidVoteChoice);
        }

        let idx = Self::find_player(&game, &player).ok_or(GameError::PlayerNotJoined)?;
        let mut record = game.players.get(idx).ok_or(GameError::PlayerNotJoined)?;
        if !record.active {
            return Err(GameError::PlayerNotActive);
        }
        if game.votes.contains_key(player.clone()) {
            return Err(GameError::PlayerAlreadyVoted);
        }

        game.votes.set(player.clone(), choice);
        record.acted_this_phase = true;
        game.players.set(idx, record);

        EvVoteCast { player, choice }.publish(&env);

        Self::write_game(&env, &game);
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Administrator surface (self-paid entry calls)
    // ───────────────────────────────────────────────────────────────────────────

    /// Set the per-round consolation schedule. The last entry repeats for
    /// rounds beyond the schedule length. Only allowed before the game
    /// starts; required before `start_game`.
    pub fn set_prize_schedule(env: Env, schedule: Vec<i128>) -> Result<(), GameError> {
        Self::require_admin(&env)?;

        let game = Self::read_game(&env)?;
        if game.status != STATUS_PENDING {
            return Err(GameError::WrongPhase);
        }
        if schedule.is_empty() {
            return Err(GameError::PrizeScheduleNotSet);
        }

        env.storage()
            .instance()
            .set(&StorageKey::PrizeSchedule, &schedule);
        Ok(())
    }

    /// Start the game: fixes `elimination_count` at a quarter of the
    /// roster for the whole run and opens round 1's selection phase.
    pub fn start_game(env: Env) -> Result<(), GameError> {
        Self::require_admin(&env)?;

        let mut game = Self::read_game(&env)?;
        if game.status != STATUS_PENDING {
            return Err(GameError::WrongPhase);
        }
        let player_count = game.players.len();
        if player_count < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        if !env.storage().instance().has(&StorageKey::PrizeSchedule) {
            return Err(GameError::PrizeScheduleNotSet);
        }

        game.round = 1;
        game.elimination_count = player_count / ELIMINATION_DIVISOR;
        game.status = STATUS_SELECTION;

        EvGameStarted {
            player_count,
            elimination_count: game.elimination_count,
        }
        .publish(&env);

        Self::write_game(&env, &game);
        Ok(())
    }

    /// Close the selection phase. Players who never acted keep their own
    /// slot implicitly, so no quorum is required.
    pub fn finalize_selection(env: Env) -> Result<(), GameError> {
        Self::require_admin(&env)?;

        let mut game = Self::read_game(&env)?;
        if game.status != STATUS_SELECTION {
            return Err(GameError::WrongPhase);
        }

        game.status = STATUS_REVEALING;
        Self::clear_acted_flags(&mut game);

        EvSelectionFinalized { round: game.round }.publish(&env);

        Self::write_game(&env, &game);
        Ok(())
    }

    /// Reveal the bombs: draw victims, deactivate them, credit their
    /// consolation prizes, and move on to voting — or end the game when a
    /// single survivor remains.
    pub fn reveal_bombs(env: Env) -> Result<(), GameError> {
        Self::require_admin(&env)?;

        let mut game = Self::read_game(&env)?;
        if game.status != STATUS_REVEALING {
            return Err(GameError::WrongPhase);
        }

        // Slots of the currently active roster, shuffled by the ledger
        // PRNG (Fisher-Yates). The draw is uniform without replacement
        // and replayable from the ledger seed.
        let mut order: Vec<u32> = Vec::new(&env);
        let mut i: u32 = 0;
        while i < game.players.len() {
            let record = game.players.get(i).unwrap();
            if record.active {
                order.push_back(i);
            }
            i += 1;
        }
        let active_before = order.len();
        let target_count = core::cmp::min(game.elimination_count, active_before - 1);

        let mut idx = order.len();
        while idx > 1 {
            idx -= 1;
            let j = env.prng().gen_range::<u64>(0..=(idx as u64)) as u32;
            let a = order.get(idx).unwrap();
            let b = order.get(j).unwrap();
            order.set(idx, b);
            order.set(j, a);
        }

        // Walk the shuffled slots; each eliminates its effective holder
        // (the slot owner's bao target, defaulting to the owner). A holder
        // already drawn this reveal is skipped and the walk continues.
        let mut victims: Vec<Address> = Vec::new(&env);
        let mut w: u32 = 0;
        while w < order.len() && victims.len() < target_count {
            let owner_idx = order.get(w).unwrap();
            let owner = game.players.get(owner_idx).ok_or(GameError::PlayerNotJoined)?.address;
            let holder = game
                .round_selections
                .get(owner.clone())
                .unwrap_or(owner);
            let holder_idx =
                Self::find_player(&game, &holder).ok_or(GameError::PlayerNotJoined)?;
            let mut record = game.players.get(holder_idx).ok_or(GameError::PlayerNotJoined)?;
            if record.active {
                record.active = false;
                game.players.set(holder_idx, record);
                victims.push_back(holder);
            }
            w += 1;
        }

        let vault = VaultClient::new(&env, &Self::load_vault(&env)?);
        let asset = Self::load_prize_asset(&env)?;
        let consolation = Self::consolation_for_round(&env, game.round)?;
        if consolation > 0 {
            for victim in victims.iter() {
                vault.credit(&victim, &asset, &consolation);
            }
        }

        let victim_count = victims.len();
        let survivor_count = active_before - victim_count;
        game.round_victims = victims;
        game.round_selections = Map::new(&env);
        Self::clear_acted_flags(&mut game);

        if survivor_count <= 1 {
            // Sole survivor takes the rest of the pool; no vote needed.
            let pool = vault.get_unreserved(&asset);
            if pool > 0 {
                let mut s: u32 = 0;
                while s < game.players.len() {
                    let record = game.players.get(s).unwrap();
                    if record.active {
                        vault.credit(&record.address, &asset, &pool);
                        break;
                    }
                    s += 1;
                }
            }
            game.status = STATUS_ENDED;

            EvGameEnded {
                round: game.round,
                survivor_count,
                pool_paid: pool,
            }
            .publish(&env);
        } else {
            game.votes = Map::new(&env);
            game.status = STATUS_VOTING;
        }

        EvBombsRevealed {
            round: game.round,
            victim_count,
            survivor_count,
        }
        .publish(&env);

        Self::write_game(&env, &game);
        Ok(())
    }

    /// Tally the votes. STOP must strictly outnumber CONTINUE to end the
    /// game; missing votes abstain and ties continue. On STOP the
    /// unreserved pool is split by floor division among the survivors.
    pub fn finalize_voting(env: Env) -> Result<(), GameError> {
        Self::require_admin(&env)?;

        let mut game = Self::read_game(&env)?;
        if game.status != STATUS_VOTING {
            return Err(GameError::WrongPhase);
        }

        let (stop_count, continue_count) = Self::tally(&game);
        let stopped = stop_count > continue_count;
        let round = game.round;

        if stopped {
            let vault = VaultClient::new(&env, &Self::load_vault(&env)?);
            let asset = Self::load_prize_asset(&env)?;

            let mut survivors: Vec<Address> = Vec::new(&env);
            let mut i: u32 = 0;
            while i < game.players.len() {
                let record = game.players.get(i).unwrap();
                if record.active {
                    survivors.push_back(record.address);
                }
                i += 1;
            }

            let pool = vault.get_unreserved(&asset);
            let share = pool / (survivors.len() as i128);
            if share > 0 {
                for survivor in survivors.iter() {
                    vault.credit(&survivor, &asset, &share);
                }
            }

            game.votes = Map::new(&env);
            game.status = STATUS_ENDED;

            EvGameEnded {
                round,
                survivor_count: survivors.len(),
                pool_paid: share * (survivors.len() as i128),
            }
            .publish(&env);
        } else {
            game.round += 1;
            game.votes = Map::new(&env);
            game.round_victims = Vec::new(&env);
            Self::clear_acted_flags(&mut game);
            game.status = STATUS_SELECTION;
        }

        EvVotingFinalized {
            round,
            stop_count,
            continue_count,
            stopped,
        }
        .publish(&env);

        Self::write_game(&env, &game);
        Ok(())
    }

    /// Wipe the roster and per-round state for a fresh run. Valid from
    /// ENDED (or PENDING, where it just re-clears). Vault balances are
    /// untouched.
    pub fn reset_game(env: Env) -> Result<(), GameError> {
        Self::require_admin(&env)?;

        let game = Self::read_game(&env)?;
        if game.status != STATUS_ENDED && game.status != STATUS_PENDING {
            return Err(GameError::WrongPhase);
        }

        let generation = game.generation + 1;
        Self::write_game(&env, &Self::fresh_game(&env, generation));

        EvGameReset { generation }.publish(&env);
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Views
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_status(env: Env) -> Result<u32, GameError> {
        Ok(Self::read_game(&env)?.status)
    }

    pub fn get_round(env: Env) -> Result<u32, GameError> {
        Ok(Self::read_game(&env)?.round)
    }

    pub fn get_elimination_count(env: Env) -> Result<u32, GameError> {
        Ok(Self::read_game(&env)?.elimination_count)
    }

    pub fn get_players_count(env: Env) -> Result<u32, GameError> {
        Ok(Self::read_game(&env)?.players.len())
    }

    pub fn get_all_players(env: Env) -> Result<Vec<PlayerRecord>, GameError> {
        Ok(Self::read_game(&env)?.players)
    }

    pub fn get_round_victims(env: Env) -> Result<Vec<Address>, GameError> {
        Ok(Self::read_game(&env)?.round_victims)
    }

    /// Current tally plus the number of active players still to vote, so
    /// the administrator can decide when to finalize.
    pub fn get_voting_state(env: Env) -> Result<VotingState, GameError> {
        let game = Self::read_game(&env)?;
        let (stop_count, continue_count) = Self::tally(&game);

        let mut active: u32 = 0;
        let mut i: u32 = 0;
        while i < game.players.len() {
            if game.players.get(i).unwrap().active {
                active += 1;
            }
            i += 1;
        }

        Ok(VotingState {
            stop_count,
            continue_count,
            missing_count: active - stop_count - continue_count,
        })
    }

    pub fn get_consolation_prize_for_round(env: Env, round: u32) -> Result<i128, GameError> {
        Self::consolation_for_round(&env, round)
    }

    /// The current round's consolation amount and the pool not yet
    /// promised to anyone.
    pub fn get_round_prizes(env: Env) -> Result<RoundPrizes, GameError> {
        let game = Self::read_game(&env)?;
        let round = if game.round == 0 { 1 } else { game.round };
        let consolation = Self::consolation_for_round(&env, round)?;

        let vault = VaultClient::new(&env, &Self::load_vault(&env)?);
        let asset = Self::load_prize_asset(&env)?;
        Ok(RoundPrizes {
            consolation,
            remaining_pool: vault.get_unreserved(&asset),
        })
    }

    pub fn get_prize_schedule(env: Env) -> Vec<i128> {
        env.storage()
            .instance()
            .get(&StorageKey::PrizeSchedule)
            .unwrap_or_else(|| Vec::new(&env))
    }

    pub fn get_generation(env: Env) -> Result<u32, GameError> {
        Ok(Self::read_game(&env)?.generation)
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Admin wiring
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_admin(env: Env) -> Result<Address, GameError> {
        Self::load_admin(&env)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), GameError> {
        Self::require_admin(&env)?;
        env.storage().instance().set(&StorageKey::Admin, &new_admin);
        Ok(())
    }

    pub fn get_whitelist(env: Env) -> Result<Address, GameError> {
        Self::load_whitelist(&env)
    }

    pub fn set_whitelist(env: Env, new_whitelist: Address) -> Result<(), GameError> {
        Self::require_admin(&env)?;
        env.storage()
            .instance()
            .set(&StorageKey::WhitelistAddress, &new_whitelist);
        Ok(())
    }

    pub fn get_vault(env: Env) -> Result<Address, GameError> {
        Self::load_vault(&env)
    }

    pub fn set_vault(env: Env, new_vault: Address) -> Result<(), GameError> {
        Self::require_admin(&env)?;
        env.storage().instance().set(&StorageKey::VaultAddress, &new_vault);
        Ok(())
    }

    pub fn get_prize_asset(env: Env) -> Result<Address, GameError> {
        Self::load_prize_asset(&env)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    //  Internal: helpers
    // ═══════════════════════════════════════════════════════════════════════════

    fn require_admin(env: &Env) -> Result<(), GameError> {
        let admin = Self::load_admin(env)?;
        admin.require_auth();
        Ok(())
    }

    fn fresh_game(env: &Env, generation: u32) -> GameInstance {
        GameInstance {
            status: STATUS_PENDING,
            round: 0,
            elimination_count: 0,
            generation,
            players: Vec::new(env),
            round_victims: Vec::new(env),
            round_selections: Map::new(env),
            votes: Map::new(env),
        }
    }

    fn find_player(game: &GameInstance, address: &Address) -> Option<u32> {
        let mut i: u32 = 0;
        while i < game.players.len() {
            if game.players.get(i).unwrap().address == *address {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    fn clear_acted_flags(game: &mut GameInstance) {
        let mut i: u32 = 0;
        while i < game.players.len() {
            let mut record = game.players.get(i).unwrap();
            if record.acted_this_phase {
                record.acted_this_phase = false;
                game.players.set(i, record);
            }
            i += 1;
        }
    }

    fn tally(game: &GameInstance) -> (u32, u32) {
        let mut stop_count: u32 = 0;
        let mut continue_count: u32 = 0;
        for (_, choice) in game.votes.iter() {
            if choice == VOTE_STOP {
                stop_count += 1;
            } else {
                continue_count += 1;
            }
        }
        (stop_count, continue_count)
    }

    fn consolation_for_round(env: &Env, round: u32) -> Result<i128, GameError> {
        if round == 0 {
            return Err(GameError::InvalidRound);
        }
        let schedule: Vec<i128> = env
            .storage()
            .instance()
            .get(&StorageKey::PrizeSchedule)
            .ok_or(GameError::PrizeScheduleNotSet)?;
        let idx = if round >= schedule.len() {
            schedule.len() - 1
        } else {
            round - 1
        };
        schedule.get(idx).ok_or(GameError::PrizeScheduleNotSet)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    //  Internal: storage
    // ═══════════════════════════════════════════════════════════════════════════

    fn read_game(env: &Env) -> Result<GameInstance, GameError> {
        env.storage()
            .instance()
            .get(&StorageKey::Game)
            .ok_or(GameError::GameNotInitialized)
    }

    fn write_game(env: &Env, game: &GameInstance) {
        env.storage().instance().set(&StorageKey::Game, game);
        env.storage()
            .instance()
            .extend_ttl(GAME_TTL_LEDGERS, GAME_TTL_LEDGERS);
    }

    fn load_admin(env: &Env) -> Result<Address, GameError> {
        env.storage()
            .instance()
            .get(&StorageKey::Admin)
            .ok_or(GameError::AdminNotSet)
    }

    fn load_whitelist(env: &Env) -> Result<Address, GameError> {
        env.storage()
            .instance()
            .get(&StorageKey::WhitelistAddress)
            .ok_or(GameError::WhitelistNotSet)
    }

    fn load_vault(env: &Env) -> Result<Address, GameError> {
        env.storage()
            .instance()
            .get(&StorageKey::VaultAddress)
            .ok_or(GameError::VaultNotSet)
    }

    fn load_prize_asset(env: &Env) -> Result<Address, GameError> {
        env.storage()
            .instance()
            .get(&StorageKey::PrizeAsset)
            .ok_or(GameError::PrizeAssetNotSet)
    }
}

#[cfg(test)]
mod test;
