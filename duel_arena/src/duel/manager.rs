//! Duel lifecycle state machine.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use super::dealer::DealerAuthorizer;
use super::errors::{DuelError, DuelResult};
use super::messages::{DuelAction, DuelResponse, Settlement};
use super::models::{Duel, DuelPhase};
use super::registry::{DuelRegistry, PairKey};
use crate::game::{GameState, MoveOutcome, apply_move};
use crate::payout::Payout;
use crate::records::{MatchRecord, MatchRecordManager, RankedStats};
use crate::{DuelId, UserId};

/// Owns every in-flight duel and drives them through their lifecycle.
///
/// Each call to [`DuelManager::handle`] runs one transition to completion.
/// Awaited collaborators (dealer authorization, record persistence) are
/// consulted before the registry is changed.
pub struct DuelManager {
    registry: DuelRegistry,
    records: MatchRecordManager,
    authorizer: Arc<dyn DealerAuthorizer>,
    rng: StdRng,
    next_duel_id: DuelId,
}

impl DuelManager {
    /// Create a manager with an OS-seeded first-mover source
    ///
    /// # Arguments
    ///
    /// * `records` - Match record store written on settlement
    /// * `authorizer` - Decides who may act as dealer
    pub fn new(records: MatchRecordManager, authorizer: Arc<dyn DealerAuthorizer>) -> Self {
        Self::with_rng(records, authorizer, StdRng::from_os_rng())
    }

    /// Create a manager with an explicit random source, e.g. a seeded one in tests
    pub fn with_rng(
        records: MatchRecordManager,
        authorizer: Arc<dyn DealerAuthorizer>,
        rng: StdRng,
    ) -> Self {
        Self {
            registry: DuelRegistry::new(),
            records,
            authorizer,
            rng,
            next_duel_id: 1,
        }
    }

    pub fn registry(&self) -> &DuelRegistry {
        &self.registry
    }

    pub fn records(&self) -> &MatchRecordManager {
        &self.records
    }

    /// Apply one action event
    ///
    /// # Errors
    ///
    /// Returns the `DuelError` explaining why the action was rejected; a
    /// rejected action leaves every duel unchanged.
    pub async fn handle(&mut self, action: DuelAction) -> DuelResult<DuelResponse> {
        match action {
            DuelAction::Challenge { user_id, stake } => self.challenge(user_id, stake),
            DuelAction::Join {
                user_id,
                challenger,
            } => self.join(user_id, challenger),
            DuelAction::JoinAsDealer {
                user_id,
                challenger,
            } => self.join_as_dealer(user_id, challenger).await,
            DuelAction::StartMatch {
                user_id,
                challenger,
            } => self.start_match(user_id, challenger),
            DuelAction::Move { user_id, cell } => self.make_move(user_id, cell).await,
            DuelAction::CancelOrWithdraw { user_id } => self.cancel_or_withdraw(user_id),
            DuelAction::GetDuel { user_id } => Ok(DuelResponse::Duel {
                duel: self.registry.find_by_participant(user_id).map(Duel::snapshot),
            }),
            DuelAction::RequestUserStats { user_id } => Ok(DuelResponse::UserStats {
                user_id,
                stats: self.records.query_user_stats(user_id).await?,
            }),
            DuelAction::RequestGlobalStats => {
                let entries = self
                    .records
                    .query_global_stats()
                    .await?
                    .into_iter()
                    .enumerate()
                    .map(|(i, (user_id, stats))| RankedStats::new(i + 1, user_id, stats))
                    .collect();
                Ok(DuelResponse::GlobalStats { entries })
            }
        }
    }

    fn allocate_id(&mut self) -> DuelId {
        let id = self.next_duel_id;
        self.next_duel_id += 1;
        id
    }

    /// Open duel whose challenger is `challenger`.
    fn challenge_of(&self, challenger: UserId) -> DuelResult<&Duel> {
        self.registry
            .find_by_participant(challenger)
            .filter(|duel| duel.challenger == challenger)
            .ok_or(DuelError::DuelNotFound)
    }

    fn challenge(&mut self, user_id: UserId, stake: i64) -> DuelResult<DuelResponse> {
        // The pot must stay representable.
        if stake <= 0 || stake.checked_mul(2).is_none() {
            return Err(DuelError::InvalidStake(stake));
        }
        if self.registry.contains_participant(user_id) {
            return Err(DuelError::AlreadyInDuel(user_id));
        }

        let duel = Duel::open(self.allocate_id(), user_id, stake);
        let snapshot = duel.snapshot();
        self.registry.register(duel)?;

        log::info!("Duel {}: user {} challenges for {}", snapshot.id, user_id, stake);
        Ok(DuelResponse::Challenged { duel: snapshot })
    }

    fn join(&mut self, user_id: UserId, challenger: UserId) -> DuelResult<DuelResponse> {
        if user_id == challenger {
            return Err(DuelError::CannotJoinOwnDuel);
        }
        if self.registry.contains_participant(user_id) {
            return Err(DuelError::AlreadyInDuel(user_id));
        }

        let duel = self.challenge_of(challenger)?;
        if duel.phase != DuelPhase::AwaitingOpponent {
            return Err(DuelError::InvalidPhase { phase: duel.phase });
        }

        let mut duel = self
            .registry
            .remove(PairKey::Open(challenger))
            .ok_or(DuelError::DuelNotFound)?;
        duel.opponent = Some(user_id);
        duel.phase = DuelPhase::AwaitingDealer;
        let snapshot = duel.snapshot();
        self.registry.register(duel)?;

        log::info!("Duel {}: user {} accepted, awaiting dealer", snapshot.id, user_id);
        Ok(DuelResponse::Joined { duel: snapshot })
    }

    async fn join_as_dealer(&mut self, user_id: UserId, challenger: UserId) -> DuelResult<DuelResponse> {
        if !self.authorizer.is_dealer(user_id).await {
            return Err(DuelError::Unauthorized(format!("user {user_id} is not a dealer")));
        }

        let duel = self.challenge_of(challenger)?;
        match duel.phase {
            DuelPhase::AwaitingOpponent => {
                return Err(DuelError::DuelNotReady("no opponent has joined".to_string()));
            }
            DuelPhase::AwaitingDealer => {}
            phase => return Err(DuelError::InvalidPhase { phase }),
        }
        if duel.dealer.is_some() {
            return Err(DuelError::DealerAlreadyAssigned);
        }
        if duel.is_participant(user_id) {
            return Err(DuelError::Unauthorized(
                "a participant cannot deal their own duel".to_string(),
            ));
        }

        let duel = self
            .registry
            .find_by_participant_mut(challenger)
            .ok_or(DuelError::DuelNotFound)?;
        duel.dealer = Some(user_id);

        log::info!("Duel {}: dealer {} assigned", duel.id, user_id);
        Ok(DuelResponse::DealerJoined {
            duel: duel.snapshot(),
        })
    }

    fn start_match(&mut self, user_id: UserId, challenger: UserId) -> DuelResult<DuelResponse> {
        let duel = self
            .registry
            .find_by_participant_mut(challenger)
            .filter(|duel| duel.challenger == challenger)
            .ok_or(DuelError::DuelNotFound)?;

        if !matches!(duel.phase, DuelPhase::AwaitingOpponent | DuelPhase::AwaitingDealer) {
            return Err(DuelError::InvalidPhase { phase: duel.phase });
        }
        let Some(opponent) = duel.opponent else {
            return Err(DuelError::DuelNotReady("no opponent has joined".to_string()));
        };
        let Some(dealer) = duel.dealer else {
            return Err(DuelError::DuelNotReady("no dealer has joined".to_string()));
        };
        if dealer != user_id {
            return Err(DuelError::Unauthorized(
                "only the assigned dealer can start the match".to_string(),
            ));
        }

        let game = GameState::start(duel.challenger, opponent, &mut self.rng)?;
        log::info!(
            "Duel {}: started by dealer {}, user {} moves first",
            duel.id,
            dealer,
            game.active_participant()
        );
        duel.game = Some(game);
        duel.phase = DuelPhase::InProgress;

        Ok(DuelResponse::Started {
            duel: duel.snapshot(),
        })
    }

    async fn make_move(&mut self, user_id: UserId, cell: usize) -> DuelResult<DuelResponse> {
        let duel = self
            .registry
            .find_by_participant_mut(user_id)
            .ok_or(DuelError::DuelNotFound)?;
        if duel.phase != DuelPhase::InProgress {
            return Err(DuelError::InvalidPhase { phase: duel.phase });
        }
        let game = duel.game.as_mut().ok_or(DuelError::InvalidPhase { phase: duel.phase })?;

        let outcome = apply_move(game, user_id, cell)?;
        log::debug!("Duel {}: user {} played cell {} -> {:?}", duel.id, user_id, cell, outcome);

        let (challenger, opponent, stake) = match (outcome, duel.opponent) {
            (MoveOutcome::Continue, _) | (_, None) => {
                return Ok(DuelResponse::Moved {
                    duel: duel.snapshot(),
                    outcome,
                });
            }
            (_, Some(opponent)) => (duel.challenger, opponent, duel.stake),
        };

        self.settle(challenger, opponent, stake, outcome).await
    }

    /// Pay out, record, then drop the finished duel from the registry.
    async fn settle(
        &mut self,
        challenger: UserId,
        opponent: UserId,
        stake: i64,
        outcome: MoveOutcome,
    ) -> DuelResult<DuelResponse> {
        let (winner, payout, record) = match outcome {
            MoveOutcome::Win(winner) => (
                Some(winner),
                Some(Payout::for_stake(stake, self.records.commission())),
                MatchRecord::win(challenger, opponent, stake, winner),
            ),
            _ => (None, None, MatchRecord::draw(challenger, opponent, stake)),
        };

        let record_persisted = match self.records.record_match(&record).await {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Failed to record match {} vs {} (stake {}): {}",
                    challenger,
                    opponent,
                    stake,
                    e
                );
                false
            }
        };

        let mut duel = self
            .registry
            .remove(PairKey::matched(challenger, opponent))
            .ok_or(DuelError::DuelNotFound)?;
        duel.phase = DuelPhase::Settled;

        match (winner, payout) {
            (Some(winner), Some(payout)) => log::info!(
                "Duel {}: user {} wins, net payout {} (commission {})",
                duel.id,
                winner,
                payout.net,
                payout.commission
            ),
            _ => log::info!("Duel {}: draw", duel.id),
        }

        Ok(DuelResponse::Settled {
            settlement: Settlement {
                duel: duel.snapshot(),
                outcome,
                winner,
                payout,
                record_persisted,
            },
        })
    }

    fn cancel_or_withdraw(&mut self, user_id: UserId) -> DuelResult<DuelResponse> {
        let duel = self
            .registry
            .find_by_participant(user_id)
            .ok_or(DuelError::DuelNotFound)?;
        if !matches!(duel.phase, DuelPhase::AwaitingOpponent | DuelPhase::AwaitingDealer) {
            return Err(DuelError::InvalidPhase { phase: duel.phase });
        }
        let key = PairKey::of(duel);

        if duel.challenger == user_id {
            let mut duel = self.registry.remove(key).ok_or(DuelError::DuelNotFound)?;
            duel.phase = DuelPhase::Cancelled;
            log::info!("Duel {}: cancelled by challenger {}", duel.id, user_id);
            return Ok(DuelResponse::Cancelled {
                duel: duel.snapshot(),
            });
        }

        let previous = self.registry.remove(key).ok_or(DuelError::DuelNotFound)?;
        let reopened = Duel::open(self.allocate_id(), previous.challenger, previous.stake);
        let snapshot = reopened.snapshot();
        self.registry.register(reopened)?;

        log::info!(
            "Duel {}: opponent {} withdrew, challenge reopened as duel {}",
            previous.id,
            user_id,
            snapshot.id
        );
        Ok(DuelResponse::Reopened {
            withdrawn: user_id,
            previous: previous.id,
            duel: snapshot,
        })
    }
}
