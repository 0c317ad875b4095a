//! In-flight duel index keyed by participant pair and by participant.

use std::collections::HashMap;

use super::errors::{DuelError, DuelResult};
use super::models::Duel;
use crate::UserId;

/// Canonical key of a duel's participant pair.
///
/// A challenge without an opponent is keyed by its challenger alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairKey {
    Open(UserId),
    Matched(UserId, UserId),
}

impl PairKey {
    /// Key for `duel`; matched pairs are ordered so lookups are symmetric.
    pub fn of(duel: &Duel) -> Self {
        match duel.opponent {
            None => PairKey::Open(duel.challenger),
            Some(opponent) => Self::matched(duel.challenger, opponent),
        }
    }

    pub fn matched(a: UserId, b: UserId) -> Self {
        if a <= b {
            PairKey::Matched(a, b)
        } else {
            PairKey::Matched(b, a)
        }
    }
}

/// Two-key index enforcing one active duel per user.
///
/// Every stored duel is reachable from the key of each of its participants,
/// and no participant key points at more than one duel.
#[derive(Debug, Default)]
pub struct DuelRegistry {
    by_pair: HashMap<PairKey, Duel>,
    by_participant: HashMap<UserId, PairKey>,
}

impl DuelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    pub fn contains_participant(&self, user_id: UserId) -> bool {
        self.by_participant.contains_key(&user_id)
    }

    /// Index `duel` under its pair key and every participant key.
    ///
    /// # Errors
    ///
    /// Returns `DuelError::AlreadyInDuel` without touching the registry when
    /// any participant is already indexed.
    pub fn register(&mut self, duel: Duel) -> DuelResult<()> {
        let participants = duel.participants();
        if let Some(&taken) = participants
            .iter()
            .find(|user_id| self.by_participant.contains_key(user_id))
        {
            return Err(DuelError::AlreadyInDuel(taken));
        }

        let key = PairKey::of(&duel);
        for user_id in participants {
            self.by_participant.insert(user_id, key);
        }
        self.by_pair.insert(key, duel);
        Ok(())
    }

    pub fn find_by_participant(&self, user_id: UserId) -> Option<&Duel> {
        self.by_participant
            .get(&user_id)
            .and_then(|key| self.by_pair.get(key))
    }

    /// Mutable access for transitions that keep the participant set unchanged.
    pub fn find_by_participant_mut(&mut self, user_id: UserId) -> Option<&mut Duel> {
        let key = self.by_participant.get(&user_id)?;
        self.by_pair.get_mut(key)
    }

    /// Remove the duel stored under `key` together with all of its participant entries.
    pub fn remove(&mut self, key: PairKey) -> Option<Duel> {
        let duel = self.by_pair.remove(&key)?;
        for user_id in duel.participants() {
            if self.by_participant.get(&user_id) == Some(&key) {
                self.by_participant.remove(&user_id);
            }
        }
        Some(duel)
    }

    /// Remove whichever duel `user_id` takes part in.
    pub fn take_by_participant(&mut self, user_id: UserId) -> Option<Duel> {
        let key = *self.by_participant.get(&user_id)?;
        self.remove(key)
    }

    pub fn duels(&self) -> impl Iterator<Item = &Duel> {
        self.by_pair.values()
    }
}
