//! Pure role/side derivation over the match aggregate.
//!
//! "Who is this player relative to the match" is computed once per command
//! through these helpers instead of scattering conditionals.

use crate::common::PlayerId;

use super::models::Match;
use super::stage::Side;

/// A player's participant role in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Creator,
    Opponent,
}

impl Match {
    /// The participant role of `player_id`, if they are party to this match.
    pub fn role_of(&self, player_id: PlayerId) -> Option<Role> {
        if player_id == self.creator_id {
            Some(Role::Creator)
        } else if player_id == self.opponent_id {
            Some(Role::Opponent)
        } else {
            None
        }
    }

    /// Whether `player_id` is the creator or the opponent.
    pub fn is_participant(&self, player_id: PlayerId) -> bool {
        self.role_of(player_id).is_some()
    }

    /// The other participant.
    pub fn other_participant(&self, player_id: PlayerId) -> Option<PlayerId> {
        match self.role_of(player_id)? {
            Role::Creator => Some(self.opponent_id),
            Role::Opponent => Some(self.creator_id),
        }
    }

    /// The trial side bound to `player_id`, once sides are assigned.
    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        if self.prosecution_player_id == Some(player_id) {
            Some(Side::Prosecution)
        } else if self.defense_player_id == Some(player_id) {
            Some(Side::Defense)
        } else {
            None
        }
    }

    /// The player bound to a trial side, once sides are assigned.
    pub fn player_for_side(&self, side: Side) -> Option<PlayerId> {
        match side {
            Side::Prosecution => self.prosecution_player_id,
            Side::Defense => self.defense_player_id,
        }
    }

    /// The participant whose wallet address matches, if any.
    pub fn role_of_wallet<'a>(
        &self,
        wallet: &str,
        creator_wallet: &'a str,
        opponent_wallet: &'a str,
    ) -> Option<Role> {
        let wallet = wallet.to_lowercase();
        if wallet == creator_wallet.to_lowercase() {
            Some(Role::Creator)
        } else if wallet == opponent_wallet.to_lowercase() {
            Some(Role::Opponent)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::matches::testing::match_fixture;

    #[test]
    fn role_derivation_covers_both_participants() {
        let m = match_fixture();
        assert_eq!(m.role_of(m.creator_id), Some(Role::Creator));
        assert_eq!(m.role_of(m.opponent_id), Some(Role::Opponent));
        assert_eq!(m.role_of(PlayerId::new()), None);
    }

    #[test]
    fn other_participant_is_symmetric() {
        let m = match_fixture();
        assert_eq!(m.other_participant(m.creator_id), Some(m.opponent_id));
        assert_eq!(m.other_participant(m.opponent_id), Some(m.creator_id));
        assert_eq!(m.other_participant(PlayerId::new()), None);
    }

    #[test]
    fn side_lookup_requires_bound_sides() {
        let mut m = match_fixture();
        assert_eq!(m.side_of(m.creator_id), None);

        m.prosecution_player_id = Some(m.creator_id);
        m.defense_player_id = Some(m.opponent_id);
        assert_eq!(m.side_of(m.creator_id), Some(Side::Prosecution));
        assert_eq!(m.side_of(m.opponent_id), Some(Side::Defense));
        assert_eq!(m.player_for_side(Side::Defense), Some(m.opponent_id));
    }

    #[test]
    fn wallet_matching_is_case_insensitive() {
        let m = match_fixture();
        assert_eq!(
            m.role_of_wallet("0xABCD", "0xabcd", "0xeeee"),
            Some(Role::Creator)
        );
        assert_eq!(
            m.role_of_wallet("0xEEEE", "0xabcd", "0xeeee"),
            Some(Role::Opponent)
        );
        assert_eq!(m.role_of_wallet("0x1234", "0xabcd", "0xeeee"), None);
    }
}
