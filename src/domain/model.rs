use crate::domain::currency::Currency;
use crate::utils::error::{GameError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ParticipantId = u32;

/// Position-to-role table. Positions outside it have no role.
const ROLE_TABLE: [(u32, Role); 4] = [(1, Role::A), (2, Role::B), (3, Role::C), (4, Role::D)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    A,
    B,
    C,
    D,
}

impl Role {
    pub fn for_position(position: u32) -> Result<Role> {
        ROLE_TABLE
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, role)| *role)
            .ok_or(GameError::RoleOutOfTable { position })
    }
}

/// A person taking part in the session, across all rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub total_payoff: Currency,
}

impl Participant {
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            total_payoff: Currency::ZERO,
        }
    }
}

/// A participant's seat in one group for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub participant: ParticipantId,
    pub round_number: u32,
    pub id_in_group: u32,
    pub guess: Option<u32>,
    pub is_winner: bool,
    pub payoff: Currency,
    pub round_payoff: Option<Currency>,
}

impl Player {
    pub fn new(participant: ParticipantId, round_number: u32, id_in_group: u32) -> Self {
        Self {
            participant,
            round_number,
            id_in_group,
            guess: None,
            is_winner: false,
            payoff: Currency::ZERO,
            round_payoff: None,
        }
    }

    pub fn role(&self) -> Result<Role> {
        Role::for_position(self.id_in_group)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id_in_subsession: u32,
    pub round_number: u32,
    pub players: Vec<Player>,
    pub average: f64,
    pub two_thirds_avg: Option<f64>,
    pub best_guess: Option<u32>,
    pub num_winners: Option<usize>,
}

impl Group {
    /// Players are seated in the order given, starting at position 1.
    pub fn new(id_in_subsession: u32, round_number: u32, members: &[ParticipantId]) -> Self {
        let players = members
            .iter()
            .zip(1u32..)
            .map(|(participant, id_in_group)| Player::new(*participant, round_number, id_in_group))
            .collect();

        Self {
            id_in_subsession,
            round_number,
            players,
            average: 0.0,
            two_thirds_avg: None,
            best_guess: None,
            num_winners: None,
        }
    }

    pub fn player(&self, participant: ParticipantId) -> Option<&Player> {
        self.players.iter().find(|p| p.participant == participant)
    }

    pub fn player_mut(&mut self, participant: ParticipantId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.participant == participant)
    }

    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.player(participant).is_some()
    }

    pub fn all_submitted(&self) -> bool {
        self.players.iter().all(|p| p.guess.is_some())
    }

    pub fn missing_guesses(&self) -> usize {
        self.players.iter().filter(|p| p.guess.is_none()).count()
    }

    pub fn is_finalized(&self) -> bool {
        self.two_thirds_avg.is_some()
    }

    /// Guesses in seating order; fails on the first player without one.
    pub fn submitted_guesses(&self) -> Result<Vec<u32>> {
        self.players
            .iter()
            .map(|p| {
                p.guess.ok_or(GameError::MissingGuess {
                    participant: p.participant,
                    round: self.round_number,
                })
            })
            .collect()
    }

    pub fn sorted_guesses(&self) -> Vec<u32> {
        let mut guesses: Vec<u32> = self.players.iter().filter_map(|p| p.guess).collect();
        guesses.sort_unstable();
        guesses
    }
}

/// All groups of a single round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsession {
    pub round_number: u32,
    pub groups: Vec<Group>,
}

impl Subsession {
    /// Builds the round's groups from a group matrix: one row of participant
    /// ids per group.
    pub fn from_matrix(round_number: u32, matrix: &[Vec<ParticipantId>]) -> Self {
        let groups = matrix
            .iter()
            .zip(1u32..)
            .map(|(members, id)| Group::new(id, round_number, members))
            .collect();
        Self {
            round_number,
            groups,
        }
    }

    pub fn group(&self, id_in_subsession: u32) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.id_in_subsession == id_in_subsession)
    }

    pub fn group_of(&self, participant: ParticipantId) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(participant))
    }

    pub fn group_of_mut(&mut self, participant: ParticipantId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.contains(participant))
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.groups.iter().flat_map(|g| g.players.iter())
    }

    pub fn is_complete(&self) -> bool {
        self.groups.iter().all(Group::is_finalized)
    }

    pub fn missing_guesses(&self) -> usize {
        self.groups.iter().map(Group::missing_guesses).sum()
    }

    /// Group matrix in seating order, usable to regroup a later round.
    pub fn matrix(&self) -> Vec<Vec<ParticipantId>> {
        self.groups
            .iter()
            .map(|g| g.players.iter().map(|p| p.participant).collect())
            .collect()
    }
}

/// Overview of a round across all groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminReport {
    pub avg_num: f64,
    pub min_guess: u32,
    pub max_guess: u32,
}

/// What a player sees once their group's payoffs are set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub sorted_guesses: Vec<u32>,
    pub average: f64,
    pub two_thirds_avg: f64,
    pub best_guess: u32,
    pub is_winner: bool,
    pub payoff: Currency,
    pub two_thirds_avg_history: Vec<f64>,
}

/// One row of guess input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub round: u32,
    pub participant: ParticipantId,
    pub guess: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub round: u32,
    pub group: u32,
    pub participant: ParticipantId,
    pub id_in_group: u32,
    pub role: Option<Role>,
    pub guess: Option<u32>,
    pub is_winner: bool,
    pub payoff: Currency,
    pub round_payoff: Option<Currency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub round: u32,
    pub group: u32,
    pub average: f64,
    pub two_thirds_avg: Option<f64>,
    pub best_guess: Option<u32>,
    pub num_winners: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupHistory {
    pub group: u32,
    pub two_thirds_avg: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub groups: Vec<GroupRow>,
    pub players: Vec<PlayerRow>,
    pub admin: AdminReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub name: String,
    pub generated_at: DateTime<Utc>,
    pub rounds: Vec<RoundOutcome>,
    /// Target of every completed round, per group.
    pub history: Vec<GroupHistory>,
    pub participants: Vec<Participant>,
}

impl SessionOutcome {
    pub fn player_rows(&self) -> impl Iterator<Item = &PlayerRow> {
        self.rounds.iter().flat_map(|r| r.players.iter())
    }

    pub fn group_rows(&self) -> impl Iterator<Item = &GroupRow> {
        self.rounds.iter().flat_map(|r| r.groups.iter())
    }

    pub fn total_paid(&self) -> Currency {
        self.participants.iter().map(|p| p.total_payoff).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_table() {
        assert_eq!(Role::for_position(1).unwrap(), Role::A);
        assert_eq!(Role::for_position(2).unwrap(), Role::B);
        assert_eq!(Role::for_position(3).unwrap(), Role::C);
        assert_eq!(Role::for_position(4).unwrap(), Role::D);
    }

    #[test]
    fn test_role_outside_table_is_error() {
        assert!(matches!(
            Role::for_position(5),
            Err(GameError::RoleOutOfTable { position: 5 })
        ));
        assert!(Role::for_position(0).is_err());
    }

    #[test]
    fn test_group_seats_players_in_order() {
        let group = Group::new(1, 1, &[7, 3, 9]);
        let seats: Vec<(u32, u32)> = group
            .players
            .iter()
            .map(|p| (p.participant, p.id_in_group))
            .collect();
        assert_eq!(seats, vec![(7, 1), (3, 2), (9, 3)]);
        assert_eq!(group.player(9).unwrap().role().unwrap(), Role::C);
        assert_eq!(group.average, 0.0);
        assert!(!group.is_finalized());
    }

    #[test]
    fn test_submitted_guesses_reports_missing_player() {
        let mut group = Group::new(1, 2, &[1, 2]);
        group.player_mut(1).unwrap().guess = Some(40);
        assert!(matches!(
            group.submitted_guesses(),
            Err(GameError::MissingGuess { participant: 2, round: 2 })
        ));
        assert_eq!(group.missing_guesses(), 1);

        group.player_mut(2).unwrap().guess = Some(10);
        assert!(group.all_submitted());
        assert_eq!(group.submitted_guesses().unwrap(), vec![40, 10]);
        assert_eq!(group.sorted_guesses(), vec![10, 40]);
    }

    #[test]
    fn test_subsession_matrix_round_trip() {
        let matrix = vec![vec![4, 1], vec![2, 3]];
        let sub = Subsession::from_matrix(3, &matrix);
        assert_eq!(sub.groups.len(), 2);
        assert_eq!(sub.group_of(3).unwrap().id_in_subsession, 2);
        assert_eq!(sub.matrix(), matrix);
        assert_eq!(sub.missing_guesses(), 4);
        assert!(!sub.is_complete());
    }
}
