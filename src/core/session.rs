use crate::core::history::TargetHistory;
use crate::core::payoff::PayoffRule;
use crate::core::ConfigProvider;
use crate::domain::currency::Currency;
use crate::domain::model::{
    AdminReport, Participant, ParticipantId, ResultsView, Subsession,
};
use crate::utils::error::{GameError, Result};
use crate::utils::validation::{validate_multiple_of, validate_positive_number};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    pub name_in_url: String,
    pub players_per_group: u32,
    pub num_rounds: u32,
    pub jackpot: Currency,
    pub guess_max: u32,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            name_in_url: "guess_two_thirds".to_string(),
            players_per_group: 8,
            num_rounds: 8,
            jackpot: Currency::from_units(20),
            guess_max: 100,
        }
    }
}

impl Constants {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            name_in_url: config.name_in_url().to_string(),
            players_per_group: config.players_per_group(),
            num_rounds: config.num_rounds(),
            jackpot: config.jackpot(),
            guess_max: config.guess_max(),
        }
    }
}

/// What happened to the submitting player's group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Waiting { group: u32, remaining: usize },
    GroupScored { group: u32 },
}

/// Shuffles the participants and cuts them into groups of `group_size`.
pub fn group_randomly<R: Rng + ?Sized>(
    participants: &[ParticipantId],
    group_size: u32,
    rng: &mut R,
) -> Vec<Vec<ParticipantId>> {
    let mut ids = participants.to_vec();
    ids.shuffle(rng);
    ids.chunks(group_size.max(1) as usize)
        .map(<[ParticipantId]>::to_vec)
        .collect()
}

/// Explicit experiment context: constants, participants and every round's
/// groups. All gameplay goes through it.
#[derive(Debug, Clone)]
pub struct Session {
    constants: Constants,
    participants: Vec<Participant>,
    subsessions: Vec<Subsession>,
    rule: PayoffRule,
}

impl Session {
    /// Creates all rounds up front. Round 1 is grouped at random and every
    /// later round keeps the round-1 groups.
    pub fn new<R: Rng + ?Sized>(
        constants: Constants,
        num_participants: u32,
        rng: &mut R,
    ) -> Result<Self> {
        validate_positive_number("players_per_group", constants.players_per_group, 1)?;
        validate_positive_number("num_rounds", constants.num_rounds, 1)?;
        validate_positive_number("num_participants", num_participants, constants.players_per_group)?;
        validate_multiple_of("num_participants", num_participants, constants.players_per_group)?;

        let participants: Vec<Participant> = (1..=num_participants).map(Participant::new).collect();
        let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();

        let matrix = group_randomly(&ids, constants.players_per_group, rng);
        let subsessions = (1..=constants.num_rounds)
            .map(|round| Subsession::from_matrix(round, &matrix))
            .collect();

        tracing::info!(
            participants = num_participants,
            groups = matrix.len(),
            rounds = constants.num_rounds,
            "session created"
        );

        Ok(Self {
            rule: PayoffRule::new(constants.jackpot, constants.guess_max),
            constants,
            participants,
            subsessions,
        })
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn subsessions(&self) -> &[Subsession] {
        &self.subsessions
    }

    pub fn subsession(&self, round: u32) -> Result<&Subsession> {
        let index = self.round_index(round)?;
        Ok(&self.subsessions[index])
    }

    /// The introduction is only shown before the first round.
    pub fn show_introduction(&self, round: u32) -> bool {
        round == 1
    }

    fn round_index(&self, round: u32) -> Result<usize> {
        if round == 0 || round as usize > self.subsessions.len() {
            return Err(GameError::UnknownRound { round });
        }
        Ok(round as usize - 1)
    }

    /// Records a guess. When it completes the player's group, the group's
    /// payoffs are set right away.
    pub fn submit_guess(
        &mut self,
        round: u32,
        participant: ParticipantId,
        guess: u32,
    ) -> Result<Submission> {
        if guess > self.constants.guess_max {
            return Err(GameError::GuessOutOfRange {
                guess,
                max: self.constants.guess_max,
            });
        }

        let index = self.round_index(round)?;
        let group = self.subsessions[index]
            .group_of_mut(participant)
            .ok_or(GameError::UnknownParticipant { participant })?;
        let group_id = group.id_in_subsession;

        let player = group
            .player_mut(participant)
            .ok_or(GameError::UnknownParticipant { participant })?;
        if player.guess.is_some() {
            return Err(GameError::DuplicateGuess { participant, round });
        }
        player.guess = Some(guess);
        tracing::trace!(round, participant, guess, "guess submitted");

        if !group.all_submitted() {
            return Ok(Submission::Waiting {
                group: group_id,
                remaining: group.missing_guesses(),
            });
        }

        self.after_all_players_arrive(round, group_id)?;
        Ok(Submission::GroupScored { group: group_id })
    }

    /// Barrier callback: sets the group's payoffs once every member answered.
    pub fn after_all_players_arrive(&mut self, round: u32, group: u32) -> Result<()> {
        let index = self.round_index(round)?;
        let target = self.subsessions[index]
            .groups
            .iter_mut()
            .find(|g| g.id_in_subsession == group)
            .ok_or(GameError::UnknownGroup { round, group })?;

        target.set_payoffs(&self.rule)?;
        Ok(())
    }

    pub fn results_view(&self, round: u32, participant: ParticipantId) -> Result<ResultsView> {
        let group = self
            .subsession(round)?
            .group_of(participant)
            .ok_or(GameError::UnknownParticipant { participant })?;
        let player = group
            .player(participant)
            .ok_or(GameError::UnknownParticipant { participant })?;

        let (two_thirds_avg, best_guess) = match (group.two_thirds_avg, group.best_guess) {
            (Some(target), Some(best)) => (target, best),
            _ => {
                return Err(GameError::GroupNotFinalized {
                    round,
                    group: group.id_in_subsession,
                })
            }
        };

        Ok(ResultsView {
            sorted_guesses: group.sorted_guesses(),
            average: group.average,
            two_thirds_avg,
            best_guess,
            is_winner: player.is_winner,
            payoff: player.payoff,
            two_thirds_avg_history: self
                .two_thirds_avg_history(round, group.id_in_subsession)?
                .collect(),
        })
    }

    /// Leaving the results stage: the round payoff is recorded and credited
    /// to the participant. Repeated calls credit nothing further.
    pub fn finish_results(&mut self, round: u32, participant: ParticipantId) -> Result<Currency> {
        let index = self.round_index(round)?;
        let group = self.subsessions[index]
            .group_of_mut(participant)
            .ok_or(GameError::UnknownParticipant { participant })?;
        if !group.is_finalized() {
            return Err(GameError::GroupNotFinalized {
                round,
                group: group.id_in_subsession,
            });
        }

        let player = group
            .player_mut(participant)
            .ok_or(GameError::UnknownParticipant { participant })?;
        if let Some(recorded) = player.round_payoff {
            return Ok(recorded);
        }
        player.round_payoff = Some(player.payoff);
        let payoff = player.payoff;

        let owner = self
            .participants
            .iter_mut()
            .find(|p| p.id == participant)
            .ok_or(GameError::UnknownParticipant { participant })?;
        owner.total_payoff += payoff;

        Ok(payoff)
    }

    /// Targets of `group` in the rounds before `round`.
    pub fn two_thirds_avg_history(&self, round: u32, group: u32) -> Result<TargetHistory<'_>> {
        let index = self.round_index(round)?;
        Ok(TargetHistory::new(&self.subsessions[..index], group))
    }

    /// Targets of `group` in every round scored so far.
    pub fn full_history(&self, group: u32) -> TargetHistory<'_> {
        TargetHistory::new(&self.subsessions, group)
    }

    pub fn admin_report(&self, round: u32) -> Result<AdminReport> {
        Ok(AdminReport::from_subsession(self.subsession(round)?))
    }
}
