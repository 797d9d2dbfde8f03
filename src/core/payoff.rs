use crate::domain::currency::Currency;
use crate::domain::model::Group;
use crate::utils::error::{GameError, Result};

/// Rounds to two decimal places, halves to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Result of scoring one group's guesses.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOutcome {
    pub average: f64,
    pub two_thirds_avg: f64,
    pub best_guess: u32,
    pub num_winners: usize,
    /// One entry per input guess, in input order; zero for non-winners.
    pub payoffs: Vec<Currency>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoffRule {
    pub jackpot: Currency,
    pub guess_max: u32,
}

impl PayoffRule {
    pub fn new(jackpot: Currency, guess_max: u32) -> Self {
        Self { jackpot, guess_max }
    }

    /// Scores a group.
    ///
    /// The winning guess is the one closest to two-thirds of the mean, with
    /// the lower guess taking a tie between two equally close values. Every
    /// player who made the winning guess shares the jackpot; leftover
    /// hundredths go to the earliest winners so the shares add up exactly.
    pub fn compute(&self, guesses: &[u32]) -> Result<GroupOutcome> {
        if guesses.is_empty() {
            return Err(GameError::EmptyGroup);
        }
        if let Some(&guess) = guesses.iter().find(|&&g| g > self.guess_max) {
            return Err(GameError::GuessOutOfRange {
                guess,
                max: self.guess_max,
            });
        }

        let total: u64 = guesses.iter().map(|&g| u64::from(g)).sum();
        let average = total as f64 / guesses.len() as f64;
        let two_thirds_avg = round2((2.0 / 3.0) * average);

        let distance = |guess: u32| (f64::from(guess) - two_thirds_avg).abs();
        let best_guess = guesses
            .iter()
            .copied()
            .min_by(|a, b| distance(*a).total_cmp(&distance(*b)).then(a.cmp(b)))
            .ok_or(GameError::EmptyGroup)?;

        let num_winners = guesses.iter().filter(|&&g| g == best_guess).count();
        let mut shares = self.jackpot.split(num_winners).into_iter();
        let payoffs = guesses
            .iter()
            .map(|&g| {
                if g == best_guess {
                    shares.next().unwrap_or(Currency::ZERO)
                } else {
                    Currency::ZERO
                }
            })
            .collect();

        Ok(GroupOutcome {
            average,
            two_thirds_avg,
            best_guess,
            num_winners,
            payoffs,
        })
    }
}

impl Group {
    /// Runs once per round, when every member has submitted.
    pub fn set_payoffs(&mut self, rule: &PayoffRule) -> Result<&Group> {
        if self.is_finalized() {
            return Err(GameError::GroupAlreadyFinalized {
                round: self.round_number,
                group: self.id_in_subsession,
            });
        }

        let guesses = self.submitted_guesses()?;
        let outcome = rule.compute(&guesses)?;

        for (player, payoff) in self.players.iter_mut().zip(&outcome.payoffs) {
            player.is_winner = player.guess == Some(outcome.best_guess);
            player.payoff = *payoff;
        }
        self.average = outcome.average;
        self.two_thirds_avg = Some(outcome.two_thirds_avg);
        self.best_guess = Some(outcome.best_guess);
        self.num_winners = Some(outcome.num_winners);

        tracing::debug!(
            round = self.round_number,
            group = self.id_in_subsession,
            average = outcome.average,
            target = outcome.two_thirds_avg,
            best_guess = outcome.best_guess,
            winners = outcome.num_winners,
            "group payoffs set"
        );

        Ok(&*self)
    }
}
