use guess_two_thirds::core::session::Constants;
use guess_two_thirds::{Currency, GameError, PayoffRule, Role, Session};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_closest_guess_wins_whole_jackpot() {
    let rule = PayoffRule::new(Currency::from_units(20), 100);
    let outcome = rule.compute(&[10, 20, 30, 40]).unwrap();

    assert_eq!(outcome.average, 25.0);
    assert_eq!(outcome.two_thirds_avg, 16.67);
    assert_eq!(outcome.best_guess, 20);
    assert_eq!(outcome.num_winners, 1);
    assert_eq!(outcome.payoffs[1], Currency::from_units(20));
}

#[test]
fn test_tie_on_zero_splits_jackpot() {
    let rule = PayoffRule::new(Currency::from_units(20), 100);
    let outcome = rule.compute(&[0, 0, 100, 100]).unwrap();

    assert_eq!(outcome.two_thirds_avg, 33.33);
    assert_eq!(outcome.best_guess, 0);
    assert_eq!(outcome.num_winners, 2);
    assert_eq!(
        outcome.payoffs,
        vec![
            Currency::from_units(10),
            Currency::from_units(10),
            Currency::ZERO,
            Currency::ZERO
        ]
    );
}

#[test]
fn test_random_groups_always_pay_out_jackpot() {
    let mut rng = StdRng::seed_from_u64(99);
    let rule = PayoffRule::new(Currency::from_cents(1999), 100);

    for _ in 0..200 {
        let size = rng.gen_range(1..=16);
        let guesses: Vec<u32> = (0..size).map(|_| rng.gen_range(0..=100)).collect();
        let outcome = rule.compute(&guesses).unwrap();

        assert!(guesses.contains(&outcome.best_guess));
        assert_eq!(
            outcome.num_winners,
            guesses.iter().filter(|&&g| g == outcome.best_guess).count()
        );
        assert_eq!(outcome.payoffs.iter().sum::<Currency>(), Currency::from_cents(1999));

        let shares: Vec<i64> = outcome
            .payoffs
            .iter()
            .filter(|p| **p != Currency::ZERO)
            .map(|p| p.cents())
            .collect();
        let spread = shares.iter().max().unwrap() - shares.iter().min().unwrap();
        assert!(spread <= 1);
    }
}

#[test]
fn test_full_session_through_public_api() {
    let constants = Constants {
        players_per_group: 4,
        num_rounds: 2,
        ..Constants::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let mut session = Session::new(constants, 8, &mut rng).unwrap();

    for round in 1..=2 {
        for participant in 1..=8 {
            session.submit_guess(round, participant, participant * 10).unwrap();
        }
        assert!(session.subsession(round).unwrap().is_complete());
        for participant in 1..=8 {
            session.finish_results(round, participant).unwrap();
        }
    }

    let paid: Currency = session.participants().iter().map(|p| p.total_payoff).sum();
    assert_eq!(paid, Currency::from_units(20 * 2 * 2));

    let view = session.results_view(2, 1).unwrap();
    assert_eq!(view.two_thirds_avg_history.len(), 1);
    assert_eq!(view.sorted_guesses.len(), 4);

    let roles: Vec<Result<Role, GameError>> = session
        .subsession(1)
        .unwrap()
        .groups[0]
        .players
        .iter()
        .map(|p| p.role())
        .collect();
    assert_eq!(roles.iter().filter(|r| r.is_ok()).count(), 4);
}
