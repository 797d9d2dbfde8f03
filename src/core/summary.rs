use crate::core::payoff::round2;
use crate::domain::model::{AdminReport, Subsession};

impl AdminReport {
    /// Mean of the group averages (each group weighted equally) plus the
    /// smallest and largest guess submitted so far.
    ///
    /// Groups without payoffs still count with their initial average of 0.
    /// With no guesses at all, min and max are reported as 0.
    pub fn from_subsession(subsession: &Subsession) -> Self {
        let num_groups = subsession.groups.len();
        let avg_num = if num_groups == 0 {
            0.0
        } else {
            subsession
                .groups
                .iter()
                .map(|g| g.average / num_groups as f64)
                .sum()
        };

        let guesses = subsession.players().filter_map(|p| p.guess);
        let (min_guess, max_guess) = guesses
            .fold(None, |acc: Option<(u32, u32)>, g| match acc {
                None => Some((g, g)),
                Some((lo, hi)) => Some((lo.min(g), hi.max(g))),
            })
            .unwrap_or((0, 0));

        Self {
            avg_num: round2(avg_num),
            min_guess,
            max_guess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_before_any_guess_defaults_to_zero() {
        let sub = Subsession::from_matrix(1, &[vec![1, 2], vec![3, 4]]);
        let report = AdminReport::from_subsession(&sub);
        assert_eq!(
            report,
            AdminReport {
                avg_num: 0.0,
                min_guess: 0,
                max_guess: 0
            }
        );
    }

    #[test]
    fn test_report_weights_groups_equally() {
        let mut sub = Subsession::from_matrix(1, &[vec![1, 2], vec![3, 4]]);
        sub.groups[0].average = 10.0;
        sub.groups[1].average = 25.0;
        for (pid, guess) in [(1, 5), (2, 15), (3, 0), (4, 50)] {
            sub.group_of_mut(pid).unwrap().player_mut(pid).unwrap().guess = Some(guess);
        }

        let report = AdminReport::from_subsession(&sub);
        assert_eq!(report.avg_num, 17.5);
        assert_eq!(report.min_guess, 0);
        assert_eq!(report.max_guess, 50);
    }

    #[test]
    fn test_report_ignores_players_without_guess() {
        let mut sub = Subsession::from_matrix(1, &[vec![1, 2, 3]]);
        sub.groups[0].player_mut(2).unwrap().guess = Some(42);
        let report = AdminReport::from_subsession(&sub);
        assert_eq!((report.min_guess, report.max_guess), (42, 42));
    }
}
