use crate::domain::model::Subsession;

/// Targets of one group across earlier rounds, oldest first.
///
/// Groups are matched by their id within the subsession, which stays stable
/// because later rounds reuse the first round's grouping. Rounds whose group
/// has no target yet are skipped. Clone it to walk the same rounds again.
#[derive(Debug, Clone)]
pub struct TargetHistory<'a> {
    rounds: std::slice::Iter<'a, Subsession>,
    group: u32,
}

impl<'a> TargetHistory<'a> {
    pub fn new(previous_rounds: &'a [Subsession], group: u32) -> Self {
        Self {
            rounds: previous_rounds.iter(),
            group,
        }
    }
}

impl Iterator for TargetHistory<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let group = self.group;
        self.rounds
            .by_ref()
            .find_map(|sub| sub.group(group).and_then(|g| g.two_thirds_avg))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.rounds.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_with_target(round: u32, target: Option<f64>) -> Subsession {
        let mut sub = Subsession::from_matrix(round, &[vec![1, 2], vec![3, 4]]);
        sub.groups[0].two_thirds_avg = target;
        sub.groups[1].two_thirds_avg = Some(99.0);
        sub
    }

    #[test]
    fn test_history_in_round_order() {
        let rounds = vec![
            round_with_target(1, Some(10.0)),
            round_with_target(2, Some(12.5)),
            round_with_target(3, Some(9.0)),
        ];
        let history: Vec<f64> = TargetHistory::new(&rounds, 1).collect();
        assert_eq!(history, vec![10.0, 12.5, 9.0]);
    }

    #[test]
    fn test_history_is_restartable() {
        let rounds = vec![round_with_target(1, Some(10.0)), round_with_target(2, Some(12.5))];
        let history = TargetHistory::new(&rounds, 1);
        let first: Vec<f64> = history.clone().collect();
        let second: Vec<f64> = history.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_history_skips_unscored_rounds_and_other_groups() {
        let rounds = vec![round_with_target(1, None), round_with_target(2, Some(4.0))];
        assert_eq!(TargetHistory::new(&rounds, 1).collect::<Vec<_>>(), vec![4.0]);
        assert_eq!(TargetHistory::new(&rounds, 7).count(), 0);
        assert_eq!(TargetHistory::new(&[], 1).count(), 0);
    }
}
