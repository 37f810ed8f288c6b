/// Direction in which a ladder's thresholds are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Steps listed with descending thresholds; first `value >= threshold` wins.
    AtLeast,
    /// Steps listed with ascending thresholds; first `value <= threshold` wins.
    AtMost,
}

/// Static threshold table mapping a metric onto a 0-100 sub-score.
#[derive(Debug)]
pub(crate) struct Ladder {
    direction: Direction,
    steps: &'static [(f64, u8)],
    floor: u8,
}

impl Ladder {
    pub(crate) const fn at_least(steps: &'static [(f64, u8)], floor: u8) -> Self {
        Self {
            direction: Direction::AtLeast,
            steps,
            floor,
        }
    }

    pub(crate) const fn at_most(steps: &'static [(f64, u8)], floor: u8) -> Self {
        Self {
            direction: Direction::AtMost,
            steps,
            floor,
        }
    }

    pub(crate) fn score(&self, value: f64) -> u8 {
        self.score_ratio(value, 1.0)
    }

    /// Scores `numerator / denominator` expressed in the ladder's units without
    /// dividing, so values sitting exactly on a threshold never drift into the
    /// neighbouring bucket. The denominator must be positive.
    pub(crate) fn score_ratio(&self, numerator: f64, denominator: f64) -> u8 {
        self.steps
            .iter()
            .find(|(threshold, _)| match self.direction {
                Direction::AtLeast => numerator >= threshold * denominator,
                Direction::AtMost => numerator <= threshold * denominator,
            })
            .map(|(_, score)| *score)
            .unwrap_or(self.floor)
    }

    /// Every score the ladder can produce.
    #[cfg(test)]
    pub(crate) fn outputs(&self) -> impl Iterator<Item = u8> + '_ {
        self.steps
            .iter()
            .map(|(_, score)| *score)
            .chain(std::iter::once(self.floor))
    }
}
