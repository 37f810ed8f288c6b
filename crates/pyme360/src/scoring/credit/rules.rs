use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use super::super::error::SubScoreError;
use super::super::ladder::Ladder;
use super::super::profile::{parse_date, years_between, CreditHistory, PaymentStatus};

pub(crate) const NEUTRAL_SCORE: u8 = 50;

const PAYMENT_LADDER: Ladder = Ladder::at_least(
    &[
        (99.0, 100),
        (97.0, 95),
        (95.0, 90),
        (90.0, 80),
        (85.0, 70),
        (80.0, 60),
        (75.0, 50),
        (70.0, 40),
    ],
    30,
);

const UTILIZATION_LADDER: Ladder = Ladder::at_most(
    &[
        (10.0, 100),
        (20.0, 90),
        (30.0, 80),
        (40.0, 70),
        (50.0, 60),
        (60.0, 50),
        (70.0, 40),
        (80.0, 30),
    ],
    20,
);

const HISTORY_LADDER: Ladder = Ladder::at_least(
    &[
        (10.0, 100),
        (7.0, 90),
        (5.0, 80),
        (3.0, 70),
        (2.0, 60),
        (1.0, 50),
    ],
    40,
);

const MIX_LADDER: Ladder = Ladder::at_least(&[(4.0, 100), (3.0, 90), (2.0, 75), (1.0, 60)], 40);

const APPLICATIONS_LADDER: Ladder = Ladder::at_most(
    &[(0.0, 100), (1.0, 90), (2.0, 80), (3.0, 60), (4.0, 40)],
    20,
);

const APPLICATION_WINDOW_DAYS: i64 = 365;

/// Score produced by one rule plus the raw metric it was derived from.
/// A missing metric means the rule fell back to its neutral default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RuleOutcome {
    pub score: u8,
    pub metric: Option<f64>,
}

impl RuleOutcome {
    fn measured(score: u8, metric: f64) -> Self {
        Self {
            score: score.min(100),
            metric: Some(metric),
        }
    }

    pub(crate) fn neutral() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            metric: None,
        }
    }
}

/// Payment counts across bank accounts and supplier credit lines.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct PaymentTally {
    pub on_time: u32,
    pub late: u32,
    pub unclassified: u32,
    pub days_late_total: u64,
    pub late_with_days: u32,
}

impl PaymentTally {
    pub(crate) fn from_history(history: &CreditHistory) -> Self {
        history
            .payments()
            .fold(Self::default(), |mut tally, payment| {
                match &payment.status {
                    PaymentStatus::OnTime => tally.on_time += 1,
                    PaymentStatus::Late { days } => {
                        tally.late += 1;
                        if let Some(days) = days {
                            tally.days_late_total += u64::from(*days);
                            tally.late_with_days += 1;
                        }
                    }
                    PaymentStatus::Unknown(_) => tally.unclassified += 1,
                }
                tally
            })
    }

    pub(crate) fn classified(&self) -> u32 {
        self.on_time + self.late
    }

    pub(crate) fn total(&self) -> u32 {
        self.classified() + self.unclassified
    }

    pub(crate) fn on_time_pct(&self) -> Option<f64> {
        let classified = self.classified();
        (classified > 0).then(|| f64::from(self.on_time) / f64::from(classified) * 100.0)
    }

    pub(crate) fn average_days_late(&self) -> Option<f64> {
        (self.late_with_days > 0)
            .then(|| self.days_late_total as f64 / f64::from(self.late_with_days))
    }
}

/// Share of classified payments made on time. Unclassified payments sit
/// outside both numerator and denominator.
pub(crate) fn payment_history(tally: &PaymentTally) -> Result<RuleOutcome, SubScoreError> {
    let classified = tally.classified();
    if classified == 0 {
        return Ok(RuleOutcome::neutral());
    }

    let score = PAYMENT_LADDER.score_ratio(
        f64::from(tally.on_time) * 100.0,
        f64::from(classified),
    );
    let pct = tally.on_time_pct().unwrap_or_default();
    Ok(RuleOutcome::measured(score, pct))
}

/// Outstanding balance over total limit, bank and supplier lines combined.
pub(crate) fn credit_utilization(history: &CreditHistory) -> Result<RuleOutcome, SubScoreError> {
    let balances = history
        .accounts
        .iter()
        .map(|account| (account.balance, account.limit))
        .chain(
            history
                .supplier_credits
                .iter()
                .map(|supplier| (supplier.balance, supplier.limit)),
        );

    let (debt, limit) = balances.fold((0.0_f64, 0.0_f64), |(debt, limit), (balance, cap)| {
        (debt + balance.unwrap_or(0.0), limit + cap.unwrap_or(0.0))
    });

    if !debt.is_finite() || debt < 0.0 {
        return Err(SubScoreError::InvalidTotal {
            field: "saldo_actual",
            value: debt,
        });
    }
    if !limit.is_finite() || limit < 0.0 {
        return Err(SubScoreError::InvalidTotal {
            field: "limite_credito",
            value: limit,
        });
    }
    if limit == 0.0 {
        return Ok(RuleOutcome::neutral());
    }

    let score = UTILIZATION_LADDER.score_ratio(debt * 100.0, limit);
    Ok(RuleOutcome::measured(score, debt / limit * 100.0))
}

/// Mean age in years of bank accounts with a parseable opening date.
/// Accounts opened after `as_of` are skipped along with malformed dates.
pub(crate) fn history_length(
    history: &CreditHistory,
    as_of: NaiveDate,
) -> Result<RuleOutcome, SubScoreError> {
    let ages: Vec<f64> = history
        .accounts
        .iter()
        .filter_map(|account| account.opened_on.as_deref())
        .filter_map(parse_date)
        .filter_map(|opened| years_between(opened, as_of))
        .collect();

    if ages.is_empty() {
        return Ok(RuleOutcome::neutral());
    }

    let average = ages.iter().sum::<f64>() / ages.len() as f64;
    if !average.is_finite() {
        return Err(SubScoreError::NonFiniteAverage {
            field: "fecha_apertura",
            value: average,
        });
    }

    Ok(RuleOutcome::measured(HISTORY_LADDER.score(average), average))
}

/// Distinct bank account types, plus one when any supplier credit exists.
pub(crate) fn credit_mix(history: &CreditHistory) -> Result<RuleOutcome, SubScoreError> {
    let kinds: BTreeSet<String> = history
        .accounts
        .iter()
        .filter_map(|account| account.kind.as_deref())
        .map(|kind| kind.trim().to_lowercase())
        .filter(|kind| !kind.is_empty())
        .collect();

    let trade_credit = usize::from(!history.supplier_credits.is_empty());
    let count = (kinds.len() + trade_credit) as f64;

    Ok(RuleOutcome::measured(MIX_LADDER.score(count), count))
}

/// Applications dated within the trailing year.
pub(crate) fn new_applications(
    history: &CreditHistory,
    as_of: NaiveDate,
) -> Result<RuleOutcome, SubScoreError> {
    let cutoff = as_of - Duration::days(APPLICATION_WINDOW_DAYS);
    let recent = history
        .applications
        .iter()
        .filter_map(|application| application.date.as_deref())
        .filter_map(parse_date)
        .filter(|date| *date > cutoff)
        .count() as f64;

    Ok(RuleOutcome::measured(APPLICATIONS_LADDER.score(recent), recent))
}

#[cfg(test)]
pub(crate) fn ladders() -> [&'static Ladder; 5] {
    [
        &PAYMENT_LADDER,
        &UTILIZATION_LADDER,
        &HISTORY_LADDER,
        &MIX_LADDER,
        &APPLICATIONS_LADDER,
    ]
}
