use serde::Serialize;

/// Trust score tier unlocked by crossing a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl TrustLevel {
    pub const ALL: [TrustLevel; 4] = [
        TrustLevel::Bronze,
        TrustLevel::Silver,
        TrustLevel::Gold,
        TrustLevel::Platinum,
    ];

    pub fn threshold(self) -> u8 {
        match self {
            TrustLevel::Bronze => 50,
            TrustLevel::Silver => 65,
            TrustLevel::Gold => 80,
            TrustLevel::Platinum => 90,
        }
    }

    /// Highest tier reached by `score`, if any.
    pub fn for_score(score: u8) -> Option<Self> {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| score >= level.threshold())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Benefit {
    pub level: TrustLevel,
    pub name: &'static str,
    pub provider: &'static str,
    pub detail: &'static str,
}

const CATALOG: [Benefit; 7] = [
    Benefit {
        level: TrustLevel::Bronze,
        name: "Basic Visibility",
        provider: "PyME360",
        detail: "Listing in the business directory",
    },
    Benefit {
        level: TrustLevel::Silver,
        name: "Preferential Rates",
        provider: "Partner Bank",
        detail: "0.5% discount on interest rates",
    },
    Benefit {
        level: TrustLevel::Silver,
        name: "Certification Seal",
        provider: "PyME360",
        detail: "Verifiable digital badge",
    },
    Benefit {
        level: TrustLevel::Gold,
        name: "Priority Financing",
        provider: "Investment Fund",
        detail: "Access to exclusive credit lines",
    },
    Benefit {
        level: TrustLevel::Gold,
        name: "Premium Networking",
        provider: "Chamber of Commerce",
        detail: "Invitations to exclusive monthly events",
    },
    Benefit {
        level: TrustLevel::Platinum,
        name: "Mentor Program",
        provider: "Business Association",
        detail: "Access to executive mentors",
    },
    Benefit {
        level: TrustLevel::Platinum,
        name: "International Financing",
        provider: "International Bank",
        detail: "Expansion loans on special terms",
    },
];

/// Benefits unlocked at `score`. Tiers are cumulative, so the list for a
/// lower score is always a prefix of the list for a higher one.
pub fn benefits_for(score: u8) -> Vec<Benefit> {
    CATALOG
        .iter()
        .filter(|benefit| score >= benefit.level.threshold())
        .cloned()
        .collect()
}
