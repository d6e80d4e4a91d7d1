use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::assumptions::{
    CREDIT_SCORE_MAX, CREDIT_SCORE_MIN, DEFAULT_DOWN_PAYMENT_PCT, WEIGHTS,
};

/// Financial snapshot of one applicant. Monetary amounts are monthly unless noted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub net_monthly_income: f64,
    #[serde(default)]
    pub monthly_debts: f64,
    #[serde(default)]
    pub monthly_rent: f64,
    #[serde(default)]
    pub credit_score: Option<u16>,
    /// Liquid savings available for down payment, closing, and reserves.
    #[serde(default)]
    pub savings: f64,
    #[serde(default)]
    pub target_price_min: f64,
    #[serde(default)]
    pub target_price_max: f64,
    #[serde(default)]
    pub down_payment_pct: Option<f64>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub household_size: Option<u8>,
    #[serde(default)]
    pub first_time_buyer: Option<bool>,
}

impl UserProfile {
    /// Midpoint of the target price range.
    pub fn target_price(&self) -> f64 {
        (self.target_price_min + self.target_price_max) / 2.0
    }

    pub fn effective_down_payment_pct(&self) -> f64 {
        self.down_payment_pct.unwrap_or(DEFAULT_DOWN_PAYMENT_PCT)
    }

    /// Boundary check for profiles arriving from untrusted sources. The scoring
    /// functions never call this; they clamp instead.
    pub fn validate(&self) -> Result<(), ReadinessError> {
        let amounts = [
            ("net_monthly_income", self.net_monthly_income),
            ("monthly_debts", self.monthly_debts),
            ("monthly_rent", self.monthly_rent),
            ("savings", self.savings),
            ("target_price_min", self.target_price_min),
            ("target_price_max", self.target_price_max),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ReadinessError::InvalidAmount { field, value });
            }
        }

        if let Some(score) = self.credit_score {
            if !(CREDIT_SCORE_MIN..=CREDIT_SCORE_MAX).contains(&score) {
                return Err(ReadinessError::CreditScoreOutOfRange(score));
            }
        }

        if self.target_price_min > self.target_price_max {
            return Err(ReadinessError::PriceRangeInverted {
                min: self.target_price_min,
                max: self.target_price_max,
            });
        }

        if let Some(pct) = self.down_payment_pct {
            if !(0.0..=100.0).contains(&pct) {
                return Err(ReadinessError::DownPaymentOutOfRange(pct));
            }
        }

        Ok(())
    }
}

/// Boundary check for an assistance amount arriving from a caller.
pub fn validate_dpa_amount(amount: f64) -> Result<f64, ReadinessError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(ReadinessError::InvalidAmount {
            field: "dpa_amount",
            value: amount,
        })
    }
}

/// One normalized sub-score and its share of the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScore {
    pub score: u8,
    pub weight: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub affordability: SubScore,
    pub credit: SubScore,
    pub reserves: SubScore,
    pub packet: SubScore,
}

impl ScoreBreakdown {
    pub fn new(affordability: u8, credit: u8, reserves: u8, packet: u8) -> Self {
        Self {
            affordability: SubScore {
                score: affordability,
                weight: WEIGHTS.affordability,
            },
            credit: SubScore {
                score: credit,
                weight: WEIGHTS.credit,
            },
            reserves: SubScore {
                score: reserves,
                weight: WEIGHTS.reserves,
            },
            packet: SubScore {
                score: packet,
                weight: WEIGHTS.packet,
            },
        }
    }

    pub fn entries(&self) -> [(&'static str, SubScore); 4] {
        [
            ("affordability", self.affordability),
            ("credit", self.credit),
            ("reserves", self.reserves),
            ("packet", self.packet),
        ]
    }
}

/// Weeks contributed by each readiness constraint; the largest one binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EtaBreakdown {
    pub cash_weeks: u32,
    pub credit_weeks: u32,
    pub packet_weeks: u32,
}

impl EtaBreakdown {
    pub fn weeks(&self) -> u32 {
        self.cash_weeks.max(self.credit_weeks).max(self.packet_weeks)
    }

    pub fn binding_constraint(&self) -> Option<&'static str> {
        let weeks = self.weeks();
        if weeks == 0 {
            None
        } else if self.cash_weeks == weeks {
            Some("cash")
        } else if self.credit_weeks == weeks {
            Some("credit")
        } else {
            Some("packet")
        }
    }
}

/// Derived readiness snapshot. Always recomputable from a profile, a DPA amount,
/// packet completeness, and the completed phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub score: u8,
    pub piti_low: u32,
    pub piti_high: u32,
    pub eta_weeks: u32,
    pub breakdown: ScoreBreakdown,
    pub eta: EtaBreakdown,
    pub reserves_months: f64,
    /// Points added on top of the weighted composite by phase boosts.
    #[serde(default)]
    pub bonus: u8,
}

impl ReadinessScore {
    pub fn piti_mid(&self) -> f64 {
        (f64::from(self.piti_low) + f64::from(self.piti_high)) / 2.0
    }
}

/// Checklist stages a buyer completes after the initial assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Documents,
    Credit,
    Packet,
    #[serde(rename = "preapproval")]
    PreApproval,
    Appraisal,
}

impl Phase {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Documents,
            Self::Credit,
            Self::Packet,
            Self::PreApproval,
            Self::Appraisal,
        ]
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Credit => "credit",
            Self::Packet => "packet",
            Self::PreApproval => "preapproval",
            Self::Appraisal => "appraisal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Documents => "Document Upload",
            Self::Credit => "Credit Tune-Up",
            Self::Packet => "Lender Packet",
            Self::PreApproval => "Pre-Approval",
            Self::Appraisal => "Appraisal Prep",
        }
    }

    pub fn position(self) -> usize {
        Self::ordered()
            .iter()
            .position(|phase| *phase == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Phase {
    type Err = ReadinessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|phase| phase.id() == normalized)
            .ok_or_else(|| ReadinessError::UnknownPhase(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Completed,
    Current,
    Upcoming,
}

impl MilestoneStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Current => "Current",
            Self::Upcoming => "Upcoming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadinessError {
    #[error("{field} must be a finite, non-negative amount (got {value})")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("credit score {0} is outside 300-850")]
    CreditScoreOutOfRange(u16),
    #[error("target price minimum {min} exceeds maximum {max}")]
    PriceRangeInverted { min: f64, max: f64 },
    #[error("down payment {0}% is outside 0-100")]
    DownPaymentOutOfRange(f64),
    #[error("unknown phase '{0}'")]
    UnknownPhase(String),
    #[error("phase {phase} cannot be completed before {expected}")]
    PhaseOutOfOrder { phase: Phase, expected: Phase },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            net_monthly_income: 3900.0,
            monthly_debts: 270.0,
            monthly_rent: 1300.0,
            credit_score: Some(630),
            savings: 6200.0,
            target_price_min: 180_000.0,
            target_price_max: 210_000.0,
            down_payment_pct: Some(3.0),
            region: Some("27610".to_string()),
            household_size: Some(2),
            first_time_buyer: Some(true),
        }
    }

    #[test]
    fn target_price_is_range_midpoint() {
        assert_eq!(profile().target_price(), 195_000.0);
    }

    #[test]
    fn missing_down_payment_uses_default() {
        let mut profile = profile();
        profile.down_payment_pct = None;
        assert_eq!(profile.effective_down_payment_pct(), 3.0);
        profile.down_payment_pct = Some(0.0);
        assert_eq!(profile.effective_down_payment_pct(), 0.0);
    }

    #[test]
    fn validate_flags_each_invariant() {
        assert!(profile().validate().is_ok());

        let mut negative = profile();
        negative.savings = -1.0;
        assert!(matches!(
            negative.validate(),
            Err(ReadinessError::InvalidAmount { field: "savings", .. })
        ));

        let mut credit = profile();
        credit.credit_score = Some(900);
        assert_eq!(
            credit.validate(),
            Err(ReadinessError::CreditScoreOutOfRange(900))
        );

        let mut inverted = profile();
        inverted.target_price_min = 250_000.0;
        assert!(matches!(
            inverted.validate(),
            Err(ReadinessError::PriceRangeInverted { .. })
        ));

        let mut down = profile();
        down.down_payment_pct = Some(120.0);
        assert_eq!(
            down.validate(),
            Err(ReadinessError::DownPaymentOutOfRange(120.0))
        );
    }

    #[test]
    fn dpa_amount_must_be_finite_and_non_negative() {
        assert_eq!(validate_dpa_amount(5700.0), Ok(5700.0));
        assert_eq!(validate_dpa_amount(0.0), Ok(0.0));
        assert!(matches!(
            validate_dpa_amount(-1.0),
            Err(ReadinessError::InvalidAmount {
                field: "dpa_amount",
                ..
            })
        ));
        assert!(validate_dpa_amount(f64::NAN).is_err());
        assert!(validate_dpa_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn phases_parse_from_ids() {
        for phase in Phase::ordered() {
            assert_eq!(phase.id().parse::<Phase>(), Ok(phase));
        }
        assert_eq!(" PreApproval ".parse::<Phase>(), Ok(Phase::PreApproval));
        assert!(matches!(
            "closing".parse::<Phase>(),
            Err(ReadinessError::UnknownPhase(_))
        ));
    }

    #[test]
    fn phase_serializes_with_lowercase_ids() {
        let encoded = serde_json::to_string(&Phase::PreApproval).expect("serializes");
        assert_eq!(encoded, "\"preapproval\"");
        assert_eq!(Phase::Appraisal.position(), 4);
    }

    #[test]
    fn eta_breakdown_reports_binding_constraint() {
        let eta = EtaBreakdown {
            cash_weeks: 16,
            credit_weeks: 6,
            packet_weeks: 10,
        };
        assert_eq!(eta.weeks(), 16);
        assert_eq!(eta.binding_constraint(), Some("cash"));
        assert_eq!(EtaBreakdown::default().binding_constraint(), None);
    }
}
