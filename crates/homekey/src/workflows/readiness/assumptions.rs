//! Fixed underwriting assumptions and scoring constants.
//!
//! Every number the readiness pipeline depends on lives here so the weight
//! vector can be checked once, at compile time.

/// Fixed-rate mortgage APR used for every estimate.
pub const ANNUAL_INTEREST_RATE: f64 = 0.07;
pub const LOAN_TERM_MONTHS: i32 = 360;
/// Annual property tax as a share of the purchase price.
pub const PROPERTY_TAX_RATE: f64 = 0.0085;
/// Annual homeowner's insurance as a share of the purchase price.
pub const INSURANCE_RATE: f64 = 0.0035;
/// Multipliers producing the +/-5% payment band.
pub const PAYMENT_BAND_LOW: f64 = 0.95;
pub const PAYMENT_BAND_HIGH: f64 = 1.05;

pub const DEFAULT_DOWN_PAYMENT_PCT: f64 = 3.0;

/// Housing cost to net income ratio at or below which affordability is perfect.
pub const AFFORDABILITY_COMFORT_RATIO: f64 = 0.28;
/// Ratio above which affordability scores zero.
pub const AFFORDABILITY_LIMIT_RATIO: f64 = 0.38;

pub const CREDIT_SCORE_MIN: u16 = 300;
pub const CREDIT_SCORE_MAX: u16 = 850;
/// Credit score that earns full credit points and needs no repair time.
pub const CREDIT_READY_SCORE: u16 = 640;
pub const CREDIT_FLOOR_SCORE: u16 = 580;

/// Months of PITI held in reserve for full reserve points.
pub const RESERVE_TARGET_MONTHS: f64 = 2.0;

pub const CLOSING_COST_RATE: f64 = 0.03;
pub const WEEKS_PER_MONTH: f64 = 4.33;
/// Floor on weekly savings so the cash-gap estimate stays finite.
pub const MIN_WEEKLY_SURPLUS: f64 = 100.0;
pub const CREDIT_REPAIR_WEEKS: u32 = 6;
/// Packet completeness gained per week of document gathering.
pub const PACKET_PERCENT_PER_WEEK: f64 = 10.0;

pub const SCORE_CEILING: u8 = 100;
/// Added to the composite and packet scores for each completed checklist phase.
pub const PHASE_BOOST: u8 = 5;

/// Relative weight of each sub-score in the composite, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    pub affordability: u8,
    pub credit: u8,
    pub reserves: u8,
    pub packet: u8,
}

impl ScoreWeights {
    pub const fn total(&self) -> u16 {
        self.affordability as u16 + self.credit as u16 + self.reserves as u16 + self.packet as u16
    }
}

pub const WEIGHTS: ScoreWeights = ScoreWeights {
    affordability: 40,
    credit: 25,
    reserves: 20,
    packet: 15,
};

const _: () = assert!(WEIGHTS.total() == 100, "score weights must sum to 100");
