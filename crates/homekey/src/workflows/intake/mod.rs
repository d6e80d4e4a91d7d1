//! Scripted intake conversation that collects a buyer profile one answer at a
//! time and produces the first readiness score.

mod parser;

use serde::{Deserialize, Serialize};

use crate::config::CoachConfig;
use crate::workflows::readiness::{
    compute_readiness, format_dollars, ReadinessScore, UserProfile,
};

/// Used only for answers that never arrived. Explicit zeros are kept.
pub const FALLBACK_NET_INCOME: f64 = 4000.0;
pub const FALLBACK_MONTHLY_DEBTS: f64 = 500.0;
pub const FALLBACK_CREDIT_SCORE: u16 = 650;
pub const FALLBACK_SAVINGS: f64 = 5000.0;
pub const FALLBACK_TARGET_PRICE: f64 = 200_000.0;

/// Rough price-to-payment multiple used when the buyer has no target price.
pub const UNSURE_PRICE_MULTIPLE: f64 = 150.0;
pub const UNSURE_PAYMENT_RATIO: f64 = 0.28;

pub const WELCOME_MESSAGE: &str = "Hi! I'm your HomeKey coach. I'll help you understand what you can \
afford, find down payment assistance, organize your documents, and get lender-ready.\n\n\
We only collect what your plan needs, never pull your credit, and never make lending \
decisions.\n\nReady to get started? Tell me a little about your goals.";

const LOCATION_PROMPT: &str =
    "Great! Where are you looking to buy? A city name or a 5-digit zip code works.";
const LOCATION_RETRY: &str =
    "I need a location to continue. Try a city name or a 5-digit zip code, like \"Raleigh\" or \"27610\".";
const INCOME_PROMPT: &str =
    "Perfect. What's your monthly take-home income after taxes? Just the number, like 4500.";
const INCOME_RETRY: &str =
    "I need a monthly income above zero. Enter just the number, like \"4500\" or \"5,200\".";
const DEBTS_PROMPT: &str = "Thanks! What are your total monthly debt payments? Include credit card \
minimums, student loans, and car payments. Enter \"0\" if you have none.";
const DEBTS_RETRY: &str =
    "I need an amount for your monthly debts, like \"800\" or \"1,200\". Enter \"0\" if you have none.";
const CREDIT_PROMPT: &str =
    "Got it. Do you know your credit score? A best guess like 650 is fine. We won't pull your credit.";
const CREDIT_RETRY: &str =
    "Please give a credit score between 300 and 850. If you're unsure, an estimate like 650 works.";
const SAVINGS_PROMPT: &str =
    "Great! How much have you saved for a down payment and closing costs?";
const SAVINGS_RETRY: &str =
    "I need a savings amount, like \"5000\" or \"10,000\". Enter \"0\" if you're just starting.";
const PRICE_PROMPT: &str = "Last question: what's your target home price? If you don't have one \
yet, say \"not sure\" and I'll estimate one from your income.";
const HELP_MENU: &str = "I'm here to help! Ask me about what you can afford, down payment \
assistance programs, the documents you'll need, raising your readiness score, or timeline \
expectations.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    #[default]
    Welcome,
    Location,
    Income,
    Debts,
    Credit,
    Savings,
    TargetPrice,
    Complete,
}

impl IntakeStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Location => "Location",
            Self::Income => "Income",
            Self::Debts => "Monthly Debts",
            Self::Credit => "Credit Score",
            Self::Savings => "Savings",
            Self::TargetPrice => "Target Price",
            Self::Complete => "Complete",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeAnswers {
    pub region: Option<String>,
    pub net_monthly_income: Option<f64>,
    pub monthly_debts: Option<f64>,
    pub credit_score: Option<u16>,
    pub savings: Option<f64>,
    pub target_price: Option<f64>,
}

impl IntakeAnswers {
    /// Assemble a single-price profile, filling gaps from fallbacks and config.
    pub fn to_profile(&self, config: &CoachConfig) -> UserProfile {
        let price = self
            .target_price
            .filter(|price| price.is_finite() && *price > 0.0)
            .unwrap_or(FALLBACK_TARGET_PRICE);

        UserProfile {
            net_monthly_income: self.net_monthly_income.unwrap_or(FALLBACK_NET_INCOME),
            monthly_debts: self.monthly_debts.unwrap_or(FALLBACK_MONTHLY_DEBTS),
            monthly_rent: 0.0,
            credit_score: Some(self.credit_score.unwrap_or(FALLBACK_CREDIT_SCORE)),
            savings: self.savings.unwrap_or(FALLBACK_SAVINGS),
            target_price_min: price,
            target_price_max: price,
            down_payment_pct: Some(config.default_down_payment_pct),
            region: Some(
                self.region
                    .clone()
                    .unwrap_or_else(|| config.default_region.clone()),
            ),
            household_size: None,
            first_time_buyer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedIntake {
    pub profile: UserProfile,
    pub readiness: ReadinessScore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntakeReply {
    pub message: String,
    pub step: IntakeStep,
    /// Present only on the turn that finishes the intake.
    pub completed: Option<CompletedIntake>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeConversation {
    step: IntakeStep,
    answers: IntakeAnswers,
}

impl IntakeConversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    pub fn answers(&self) -> &IntakeAnswers {
        &self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.step == IntakeStep::Complete
    }

    /// Consume one buyer message. Invalid answers repeat the current step.
    pub fn respond(&mut self, input: &str, config: &CoachConfig) -> IntakeReply {
        let (message, next) = match self.step {
            IntakeStep::Welcome => (LOCATION_PROMPT.to_string(), IntakeStep::Location),
            IntakeStep::Location if parser::is_location(input) => {
                if let Some(zip) = parser::extract_zip(input) {
                    self.answers.region = Some(zip.to_string());
                }
                (INCOME_PROMPT.to_string(), IntakeStep::Income)
            }
            IntakeStep::Location => (LOCATION_RETRY.to_string(), IntakeStep::Location),
            IntakeStep::Income => match parser::first_amount(input).filter(|income| *income > 0.0) {
                Some(income) => {
                    self.answers.net_monthly_income = Some(income);
                    (DEBTS_PROMPT.to_string(), IntakeStep::Debts)
                }
                None => (INCOME_RETRY.to_string(), IntakeStep::Income),
            },
            IntakeStep::Debts => match parser::first_amount(input) {
                Some(debts) => {
                    self.answers.monthly_debts = Some(debts);
                    (CREDIT_PROMPT.to_string(), IntakeStep::Credit)
                }
                None => (DEBTS_RETRY.to_string(), IntakeStep::Debts),
            },
            IntakeStep::Credit => match parser::first_credit_score(input) {
                Some(score) => {
                    self.answers.credit_score = Some(score);
                    (SAVINGS_PROMPT.to_string(), IntakeStep::Savings)
                }
                None => (CREDIT_RETRY.to_string(), IntakeStep::Credit),
            },
            IntakeStep::Savings => match parser::first_amount(input) {
                Some(savings) => {
                    self.answers.savings = Some(savings);
                    (PRICE_PROMPT.to_string(), IntakeStep::TargetPrice)
                }
                None => (SAVINGS_RETRY.to_string(), IntakeStep::Savings),
            },
            IntakeStep::TargetPrice => {
                self.answers.target_price = self.target_price_from(input);
                return self.finish(config);
            }
            IntakeStep::Complete => (HELP_MENU.to_string(), IntakeStep::Complete),
        };

        self.step = next;
        IntakeReply {
            message,
            step: next,
            completed: None,
        }
    }

    fn target_price_from(&self, input: &str) -> Option<f64> {
        if let Some(price) = parser::first_amount(input) {
            return Some(price);
        }
        if parser::is_unsure(input) {
            let income = self
                .answers
                .net_monthly_income
                .unwrap_or(FALLBACK_NET_INCOME);
            return Some(income * UNSURE_PAYMENT_RATIO * UNSURE_PRICE_MULTIPLE);
        }
        None
    }

    fn finish(&mut self, config: &CoachConfig) -> IntakeReply {
        let profile = self.answers.to_profile(config);
        let readiness = compute_readiness(&profile, 0.0, 0.0);
        self.step = IntakeStep::Complete;

        let message = format!(
            "Perfect! I've put together your readiness plan.\n\n\
             - Recommended payment range: {}-{}/month\n\
             - Readiness score: {}/100\n\
             - Estimated time to lender-ready: {} weeks\n\n\
             When you're ready, start uploading documents to move to the next phase.",
            format_dollars(readiness.piti_low),
            format_dollars(readiness.piti_high),
            readiness.score,
            readiness.eta_weeks,
        );

        IntakeReply {
            message,
            step: IntakeStep::Complete,
            completed: Some(CompletedIntake { profile, readiness }),
        }
    }
}
