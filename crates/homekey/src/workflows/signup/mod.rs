//! Batch readiness scoring for signup exports.

mod parser;

use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::config::CoachConfig;
use crate::workflows::readiness::{compute_readiness, ReadinessScore, UserProfile};
use parser::ParsedRow;

#[derive(Debug, thiserror::Error)]
pub enum SignupImportError {
    #[error("failed to read signup export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid signup CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredSignup {
    pub line: u64,
    pub email: Option<String>,
    pub profile: UserProfile,
    pub readiness: ReadinessScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedSignup {
    pub line: u64,
    pub email: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupImport {
    pub scored: Vec<ScoredSignup>,
    pub rejected: Vec<RejectedSignup>,
}

impl SignupImport {
    pub fn average_score(&self) -> Option<f64> {
        if self.scored.is_empty() {
            return None;
        }
        let total: u32 = self
            .scored
            .iter()
            .map(|entry| u32::from(entry.readiness.score))
            .sum();
        Some(f64::from(total) / self.scored.len() as f64)
    }

    /// Signups with nothing left to wait for.
    pub fn lender_ready(&self) -> impl Iterator<Item = &ScoredSignup> {
        self.scored
            .iter()
            .filter(|entry| entry.readiness.eta_weeks == 0)
    }
}

pub struct SignupImporter;

impl SignupImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        config: &CoachConfig,
    ) -> Result<SignupImport, SignupImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, config)
    }

    /// Score each valid row with no assistance and an empty packet. Invalid
    /// rows are skipped and reported with their line number.
    pub fn from_reader<R: Read>(
        reader: R,
        config: &CoachConfig,
    ) -> Result<SignupImport, SignupImportError> {
        let mut import = SignupImport::default();

        for parsed in parser::parse_rows(reader)? {
            match parsed {
                ParsedRow::Row { line, row } => {
                    let profile = row.to_profile(config);
                    match profile.validate() {
                        Ok(()) => {
                            let readiness = compute_readiness(&profile, 0.0, 0.0);
                            import.scored.push(ScoredSignup {
                                line,
                                email: row.email,
                                profile,
                                readiness,
                            });
                        }
                        Err(error) => {
                            tracing::warn!(line, %error, "skipping invalid signup row");
                            import.rejected.push(RejectedSignup {
                                line,
                                email: row.email,
                                reason: error.to_string(),
                            });
                        }
                    }
                }
                ParsedRow::Malformed { line, reason } => {
                    tracing::warn!(line, %reason, "skipping malformed signup row");
                    import.rejected.push(RejectedSignup {
                        line,
                        email: None,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            scored = import.scored.len(),
            rejected = import.rejected.len(),
            "signup import finished"
        );
        Ok(import)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "email,income_net,debts_min,credit_score,savings,rent,city_zip,target_price_min,target_price_max,dp_pct\n";

    fn import(rows: &str) -> SignupImport {
        SignupImporter::from_reader(
            Cursor::new(format!("{HEADER}{rows}")),
            &CoachConfig::default(),
        )
        .expect("import succeeds")
    }

    #[test]
    fn valid_rows_are_scored_without_assistance() {
        let result = import(
            "demo@homekey.test,3900,270,630,6200,1300,27610,180000,210000,3\n\
             ready@homekey.test,6000,0,720,30000,0,27601,150000,150000,\n",
        );

        assert!(result.rejected.is_empty());
        assert_eq!(result.scored.len(), 2);

        let demo = &result.scored[0];
        assert_eq!(demo.line, 2);
        assert_eq!(demo.readiness.score, 44);
        assert_eq!(demo.readiness.eta_weeks, 16);

        let ready = &result.scored[1];
        assert_eq!(ready.profile.down_payment_pct, Some(3.0));
        assert_eq!((ready.readiness.piti_low, ready.readiness.piti_high), (1062, 1174));
        assert_eq!(ready.readiness.eta.cash_weeks, 0);
        assert_eq!(result.average_score(), Some(f64::from(44 + ready.readiness.score) / 2.0));
    }

    #[test]
    fn invalid_rows_are_skipped_with_line_numbers() {
        let result = import(
            "low@homekey.test,3900,270,250,6200,0,27610,180000,210000,3\n\
             flip@homekey.test,3900,270,630,6200,0,27610,250000,200000,3\n\
             junk@homekey.test,n/a,270,630,6200,0,27610,180000,210000,3\n\
             fine@homekey.test,3900,270,630,6200,0,27610,180000,210000,3\n",
        );

        assert_eq!(result.scored.len(), 1);
        assert_eq!(result.scored[0].line, 5);

        let lines: Vec<u64> = result.rejected.iter().map(|row| row.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
        assert!(result.rejected[0].reason.contains("credit score 250"));
        assert_eq!(result.rejected[1].email.as_deref(), Some("flip@homekey.test"));
    }

    #[test]
    fn empty_export_has_no_average() {
        let result = import("");
        assert!(result.scored.is_empty());
        assert_eq!(result.average_score(), None);
        assert_eq!(result.lender_ready().count(), 0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = SignupImporter::from_path("/nonexistent/signups.csv", &CoachConfig::default())
            .expect_err("file does not exist");
        assert!(matches!(error, SignupImportError::Io(_)));
    }
}
