//! Lender packet document checklist. The readiness engine only consumes the
//! completeness percentage derived here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Id,
    Income,
    Assets,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Missing,
    Uploaded,
    Verified,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Missing => "Missing",
            Self::Uploaded => "Uploaded",
            Self::Verified => "Verified",
        }
    }

    pub const fn is_received(self) -> bool {
        !matches!(self, Self::Missing)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequiredDocument {
    pub key: &'static str,
    pub label: &'static str,
    pub category: DocumentCategory,
}

pub const REQUIRED_DOCUMENTS: [RequiredDocument; 7] = [
    RequiredDocument {
        key: "driver_license",
        label: "Driver's License or ID",
        category: DocumentCategory::Id,
    },
    RequiredDocument {
        key: "paystub_recent",
        label: "Recent Paystub (within 30 days)",
        category: DocumentCategory::Income,
    },
    RequiredDocument {
        key: "paystub_prior",
        label: "Prior Paystub (2nd most recent)",
        category: DocumentCategory::Income,
    },
    RequiredDocument {
        key: "w2_recent",
        label: "Most Recent W-2",
        category: DocumentCategory::Income,
    },
    RequiredDocument {
        key: "bank_stmt_month1",
        label: "Bank Statement - Month 1",
        category: DocumentCategory::Assets,
    },
    RequiredDocument {
        key: "bank_stmt_month2",
        label: "Bank Statement - Month 2",
        category: DocumentCategory::Assets,
    },
    RequiredDocument {
        key: "credit_report",
        label: "Credit Report (soft pull)",
        category: DocumentCategory::Credit,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub key: String,
    pub status: DocumentStatus,
    pub received_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    pub key: &'static str,
    pub label: &'static str,
    pub category: DocumentCategory,
    pub status: DocumentStatus,
    pub status_label: &'static str,
    pub received_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PacketError {
    #[error("'{0}' is not a required document")]
    UnknownDocument(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChecklist {
    items: Vec<DocumentItem>,
}

impl Default for DocumentChecklist {
    fn default() -> Self {
        Self {
            items: REQUIRED_DOCUMENTS
                .iter()
                .map(|document| DocumentItem {
                    key: document.key.to_string(),
                    status: DocumentStatus::Missing,
                    received_on: None,
                })
                .collect(),
        }
    }
}

impl DocumentChecklist {
    /// Record an upload. Uploads are treated as verified on receipt.
    pub fn record_upload(&mut self, key: &str, on: NaiveDate) -> Result<(), PacketError> {
        self.set_status(key, DocumentStatus::Verified, Some(on))
    }

    pub fn set_status(
        &mut self,
        key: &str,
        status: DocumentStatus,
        received_on: Option<NaiveDate>,
    ) -> Result<(), PacketError> {
        let normalized = key.trim().to_ascii_lowercase();
        let item = self
            .items
            .iter_mut()
            .find(|item| item.key == normalized)
            .ok_or_else(|| PacketError::UnknownDocument(key.to_string()))?;

        item.status = status;
        item.received_on = if status.is_received() {
            received_on
        } else {
            None
        };
        Ok(())
    }

    pub fn received_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status.is_received())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.received_count() == self.items.len()
    }

    /// Share of required documents received, 0-100.
    pub fn completeness_pct(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.received_count() as f64 / self.items.len() as f64 * 100.0
    }

    pub fn missing(&self) -> Vec<&'static str> {
        REQUIRED_DOCUMENTS
            .iter()
            .filter(|document| {
                self.status_of(document.key)
                    .map_or(true, |status| !status.is_received())
            })
            .map(|document| document.label)
            .collect()
    }

    pub fn status_of(&self, key: &str) -> Option<DocumentStatus> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.status)
    }

    pub fn views(&self) -> Vec<DocumentView> {
        REQUIRED_DOCUMENTS
            .iter()
            .map(|document| {
                let item = self.items.iter().find(|item| item.key == document.key);
                let status = item.map_or(DocumentStatus::Missing, |item| item.status);
                DocumentView {
                    key: document.key,
                    label: document.label,
                    category: document.category,
                    status,
                    status_label: status.label(),
                    received_on: item.and_then(|item| item.received_on),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
    }

    #[test]
    fn new_checklist_is_empty() {
        let checklist = DocumentChecklist::default();
        assert_eq!(checklist.completeness_pct(), 0.0);
        assert_eq!(checklist.missing().len(), REQUIRED_DOCUMENTS.len());
        assert!(!checklist.is_complete());
    }

    #[test]
    fn uploads_raise_completeness() {
        let mut checklist = DocumentChecklist::default();
        checklist
            .record_upload("driver_license", today())
            .expect("known document");
        checklist
            .record_upload("PAYSTUB_RECENT", today())
            .expect("keys are case-insensitive");
        checklist
            .record_upload("driver_license", today())
            .expect("re-upload is harmless");

        assert_eq!(checklist.received_count(), 2);
        assert!((checklist.completeness_pct() - 200.0 / 7.0).abs() < 1e-9);
        assert_eq!(
            checklist.status_of("driver_license"),
            Some(DocumentStatus::Verified)
        );
        assert!(!checklist.missing().contains(&"Driver's License or ID"));
    }

    #[test]
    fn full_checklist_is_complete() {
        let mut checklist = DocumentChecklist::default();
        for document in REQUIRED_DOCUMENTS {
            checklist
                .record_upload(document.key, today())
                .expect("known document");
        }
        assert!(checklist.is_complete());
        assert_eq!(checklist.completeness_pct(), 100.0);
        assert!(checklist.missing().is_empty());
    }

    #[test]
    fn unknown_documents_are_rejected() {
        let mut checklist = DocumentChecklist::default();
        let error = checklist
            .record_upload("tax_return_2019", today())
            .expect_err("not on the checklist");
        assert_eq!(error, PacketError::UnknownDocument("tax_return_2019".into()));
    }

    #[test]
    fn resetting_to_missing_clears_receipt_date() {
        let mut checklist = DocumentChecklist::default();
        checklist
            .record_upload("credit_report", today())
            .expect("known document");
        checklist
            .set_status("credit_report", DocumentStatus::Missing, Some(today()))
            .expect("known document");

        let view = checklist
            .views()
            .into_iter()
            .find(|view| view.key == "credit_report")
            .expect("view present");
        assert_eq!(view.status, DocumentStatus::Missing);
        assert!(view.received_on.is_none());
    }
}
