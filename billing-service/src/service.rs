use crate::calculator::DischargeCharge;
use crate::error::{BillingError, BillingResult};
use crate::models::*;
use crate::rates::RateTable;
use crate::store::HospitalStore;
use chrono::NaiveDate;
use logger_redacted::PiiRedactor;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of billing every outstanding discharge
#[derive(Debug, Default)]
pub struct BatchBillingOutcome {
    pub generated: Vec<Bill>,
    pub failed: Vec<(AdmissionId, BillingError)>,
}

impl BatchBillingOutcome {
    pub fn total_billed(&self) -> Decimal {
        self.generated.iter().map(|b| b.amount).sum()
    }
}

/// Discharge billing service
pub struct DischargeBillingService {
    store: Arc<dyn HospitalStore>,
    rates: RateTable,
    redactor: PiiRedactor,
}

impl DischargeBillingService {
    /// Create a billing service over a store, using the standard tariff
    pub fn new(store: Arc<dyn HospitalStore>) -> Self {
        Self {
            store,
            rates: RateTable::standard(),
            redactor: PiiRedactor::default(),
        }
    }

    pub fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_redactor(mut self, redactor: PiiRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Compute and persist the bill for a discharged admission.
    ///
    /// Exactly one bill row is written on success. A second call for the same
    /// admission fails with [`BillingError::Conflict`].
    pub async fn generate_discharge_bill(&self, admission_id: AdmissionId) -> BillingResult<Bill> {
        let charge = self.quote_discharge_bill(admission_id).await?;

        if self.store.get_bill_by_admission(admission_id).await?.is_some() {
            warn!(admission_id, "Admission already billed");
            return Err(BillingError::Conflict { admission_id });
        }

        // The store enforces uniqueness again at insert; a racing caller lands here
        let bill = self
            .store
            .insert_bill(NewBill::at_discharge(admission_id, charge.amount))
            .await
            .map_err(|e| BillingError::from_insert(admission_id, e))?;

        info!(
            admission_id,
            bill_id = bill.id,
            department = %charge.department,
            days_stayed = charge.days_stayed,
            amount = %bill.amount,
            "{}",
            bill.confirmation_message()
        );

        Ok(bill)
    }

    /// Compute the discharge charge without writing anything
    pub async fn quote_discharge_bill(
        &self,
        admission_id: AdmissionId,
    ) -> BillingResult<DischargeCharge> {
        let admission = self.load_admission(admission_id).await?;

        if !admission.is_discharged() {
            return Err(BillingError::InvalidState(format!(
                "Admission {} has not been discharged",
                admission_id
            )));
        }

        if let Some(reason) = &admission.reason {
            debug!(admission_id, reason = %self.redactor.redact(reason), "Pricing admission");
        }

        let doctor = self
            .store
            .get_doctor(admission.doctor_id)
            .await?
            .ok_or(BillingError::NotFound {
                entity: "Doctor",
                id: admission.doctor_id,
            })?;

        DischargeCharge::compute(&admission, &doctor, &self.rates)
    }

    /// Record the discharge date of an admission that is still open
    pub async fn record_discharge(
        &self,
        admission_id: AdmissionId,
        discharge_date: NaiveDate,
    ) -> BillingResult<Admission> {
        let admission = self.load_admission(admission_id).await?;

        if let Some(existing) = admission.discharge_date {
            return Err(BillingError::InvalidState(format!(
                "Admission {} was already discharged on {}",
                admission_id, existing
            )));
        }
        if discharge_date < admission.admission_date {
            return Err(BillingError::InvalidState(format!(
                "Discharge date {} precedes admission date {}",
                discharge_date, admission.admission_date
            )));
        }

        let updated = self
            .store
            .set_discharge_date(admission_id, discharge_date)
            .await?
            .ok_or_else(|| {
                BillingError::InvalidState(format!(
                    "Admission {} was discharged concurrently",
                    admission_id
                ))
            })?;

        info!(admission_id, %discharge_date, "Discharge recorded");
        Ok(updated)
    }

    /// Bill every discharged admission that has no bill yet.
    ///
    /// Failures are collected per admission; one bad record does not stop the run.
    pub async fn generate_outstanding_bills(&self) -> BillingResult<BatchBillingOutcome> {
        let pending = self.store.list_unbilled_discharged_admissions().await?;
        let mut outcome = BatchBillingOutcome::default();

        for admission in pending {
            match self.generate_discharge_bill(admission.id).await {
                Ok(bill) => outcome.generated.push(bill),
                Err(e) => {
                    warn!(admission_id = admission.id, error = %e, "Discharge billing failed");
                    outcome.failed.push((admission.id, e));
                }
            }
        }

        info!(
            generated = outcome.generated.len(),
            failed = outcome.failed.len(),
            total = %outcome.total_billed(),
            "Outstanding discharge billing finished"
        );

        Ok(outcome)
    }

    /// Bill previously generated for an admission
    pub async fn bill_for_admission(&self, admission_id: AdmissionId) -> BillingResult<Bill> {
        self.store
            .get_bill_by_admission(admission_id)
            .await?
            .ok_or(BillingError::NotFound {
                entity: "Bill for admission",
                id: admission_id,
            })
    }

    async fn load_admission(&self, admission_id: AdmissionId) -> BillingResult<Admission> {
        self.store
            .get_admission(admission_id)
            .await?
            .ok_or(BillingError::NotFound {
                entity: "Admission",
                id: admission_id,
            })
    }
}
