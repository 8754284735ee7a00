//! Data store seam for discharge billing.
//!
//! The billing service only sees [`HospitalStore`]; the in-memory store backs
//! tests and local runs, [`PostgresHospitalStore`] backs production.

pub mod postgres;

pub use postgres::PostgresHospitalStore;

use crate::models::*;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::{mapref::entry::Entry, DashMap};
use database_layer::{DatabaseError, DatabaseResult};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Read/write access to the hospital tables
#[async_trait]
pub trait HospitalStore: Send + Sync {
    async fn get_patient(&self, id: PatientId) -> DatabaseResult<Option<Patient>>;

    async fn get_doctor(&self, id: DoctorId) -> DatabaseResult<Option<Doctor>>;

    async fn get_admission(&self, id: AdmissionId) -> DatabaseResult<Option<Admission>>;

    async fn get_bill_by_admission(
        &self,
        admission_id: AdmissionId,
    ) -> DatabaseResult<Option<Bill>>;

    /// Discharged admissions that have no bill yet, ascending by id
    async fn list_unbilled_discharged_admissions(&self) -> DatabaseResult<Vec<Admission>>;

    /// Insert a bill and assign its id.
    ///
    /// Must fail with [`DatabaseError::UniqueViolation`] when the admission
    /// already has a bill, atomically with respect to concurrent inserts.
    async fn insert_bill(&self, bill: NewBill) -> DatabaseResult<Bill>;

    /// Set the discharge date of an admission that has none yet.
    ///
    /// Returns `None` when no undischarged admission with that id exists.
    async fn set_discharge_date(
        &self,
        admission_id: AdmissionId,
        discharge_date: NaiveDate,
    ) -> DatabaseResult<Option<Admission>>;

    async fn insert_patient(&self, patient: NewPatient) -> DatabaseResult<Patient>;

    async fn insert_doctor(&self, doctor: NewDoctor) -> DatabaseResult<Doctor>;

    async fn insert_admission(&self, admission: NewAdmission) -> DatabaseResult<Admission>;
}

/// In-memory hospital store for testing and development
#[derive(Clone)]
pub struct InMemoryHospitalStore {
    patients: Arc<DashMap<PatientId, Patient>>,
    doctors: Arc<DashMap<DoctorId, Doctor>>,
    admissions: Arc<DashMap<AdmissionId, Admission>>,
    /// Keyed by admission id, which is what makes billing unique per admission
    bills: Arc<DashMap<AdmissionId, Bill>>,
    sequences: Arc<Sequences>,
}

#[derive(Default)]
struct Sequences {
    patient: AtomicI64,
    doctor: AtomicI64,
    admission: AtomicI64,
    bill: AtomicI64,
}

fn next_id(sequence: &AtomicI64) -> i64 {
    sequence.fetch_add(1, Ordering::SeqCst) + 1
}

fn check_discharge(admitted: NaiveDate, discharged: Option<NaiveDate>) -> DatabaseResult<()> {
    match discharged {
        Some(date) if date < admitted => Err(DatabaseError::QueryFailed(format!(
            "discharge date {} precedes admission date {}",
            date, admitted
        ))),
        _ => Ok(()),
    }
}

impl InMemoryHospitalStore {
    pub fn new() -> Self {
        Self {
            patients: Arc::new(DashMap::new()),
            doctors: Arc::new(DashMap::new()),
            admissions: Arc::new(DashMap::new()),
            bills: Arc::new(DashMap::new()),
            sequences: Arc::new(Sequences::default()),
        }
    }

    /// Number of bills held, across all admissions
    pub fn bill_count(&self) -> usize {
        self.bills.len()
    }

    #[cfg(test)]
    pub(crate) fn forget_doctor(&self, id: DoctorId) {
        self.doctors.remove(&id);
    }
}

impl Default for InMemoryHospitalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HospitalStore for InMemoryHospitalStore {
    async fn get_patient(&self, id: PatientId) -> DatabaseResult<Option<Patient>> {
        Ok(self.patients.get(&id).map(|p| p.value().clone()))
    }

    async fn get_doctor(&self, id: DoctorId) -> DatabaseResult<Option<Doctor>> {
        Ok(self.doctors.get(&id).map(|d| d.value().clone()))
    }

    async fn get_admission(&self, id: AdmissionId) -> DatabaseResult<Option<Admission>> {
        Ok(self.admissions.get(&id).map(|a| a.value().clone()))
    }

    async fn get_bill_by_admission(
        &self,
        admission_id: AdmissionId,
    ) -> DatabaseResult<Option<Bill>> {
        Ok(self.bills.get(&admission_id).map(|b| b.value().clone()))
    }

    async fn list_unbilled_discharged_admissions(&self) -> DatabaseResult<Vec<Admission>> {
        let mut admissions: Vec<Admission> = self
            .admissions
            .iter()
            .filter(|entry| entry.value().is_discharged())
            .map(|entry| entry.value().clone())
            .collect();
        admissions.retain(|a| !self.bills.contains_key(&a.id));
        admissions.sort_by_key(|a| a.id);
        Ok(admissions)
    }

    async fn insert_bill(&self, bill: NewBill) -> DatabaseResult<Bill> {
        if !self.admissions.contains_key(&bill.admission_id) {
            return Err(DatabaseError::QueryFailed(format!(
                "admission {} does not exist",
                bill.admission_id
            )));
        }
        if bill.amount < Decimal::ZERO {
            return Err(DatabaseError::QueryFailed(format!(
                "negative bill amount {}",
                bill.amount
            )));
        }

        match self.bills.entry(bill.admission_id) {
            Entry::Occupied(_) => Err(DatabaseError::UniqueViolation(format!(
                "billing.admission_id = {}",
                bill.admission_id
            ))),
            Entry::Vacant(slot) => {
                let mut amount = bill.amount;
                amount.rescale(2);
                let stored = Bill {
                    id: next_id(&self.sequences.bill),
                    admission_id: bill.admission_id,
                    amount,
                    status: bill.status,
                    insurance_provider: bill.insurance_provider,
                };
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn set_discharge_date(
        &self,
        admission_id: AdmissionId,
        discharge_date: NaiveDate,
    ) -> DatabaseResult<Option<Admission>> {
        let Some(mut admission) = self.admissions.get_mut(&admission_id) else {
            return Ok(None);
        };
        if admission.is_discharged() {
            return Ok(None);
        }
        check_discharge(admission.admission_date, Some(discharge_date))?;

        admission.discharge_date = Some(discharge_date);
        Ok(Some(admission.clone()))
    }

    async fn insert_patient(&self, patient: NewPatient) -> DatabaseResult<Patient> {
        let stored = Patient {
            id: next_id(&self.sequences.patient),
            name: patient.name,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            blood_type: patient.blood_type,
        };
        self.patients.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> DatabaseResult<Doctor> {
        let stored = Doctor {
            id: next_id(&self.sequences.doctor),
            name: doctor.name,
            department: doctor.department,
        };
        self.doctors.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn insert_admission(&self, admission: NewAdmission) -> DatabaseResult<Admission> {
        if !self.patients.contains_key(&admission.patient_id) {
            return Err(DatabaseError::QueryFailed(format!(
                "patient {} does not exist",
                admission.patient_id
            )));
        }
        if !self.doctors.contains_key(&admission.doctor_id) {
            return Err(DatabaseError::QueryFailed(format!(
                "doctor {} does not exist",
                admission.doctor_id
            )));
        }
        check_discharge(admission.admission_date, admission.discharge_date)?;

        let stored = Admission {
            id: next_id(&self.sequences.admission),
            patient_id: admission.patient_id,
            doctor_id: admission.doctor_id,
            admission_date: admission.admission_date,
            discharge_date: admission.discharge_date,
            reason: admission.reason,
        };
        self.admissions.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
