//! End-to-end discharge billing against the in-memory store

use async_trait::async_trait;
use billing_service::*;
use chrono::NaiveDate;
use database_layer::DatabaseResult;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Ward {
    store: Arc<InMemoryHospitalStore>,
    service: DischargeBillingService,
}

impl Ward {
    fn new() -> Self {
        let store = Arc::new(InMemoryHospitalStore::new());
        let service = DischargeBillingService::new(store.clone());
        Self { store, service }
    }

    async fn admit(
        &self,
        department: &str,
        admitted: NaiveDate,
        discharged: Option<NaiveDate>,
    ) -> Admission {
        let patient = self
            .store
            .insert_patient(NewPatient {
                name: "Alan Turing".to_string(),
                date_of_birth: date(1954, 6, 7),
                gender: Some("M".to_string()),
                blood_type: Some("A-".to_string()),
            })
            .await
            .unwrap();
        let doctor = self
            .store
            .insert_doctor(NewDoctor {
                name: "Dr. Quinn".to_string(),
                department: Department::from(department),
            })
            .await
            .unwrap();
        self.store
            .insert_admission(NewAdmission {
                patient_id: patient.id,
                doctor_id: doctor.id,
                admission_date: admitted,
                discharge_date: discharged,
                reason: Some("Chest pain".to_string()),
            })
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_week_long_cardiology_stay() {
    let ward = Ward::new();
    let admission = ward
        .admit("Cardiology", date(2024, 1, 1), Some(date(2024, 1, 8)))
        .await;

    let charge = ward.service.quote_discharge_bill(admission.id).await.unwrap();
    assert_eq!(charge.days_stayed, 7);

    let bill = ward.service.generate_discharge_bill(admission.id).await.unwrap();
    assert_eq!(bill.admission_id, admission.id);
    assert_eq!(bill.amount, dec!(11000.00));
    assert_eq!(bill.status, BillStatus::Unpaid);
    assert_eq!(bill.insurance_provider.as_deref(), Some("Pending Insurance"));
    assert_eq!(
        bill.confirmation_message(),
        format!("Bill generated for Admission {}: $11000.00", admission.id)
    );
}

#[tokio::test]
async fn test_same_day_emergency_discharge() {
    let ward = Ward::new();
    let day = date(2024, 7, 4);
    let admission = ward.admit("Emergency", day, Some(day)).await;

    let bill = ward.service.generate_discharge_bill(admission.id).await.unwrap();
    assert_eq!(bill.amount, dec!(1700.00));
    assert_eq!(bill.amount.to_string(), "1700.00");
}

#[tokio::test]
async fn test_every_department_rate() {
    let ward = Ward::new();
    let cases = [
        ("Cardiology", dec!(3500.00)),
        ("Neurology", dec!(4100.00)),
        ("Oncology", dec!(4500.00)),
        ("Emergency", dec!(2900.00)),
        ("Dermatology", dec!(2500.00)),
    ];

    for (department, expected) in cases {
        let admission = ward
            .admit(department, date(2024, 9, 1), Some(date(2024, 9, 3)))
            .await;
        let bill = ward.service.generate_discharge_bill(admission.id).await.unwrap();
        assert_eq!(bill.amount, expected, "department {}", department);
    }
}

#[tokio::test]
async fn test_second_call_conflicts_and_keeps_one_bill() {
    let ward = Ward::new();
    let admission = ward
        .admit("Oncology", date(2024, 3, 1), Some(date(2024, 3, 5)))
        .await;

    let first = assert_ok!(ward.service.generate_discharge_bill(admission.id).await);
    assert_eq!(first.status, BillStatus::Unpaid);

    let second = assert_err!(ward.service.generate_discharge_bill(admission.id).await);
    assert!(matches!(second, BillingError::Conflict { admission_id } if admission_id == admission.id));
    assert_eq!(second.code(), "BILLING_5003");

    assert_eq!(ward.store.bill_count(), 1);
    assert_eq!(
        ward.store.get_bill_by_admission(admission.id).await.unwrap(),
        Some(first)
    );
}

#[tokio::test]
async fn test_unknown_admission_is_not_found() {
    let ward = Ward::new();

    let err = ward.service.generate_discharge_bill(999).await.unwrap_err();
    assert!(matches!(err, BillingError::NotFound { entity: "Admission", id: 999 }));
    assert_eq!(ward.store.bill_count(), 0);
}

#[tokio::test]
async fn test_open_admission_is_invalid_state() {
    let ward = Ward::new();
    let admission = ward.admit("Neurology", date(2024, 3, 1), None).await;

    let err = ward.service.generate_discharge_bill(admission.id).await.unwrap_err();
    assert!(matches!(err, BillingError::InvalidState(_)));
    assert_eq!(err.code(), "BILLING_5002");
    assert_eq!(ward.store.bill_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_discharge_billing_bills_once() {
    let ward = Ward::new();
    let admission = ward
        .admit("Cardiology", date(2024, 5, 1), Some(date(2024, 5, 2)))
        .await;
    let admission_id = admission.id;
    let service = Arc::new(ward.service);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.generate_discharge_bill(admission_id).await })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(BillingError::Conflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(ward.store.bill_count(), 1);
}

#[tokio::test]
async fn test_outstanding_bills_skip_open_and_billed_admissions() {
    let ward = Ward::new();
    let already_billed = ward
        .admit("Emergency", date(2024, 8, 1), Some(date(2024, 8, 1)))
        .await;
    let still_open = ward.admit("Oncology", date(2024, 8, 2), None).await;
    let first_pending = ward
        .admit("Neurology", date(2024, 8, 1), Some(date(2024, 8, 4)))
        .await;
    let second_pending = ward
        .admit("Pediatrics", date(2024, 8, 3), Some(date(2024, 8, 4)))
        .await;

    ward.service
        .generate_discharge_bill(already_billed.id)
        .await
        .unwrap();

    let outcome = ward.service.generate_outstanding_bills().await.unwrap();

    let billed: Vec<_> = outcome.generated.iter().map(|b| b.admission_id).collect();
    assert_eq!(billed, vec![first_pending.id, second_pending.id]);
    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.total_billed(), dec!(7400.00));

    assert!(ward
        .store
        .get_bill_by_admission(still_open.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(ward.store.bill_count(), 3);
}

/// Store whose bill lookup never sees an existing bill, so duplicates are
/// only caught by the unique insert
struct StaleBillLookup(InMemoryHospitalStore);

#[async_trait]
impl HospitalStore for StaleBillLookup {
    async fn get_patient(&self, id: PatientId) -> DatabaseResult<Option<Patient>> {
        self.0.get_patient(id).await
    }

    async fn get_doctor(&self, id: DoctorId) -> DatabaseResult<Option<Doctor>> {
        self.0.get_doctor(id).await
    }

    async fn get_admission(&self, id: AdmissionId) -> DatabaseResult<Option<Admission>> {
        self.0.get_admission(id).await
    }

    async fn get_bill_by_admission(&self, _: AdmissionId) -> DatabaseResult<Option<Bill>> {
        Ok(None)
    }

    async fn list_unbilled_discharged_admissions(&self) -> DatabaseResult<Vec<Admission>> {
        self.0.list_unbilled_discharged_admissions().await
    }

    async fn insert_bill(&self, bill: NewBill) -> DatabaseResult<Bill> {
        self.0.insert_bill(bill).await
    }

    async fn set_discharge_date(
        &self,
        admission_id: AdmissionId,
        discharge_date: NaiveDate,
    ) -> DatabaseResult<Option<Admission>> {
        self.0.set_discharge_date(admission_id, discharge_date).await
    }

    async fn insert_patient(&self, patient: NewPatient) -> DatabaseResult<Patient> {
        self.0.insert_patient(patient).await
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> DatabaseResult<Doctor> {
        self.0.insert_doctor(doctor).await
    }

    async fn insert_admission(&self, admission: NewAdmission) -> DatabaseResult<Admission> {
        self.0.insert_admission(admission).await
    }
}

#[tokio::test]
async fn test_unique_insert_reports_conflict() {
    let ward = Ward::new();
    let admission = ward
        .admit("Oncology", date(2024, 9, 1), Some(date(2024, 9, 3)))
        .await;
    let service = DischargeBillingService::new(Arc::new(StaleBillLookup((*ward.store).clone())));

    let bill = assert_ok!(service.generate_discharge_bill(admission.id).await);
    assert_eq!(bill.amount, dec!(4500.00));

    let err = assert_err!(service.generate_discharge_bill(admission.id).await);
    assert!(matches!(err, BillingError::Conflict { admission_id } if admission_id == admission.id));
    assert_eq!(err.code(), "BILLING_5003");
    assert_eq!(ward.store.bill_count(), 1);
}
