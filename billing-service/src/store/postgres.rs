//! PostgreSQL-backed hospital store
//!
//! Relies on the schema from `database_layer::HOSPITAL_SCHEMA`:
//! - `billing.admission_id` is `UNIQUE`, so a duplicate bill is rejected by
//!   the database even when two discharges race
//! - the admissions check constraint keeps discharge dates ordered

use crate::models::*;
use crate::store::HospitalStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use database_layer::{DatabaseError, DatabasePool, DatabaseResult};
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, Row};
use tracing::{debug, info};

const ADMISSION_COLUMNS: &str =
    "admission_id, patient_id, doctor_id, admission_date, discharge_date, reason";

const BILL_COLUMNS: &str = "bill_id, admission_id, amount, status, insurance_provider";

/// PostgreSQL-backed hospital store
#[derive(Clone)]
pub struct PostgresHospitalStore {
    pool: DatabasePool,
}

impl PostgresHospitalStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn admission_from_row(row: &PgRow) -> DatabaseResult<Admission> {
        Ok(Admission {
            id: row.try_get("admission_id")?,
            patient_id: row.try_get("patient_id")?,
            doctor_id: row.try_get("doctor_id")?,
            admission_date: row.try_get("admission_date")?,
            discharge_date: row.try_get("discharge_date")?,
            reason: row.try_get("reason")?,
        })
    }

    fn bill_from_row(row: &PgRow) -> DatabaseResult<Bill> {
        let status: String = row.try_get("status")?;
        Ok(Bill {
            id: row.try_get("bill_id")?,
            admission_id: row.try_get("admission_id")?,
            amount: row.try_get::<Decimal, _>("amount")?,
            status: status.parse().map_err(DatabaseError::QueryFailed)?,
            insurance_provider: row.try_get("insurance_provider")?,
        })
    }

    fn doctor_from_row(row: &PgRow) -> DatabaseResult<Doctor> {
        let department: String = row.try_get("department")?;
        Ok(Doctor {
            id: row.try_get("doctor_id")?,
            name: row.try_get("name")?,
            department: Department::from(department),
        })
    }

    fn patient_from_row(row: &PgRow) -> DatabaseResult<Patient> {
        Ok(Patient {
            id: row.try_get("patient_id")?,
            name: row.try_get("name")?,
            date_of_birth: row.try_get("date_of_birth")?,
            gender: row.try_get("gender")?,
            blood_type: row.try_get("blood_type")?,
        })
    }
}

#[async_trait]
impl HospitalStore for PostgresHospitalStore {
    async fn get_patient(&self, id: PatientId) -> DatabaseResult<Option<Patient>> {
        let row = sqlx::query(
            "SELECT patient_id, name, date_of_birth, gender, blood_type \
             FROM patients WHERE patient_id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        row.as_ref().map(Self::patient_from_row).transpose()
    }

    async fn get_doctor(&self, id: DoctorId) -> DatabaseResult<Option<Doctor>> {
        let row = sqlx::query("SELECT doctor_id, name, department FROM doctors WHERE doctor_id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        row.as_ref().map(Self::doctor_from_row).transpose()
    }

    async fn get_admission(&self, id: AdmissionId) -> DatabaseResult<Option<Admission>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM admissions WHERE admission_id = $1",
            ADMISSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        row.as_ref().map(Self::admission_from_row).transpose()
    }

    async fn get_bill_by_admission(
        &self,
        admission_id: AdmissionId,
    ) -> DatabaseResult<Option<Bill>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM billing WHERE admission_id = $1",
            BILL_COLUMNS
        ))
        .bind(admission_id)
        .fetch_optional(self.pool.pool())
        .await?;

        row.as_ref().map(Self::bill_from_row).transpose()
    }

    async fn list_unbilled_discharged_admissions(&self) -> DatabaseResult<Vec<Admission>> {
        let rows = sqlx::query(
            r#"
            SELECT a.admission_id, a.patient_id, a.doctor_id,
                   a.admission_date, a.discharge_date, a.reason
            FROM admissions a
            LEFT JOIN billing b ON b.admission_id = a.admission_id
            WHERE a.discharge_date IS NOT NULL AND b.bill_id IS NULL
            ORDER BY a.admission_id ASC
            "#,
        )
        .fetch_all(self.pool.pool())
        .await?;

        rows.iter().map(Self::admission_from_row).collect()
    }

    async fn insert_bill(&self, bill: NewBill) -> DatabaseResult<Bill> {
        debug!(admission_id = bill.admission_id, "Inserting bill");

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO billing (admission_id, amount, status, insurance_provider)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (admission_id) DO NOTHING
            RETURNING {}
            "#,
            BILL_COLUMNS
        ))
        .bind(bill.admission_id)
        .bind(bill.amount)
        .bind(bill.status.as_str())
        .bind(bill.insurance_provider.as_deref())
        .fetch_optional(self.pool.pool())
        .await?;

        let Some(row) = row else {
            return Err(DatabaseError::UniqueViolation(format!(
                "billing.admission_id = {}",
                bill.admission_id
            )));
        };

        let stored = Self::bill_from_row(&row)?;
        info!(bill_id = stored.id, admission_id = stored.admission_id, "Bill row inserted");
        Ok(stored)
    }

    async fn set_discharge_date(
        &self,
        admission_id: AdmissionId,
        discharge_date: NaiveDate,
    ) -> DatabaseResult<Option<Admission>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE admissions SET discharge_date = $2
            WHERE admission_id = $1 AND discharge_date IS NULL
            RETURNING {}
            "#,
            ADMISSION_COLUMNS
        ))
        .bind(admission_id)
        .bind(discharge_date)
        .fetch_optional(self.pool.pool())
        .await?;

        row.as_ref().map(Self::admission_from_row).transpose()
    }

    async fn insert_patient(&self, patient: NewPatient) -> DatabaseResult<Patient> {
        let row = sqlx::query(
            r#"
            INSERT INTO patients (name, date_of_birth, gender, blood_type)
            VALUES ($1, $2, $3, $4)
            RETURNING patient_id, name, date_of_birth, gender, blood_type
            "#,
        )
        .bind(&patient.name)
        .bind(patient.date_of_birth)
        .bind(patient.gender.as_deref())
        .bind(patient.blood_type.as_deref())
        .fetch_one(self.pool.pool())
        .await?;

        Self::patient_from_row(&row)
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> DatabaseResult<Doctor> {
        let row = sqlx::query(
            "INSERT INTO doctors (name, department) VALUES ($1, $2) \
             RETURNING doctor_id, name, department",
        )
        .bind(&doctor.name)
        .bind(doctor.department.as_str())
        .fetch_one(self.pool.pool())
        .await?;

        Self::doctor_from_row(&row)
    }

    async fn insert_admission(&self, admission: NewAdmission) -> DatabaseResult<Admission> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO admissions (patient_id, doctor_id, admission_date, discharge_date, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ADMISSION_COLUMNS
        ))
        .bind(admission.patient_id)
        .bind(admission.doctor_id)
        .bind(admission.admission_date)
        .bind(admission.discharge_date)
        .bind(admission.reason.as_deref())
        .fetch_one(self.pool.pool())
        .await?;

        Self::admission_from_row(&row)
    }
}
