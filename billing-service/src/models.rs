use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub type PatientId = i64;
pub type DoctorId = i64;
pub type AdmissionId = i64;
pub type BillId = i64;

/// Insurance provider recorded on every bill created at discharge
pub const PENDING_INSURANCE: &str = "Pending Insurance";

/// Registered patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub blood_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub blood_type: Option<String>,
}

/// Clinical department a doctor belongs to.
///
/// Parsing is total: any value outside the named departments is kept
/// verbatim as [`Department::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Department {
    Cardiology,
    Neurology,
    Oncology,
    Emergency,
    Other(String),
}

impl Department {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cardiology => "Cardiology",
            Self::Neurology => "Neurology",
            Self::Oncology => "Oncology",
            Self::Emergency => "Emergency",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Department {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Cardiology" => Self::Cardiology,
            "Neurology" => Self::Neurology,
            "Oncology" => Self::Oncology,
            "Emergency" => Self::Emergency,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Department {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for Department {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub department: Department,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub department: Department,
}

/// Hospital stay linking a patient and the attending doctor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub id: AdmissionId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub admission_date: NaiveDate,
    /// `None` until the patient is discharged
    pub discharge_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

impl Admission {
    pub fn is_discharged(&self) -> bool {
        self.discharge_date.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdmission {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub admission_date: NaiveDate,
    pub discharge_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

/// Bill status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillStatus {
    Unpaid,
    Paid,
    Pending,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
            Self::Pending => "Pending",
        }
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            "Pending" => Ok(Self::Pending),
            other => Err(format!("unknown bill status '{}'", other)),
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing record, at most one per admission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub admission_id: AdmissionId,
    pub amount: Decimal,
    pub status: BillStatus,
    pub insurance_provider: Option<String>,
}

impl Bill {
    /// Status line reported to whoever triggered the discharge billing
    pub fn confirmation_message(&self) -> String {
        format!(
            "Bill generated for Admission {}: ${:.2}",
            self.admission_id, self.amount
        )
    }
}

/// Bill as handed to the store, which assigns the identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBill {
    pub admission_id: AdmissionId,
    pub amount: Decimal,
    pub status: BillStatus,
    pub insurance_provider: Option<String>,
}

impl NewBill {
    /// Bill raised at discharge: unpaid, insurance still pending
    pub fn at_discharge(admission_id: AdmissionId, amount: Decimal) -> Self {
        Self {
            admission_id,
            amount,
            status: BillStatus::Unpaid,
            insurance_provider: Some(PENDING_INSURANCE.to_string()),
        }
    }
}
