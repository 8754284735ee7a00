use crate::error::{BillingError, BillingResult};
use crate::models::{Admission, AdmissionId, Department, Doctor};
use crate::rates::RateTable;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Billable days between admission and discharge, never less than one.
///
/// A same-day discharge (or a discharge dated before admission) bills one day.
pub fn length_of_stay(admitted: NaiveDate, discharged: NaiveDate) -> i64 {
    discharged.signed_duration_since(admitted).num_days().max(1)
}

/// Breakdown of a discharge charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DischargeCharge {
    pub admission_id: AdmissionId,
    pub department: Department,
    pub days_stayed: i64,
    pub daily_rate: Decimal,
    pub base_fee: Decimal,
    /// `base_fee + days_stayed * daily_rate`, scale 2
    pub amount: Decimal,
}

impl DischargeCharge {
    pub fn compute(
        admission: &Admission,
        doctor: &Doctor,
        rates: &RateTable,
    ) -> BillingResult<Self> {
        let discharged = admission.discharge_date.ok_or_else(|| {
            BillingError::InvalidState(format!(
                "Admission {} has no discharge date",
                admission.id
            ))
        })?;

        let days_stayed = length_of_stay(admission.admission_date, discharged);
        let daily_rate = rates.daily_rate(&doctor.department);
        let base_fee = rates.base_fee();

        let mut amount = Decimal::from(days_stayed)
            .checked_mul(daily_rate)
            .and_then(|stay| stay.checked_add(base_fee))
            .ok_or_else(|| {
                BillingError::InvalidState(format!(
                    "Charge for admission {} overflows",
                    admission.id
                ))
            })?;
        amount.rescale(2);

        Ok(Self {
            admission_id: admission.id,
            department: doctor.department.clone(),
            days_stayed,
            daily_rate,
            base_fee,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn admission(admitted: NaiveDate, discharged: Option<NaiveDate>) -> Admission {
        Admission {
            id: 1,
            patient_id: 1,
            doctor_id: 1,
            admission_date: admitted,
            discharge_date: discharged,
            reason: None,
        }
    }

    fn doctor(department: &str) -> Doctor {
        Doctor {
            id: 1,
            name: "Dr. Grey".to_string(),
            department: Department::from(department),
        }
    }

    #[test]
    fn test_week_in_cardiology() {
        let charge = DischargeCharge::compute(
            &admission(date(2024, 1, 1), Some(date(2024, 1, 8))),
            &doctor("Cardiology"),
            &RateTable::standard(),
        )
        .unwrap();

        assert_eq!(charge.days_stayed, 7);
        assert_eq!(charge.daily_rate, dec!(1500));
        assert_eq!(charge.amount, dec!(11000.00));
        assert_eq!(charge.amount.to_string(), "11000.00");
    }

    #[test]
    fn test_same_day_emergency() {
        let day = date(2024, 3, 15);
        let charge = DischargeCharge::compute(
            &admission(day, Some(day)),
            &doctor("Emergency"),
            &RateTable::standard(),
        )
        .unwrap();

        assert_eq!(charge.days_stayed, 1);
        assert_eq!(charge.amount, dec!(1700.00));
    }

    #[test]
    fn test_discharge_before_admission_bills_one_day() {
        assert_eq!(length_of_stay(date(2024, 5, 10), date(2024, 5, 2)), 1);
    }

    #[test]
    fn test_undischarged_admission_is_rejected() {
        let err = DischargeCharge::compute(
            &admission(date(2024, 1, 1), None),
            &doctor("Oncology"),
            &RateTable::standard(),
        )
        .unwrap_err();

        assert!(matches!(err, BillingError::InvalidState(_)));
    }

    #[test]
    fn test_leap_day_stay() {
        assert_eq!(length_of_stay(date(2024, 2, 28), date(2024, 3, 1)), 2);
    }

    proptest! {
        #[test]
        fn prop_same_day_discharge_is_one_day(offset in 0i64..20_000) {
            let day = date(2000, 1, 1) + Duration::days(offset);
            prop_assert_eq!(length_of_stay(day, day), 1);
        }

        #[test]
        fn prop_positive_stays_are_exact(offset in 0i64..20_000, stay in 1i64..3_650) {
            let admitted = date(2000, 1, 1) + Duration::days(offset);
            let discharged = admitted + Duration::days(stay);
            prop_assert_eq!(length_of_stay(admitted, discharged), stay);
        }

        #[test]
        fn prop_amount_is_base_plus_daily_rate(
            stay in 0i64..365,
            department in prop::sample::select(vec![
                ("Cardiology", 1500i64),
                ("Neurology", 1800),
                ("Oncology", 2000),
                ("Emergency", 1200),
                ("Radiology", 1000),
                ("", 1000),
            ]),
        ) {
            let admitted = date(2023, 6, 1);
            let charge = DischargeCharge::compute(
                &admission(admitted, Some(admitted + Duration::days(stay))),
                &doctor(department.0),
                &RateTable::standard(),
            ).unwrap();

            let days = stay.max(1);
            prop_assert_eq!(charge.days_stayed, days);
            prop_assert_eq!(charge.amount, Decimal::from(500 + days * department.1));
            prop_assert_eq!(charge.amount.scale(), 2);
        }
    }
}
