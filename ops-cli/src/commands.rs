use crate::cli::{AdmissionCommand, BillCommand};
use billing_service::{BillingError, BillingResult, DischargeBillingService, RateTable};

/// Run a billing subcommand and return the lines to print
pub async fn run_bill(
    service: &DischargeBillingService,
    command: &BillCommand,
) -> BillingResult<Vec<String>> {
    match command {
        BillCommand::Generate(arg) => {
            let bill = service.generate_discharge_bill(arg.admission_id).await?;
            Ok(vec![bill.confirmation_message()])
        }
        BillCommand::Quote(arg) => {
            let charge = service.quote_discharge_bill(arg.admission_id).await?;
            Ok(vec![format!(
                "Admission {} ({}): {} day(s) x ${:.2} + ${:.2} base fee = ${:.2}",
                charge.admission_id,
                charge.department,
                charge.days_stayed,
                charge.daily_rate,
                charge.base_fee,
                charge.amount
            )])
        }
        BillCommand::Show(arg) => {
            let bill = service.bill_for_admission(arg.admission_id).await?;
            let json = serde_json::to_string_pretty(&bill)
                .map_err(|e| BillingError::InvalidState(format!("Unprintable bill: {}", e)))?;
            Ok(vec![json])
        }
        BillCommand::Outstanding => {
            let outcome = service.generate_outstanding_bills().await?;
            let mut lines: Vec<String> = outcome
                .generated
                .iter()
                .map(|bill| bill.confirmation_message())
                .collect();
            lines.extend(
                outcome
                    .failed
                    .iter()
                    .map(|(admission_id, err)| format!("Admission {}: {}", admission_id, err)),
            );
            lines.push(format!(
                "Generated {} bill(s) totalling ${:.2}, {} failed",
                outcome.generated.len(),
                outcome.total_billed(),
                outcome.failed.len()
            ));
            Ok(lines)
        }
    }
}

pub async fn run_admission(
    service: &DischargeBillingService,
    command: &AdmissionCommand,
) -> BillingResult<Vec<String>> {
    match command {
        AdmissionCommand::Discharge { admission_id, date } => {
            let admission = service.record_discharge(*admission_id, *date).await?;
            Ok(vec![format!(
                "Admission {} discharged on {}",
                admission.id, date
            )])
        }
    }
}

/// Render the rate table, default rate last
pub fn render_rates(rates: &RateTable) -> Vec<String> {
    let mut lines: Vec<String> = rates
        .entries()
        .into_iter()
        .map(|(department, rate)| format!("{:<12} ${:.2}/day", department.as_str(), rate))
        .collect();
    lines.push(format!("{:<12} ${:.2}/day", "(default)", rates.default_rate()));
    lines.push(format!("{:<12} ${:.2}", "Base fee", rates.base_fee()));
    lines
}
