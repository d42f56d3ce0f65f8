//! Load lender profiles from lenders.csv

use super::{InsuranceBase, InsurancePolicy, LenderProfile, RateKind};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row matching the lenders.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "LenderID")]
    lender_id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "RateKind")]
    rate_kind: String,
    #[serde(rename = "RateValue")]
    rate_value: f64,
    #[serde(rename = "Compounding")]
    compounding: u32,
    #[serde(rename = "ITF")]
    itf: f64,
    #[serde(rename = "NotaryFees")]
    notary_fees: f64,
    #[serde(rename = "RegistryFees")]
    registry_fees: f64,
    #[serde(rename = "AppraisalFee")]
    appraisal_fee: f64,
    #[serde(rename = "InsuranceMode")]
    insurance_mode: String,
    #[serde(rename = "InsuranceAmount")]
    insurance_amount: f64,
    #[serde(rename = "InsuranceRate")]
    insurance_rate: f64,
    #[serde(rename = "InsuranceBase")]
    insurance_base: String,
    #[serde(rename = "CollectInsuranceInFullDeferral")]
    collect_insurance_in_full_deferral: u8,
    #[serde(rename = "MinTermMonths")]
    min_term_months: u32,
    #[serde(rename = "MaxTermMonths")]
    max_term_months: u32,
}

impl CsvRow {
    fn to_profile(self) -> Result<LenderProfile, Box<dyn Error>> {
        let rate_kind = match self.rate_kind.as_str() {
            "TEA" => RateKind::EffectiveAnnual,
            "TNA" => RateKind::NominalAnnual,
            other => return Err(format!("Unknown RateKind: {}", other).into()),
        };

        let insurance = match self.insurance_mode.as_str() {
            "fixed" => InsurancePolicy::Fixed {
                amount: self.insurance_amount,
            },
            "percentage" => {
                let base = match self.insurance_base.as_str() {
                    "balance" => InsuranceBase::PeriodStartBalance,
                    "average_balance" => InsuranceBase::AverageBalance,
                    other => return Err(format!("Unknown InsuranceBase: {}", other).into()),
                };
                InsurancePolicy::Percentage {
                    monthly_rate: self.insurance_rate,
                    base,
                }
            }
            other => return Err(format!("Unknown InsuranceMode: {}", other).into()),
        };

        Ok(LenderProfile {
            lender_id: self.lender_id,
            name: self.name,
            rate_kind,
            rate_value: self.rate_value,
            compounding_per_year: self.compounding,
            tax_rate: self.itf,
            notary_fees: self.notary_fees,
            registry_fees: self.registry_fees,
            appraisal_fee: self.appraisal_fee,
            insurance,
            collect_insurance_in_full_deferral: self.collect_insurance_in_full_deferral != 0,
            min_term_months: self.min_term_months,
            max_term_months: self.max_term_months,
        })
    }
}

/// Load all lender profiles from a CSV file
pub fn load_lenders<P: AsRef<Path>>(path: P) -> Result<Vec<LenderProfile>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut lenders = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        lenders.push(row.to_profile()?);
    }

    log::info!("loaded {} lender profiles", lenders.len());
    Ok(lenders)
}

/// Load lender profiles from any reader (e.g., string buffer, network stream)
pub fn load_lenders_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<LenderProfile>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut lenders = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        lenders.push(row.to_profile()?);
    }

    Ok(lenders)
}

/// Load lender profiles from the default lenders.csv location
pub fn load_default_lenders() -> Result<Vec<LenderProfile>, Box<dyn Error>> {
    load_lenders("lenders.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
LenderID,Name,RateKind,RateValue,Compounding,ITF,NotaryFees,RegistryFees,AppraisalFee,InsuranceMode,InsuranceAmount,InsuranceRate,InsuranceBase,CollectInsuranceInFullDeferral,MinTermMonths,MaxTermMonths
1,Banco Andino,TEA,0.089,12,0.00005,750,400,300,percentage,0,0.00049,balance,0,60,300
2,Caja Norte,TNA,0.085,360,0.00005,600,350,280,fixed,32.5,0,balance,1,36,240
";

    #[test]
    fn test_load_lenders_from_reader() {
        let lenders = load_lenders_from_reader(SAMPLE.as_bytes()).expect("valid sample CSV");
        assert_eq!(lenders.len(), 2);

        let andino = &lenders[0];
        assert_eq!(andino.lender_id, 1);
        assert_eq!(andino.rate_kind, RateKind::EffectiveAnnual);
        assert!(matches!(
            andino.insurance,
            InsurancePolicy::Percentage { .. }
        ));
        assert!(!andino.collect_insurance_in_full_deferral);

        let caja = &lenders[1];
        assert_eq!(caja.rate_kind, RateKind::NominalAnnual);
        assert_eq!(caja.compounding_per_year, 360);
        assert_eq!(
            caja.insurance,
            InsurancePolicy::Fixed { amount: 32.5 }
        );
        assert!(caja.collect_insurance_in_full_deferral);
    }

    #[test]
    fn test_unknown_rate_kind_is_rejected() {
        let bad = "\
LenderID,Name,RateKind,RateValue,Compounding,ITF,NotaryFees,RegistryFees,AppraisalFee,InsuranceMode,InsuranceAmount,InsuranceRate,InsuranceBase,CollectInsuranceInFullDeferral,MinTermMonths,MaxTermMonths
1,Banco X,APR,0.089,12,0.00005,750,400,300,fixed,0,0,balance,0,60,300
";
        assert!(load_lenders_from_reader(bad.as_bytes()).is_err());
    }
}
