use std::fmt;

use serde::{Serialize, Serializer};

/// Fixed discount rate for net present value.
pub const DISCOUNT_RATE: f64 = 0.06;

/// Time to recover the installation cost from yearly savings.
///
/// Reported under the historical name "ROI", although the value is a
/// payback period in years rather than a return ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payback {
    Years(f64),
    /// Savings never cover the cost (no savings, or no cost to recover).
    Never,
}

impl Payback {
    pub fn years(self) -> Option<f64> {
        match self {
            Self::Years(y) => Some(y),
            Self::Never => None,
        }
    }

    /// Flat numeric form where `Never` is `f64::MAX`.
    ///
    /// For legacy consumers only; never compare the sentinel numerically.
    pub fn as_years_or_sentinel(self) -> f64 {
        self.years().unwrap_or(f64::MAX)
    }
}

impl Serialize for Payback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.years().serialize(serializer)
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(y) => write!(f, "{y:.1} years"),
            Self::Never => f.write_str("never"),
        }
    }
}

/// Investment figures over a fixed horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialAnalysis {
    pub installation_cost: f64,
    pub annual_savings: f64,
    /// Payback period in years (historically named ROI).
    #[serde(rename = "roi_years")]
    pub roi: Payback,
    /// Net present value over `horizon_years` at [`DISCOUNT_RATE`].
    pub npv: f64,
    /// Simple yearly yield `savings / cost`, in percent. Not a root-found IRR.
    pub irr_pct: f64,
    /// Undiscounted savings after 10 years.
    pub cumulative_savings_10: f64,
    /// Undiscounted savings after 20 years.
    pub cumulative_savings_20: f64,
    pub horizon_years: u32,
}

/// Computes NPV, the IRR proxy, payback, and cumulative savings.
pub fn financial_analysis(
    installation_cost: f64,
    annual_savings: f64,
    years: u32,
) -> FinancialAnalysis {
    let npv = net_present_value(installation_cost, annual_savings, years);
    let profitable = installation_cost > 0.0 && annual_savings > 0.0;

    let irr_pct = if profitable {
        annual_savings / installation_cost * 100.0
    } else {
        0.0
    };
    let roi = if profitable {
        Payback::Years(installation_cost / annual_savings)
    } else {
        Payback::Never
    };

    FinancialAnalysis {
        installation_cost,
        annual_savings,
        roi,
        npv,
        irr_pct,
        cumulative_savings_10: annual_savings * 10.0,
        cumulative_savings_20: annual_savings * 20.0,
        horizon_years: years,
    }
}

/// `-cost + Σ savings / (1 + r)^i` for `i` in `1..=years`.
pub fn net_present_value(installation_cost: f64, annual_savings: f64, years: u32) -> f64 {
    let mut npv = -installation_cost;
    for i in 1..=years {
        npv += annual_savings / (1.0 + DISCOUNT_RATE).powf(f64::from(i));
    }
    npv
}
