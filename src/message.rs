// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::services::premium::{Breakdown, Estimate, PremiumInput, Region};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Missing and `null` are both treated as an empty message.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub success: bool,
}

/// Body of `/api/predict-insurance/`.
///
/// Numbers arrive either as JSON numbers or as the strings an HTML form
/// produces, so they are kept raw until [`PremiumRequest::validate`].
#[derive(Debug, Default, Deserialize)]
pub struct PremiumRequest {
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub bmi: Option<Value>,
    #[serde(default)]
    pub children: Option<Value>,
    #[serde(default)]
    pub smoker: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl PremiumRequest {
    pub fn validate(&self) -> Result<PremiumInput, AppError> {
        let age = count_field("age", self.age.as_ref())?;
        let bmi = bmi_field(self.bmi.as_ref())?;
        let children = count_field("children", self.children.as_ref())?;
        let smoker = self.smoker.as_deref().unwrap_or("no") == "yes";
        let region = Region::from_name(self.region.as_deref().unwrap_or("northeast"));

        Ok(PremiumInput {
            age,
            bmi,
            children,
            smoker,
            region,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PremiumResponse {
    pub predicted_cost: f64,
    pub success: bool,
    pub breakdown: Breakdown,
}

impl From<Estimate> for PremiumResponse {
    fn from(e: Estimate) -> Self {
        Self {
            predicted_cost: e.predicted_cost,
            success: true,
            breakdown: e.breakdown,
        }
    }
}

// Null and missing both mean zero.
fn count_field(name: &str, raw: Option<&Value>) -> Result<u32, AppError> {
    let invalid = || AppError::InvalidInput(format!("{name} must be a non-negative whole number"));
    match raw {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u64)
            })
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<u32>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn bmi_field(raw: Option<&Value>) -> Result<f64, AppError> {
    let invalid = || AppError::InvalidInput("bmi must be a number".to_string());
    let bmi = match raw {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };
    if bmi.is_finite() && bmi >= 0.0 {
        Ok(bmi)
    } else {
        Err(invalid())
    }
}
