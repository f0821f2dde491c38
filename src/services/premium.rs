// src/services/premium.rs
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const BASE_COST: u64 = 3000;
pub const COST_PER_YEAR: u64 = 240;
pub const COST_PER_CHILD: u64 = 500;
pub const SMOKER_COST: u64 = 23_000;
pub const JITTER_MIN: f64 = 0.95;
pub const JITTER_MAX: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Region {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "northeast" => Some(Region::Northeast),
            "northwest" => Some(Region::Northwest),
            "southeast" => Some(Region::Southeast),
            "southwest" => Some(Region::Southwest),
            _ => None,
        }
    }

    pub fn cost(self) -> u64 {
        match self {
            Region::Northeast => 0,
            Region::Northwest => 500,
            Region::Southeast => 1000,
            Region::Southwest => 750,
        }
    }
}

/// Validated estimator input.
#[derive(Debug, Clone)]
pub struct PremiumInput {
    pub age: u32,
    pub bmi: f64,
    pub children: u32,
    pub smoker: bool,
    /// `None` for a region name outside the table; it adds nothing.
    pub region: Option<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub base: u64,
    pub age_factor: u64,
    pub bmi_factor: u64,
    pub children_factor: u64,
    pub smoker_factor: u64,
    pub region_factor: u64,
}

impl Breakdown {
    pub fn total(&self) -> u64 {
        self.base
            + self.age_factor
            + self.bmi_factor
            + self.children_factor
            + self.smoker_factor
            + self.region_factor
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub predicted_cost: f64,
    pub breakdown: Breakdown,
}

pub fn bmi_cost(bmi: f64) -> u64 {
    if bmi < 18.5 {
        500
    } else if bmi < 25.0 {
        0
    } else if bmi < 30.0 {
        1000
    } else {
        2500
    }
}

/// The unjittered per-factor costs.
pub fn breakdown(input: &PremiumInput) -> Breakdown {
    Breakdown {
        base: BASE_COST,
        age_factor: u64::from(input.age) * COST_PER_YEAR,
        bmi_factor: bmi_cost(input.bmi),
        children_factor: u64::from(input.children) * COST_PER_CHILD,
        smoker_factor: if input.smoker { SMOKER_COST } else { 0 },
        region_factor: input.region.map_or(0, Region::cost),
    }
}

pub fn estimate<R: Rng + ?Sized>(input: &PremiumInput, rng: &mut R) -> Estimate {
    let breakdown = breakdown(input);
    let jitter = rng.gen_range(JITTER_MIN..=JITTER_MAX);
    let predicted_cost = round_cents(breakdown.total() as f64 * jitter);
    Estimate {
        predicted_cost,
        breakdown,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn bmi_band_edges() {
        assert_eq!(bmi_cost(0.0), 500);
        assert_eq!(bmi_cost(18.49), 500);
        assert_eq!(bmi_cost(18.5), 0);
        assert_eq!(bmi_cost(24.99), 0);
        assert_eq!(bmi_cost(25.0), 1000);
        assert_eq!(bmi_cost(29.99), 1000);
        assert_eq!(bmi_cost(30.0), 2500);
        assert_eq!(bmi_cost(55.0), 2500);
    }

    #[test]
    fn region_names() {
        assert_eq!(Region::from_name("southwest"), Some(Region::Southwest));
        assert_eq!(Region::from_name("Southwest"), None);
        assert_eq!(Region::Northwest.cost(), 500);
        assert_eq!(Region::Southeast.cost(), 1000);
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round_cents(10_123.456), 10_123.46);
        assert_eq!(round_cents(9_690.0), 9_690.0);
    }

    #[test]
    fn same_seed_same_estimate() {
        let input = PremiumInput {
            age: 45,
            bmi: 31.2,
            children: 2,
            smoker: true,
            region: Some(Region::Southeast),
        };
        let a = estimate(&input, &mut StdRng::seed_from_u64(7));
        let b = estimate(&input, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
