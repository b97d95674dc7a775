//! Skill point cost after hint and special discounts.

use serde::{Deserialize, Serialize};

/// Discount percent for each hint level 0-5.
pub const HINT_DISCOUNT_PERCENT: [u32; 6] = [0, 10, 20, 30, 35, 40];

/// Extra discount percent applied when the special-discount toggle is on.
pub const SPECIAL_DISCOUNT_PERCENT: u32 = 10;

/// Highest selectable hint level.
pub const MAX_HINT_LEVEL: u8 = 5;

/// How hint and special discounts combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostFormula {
    /// Add both percentages, then floor once.
    #[default]
    Additive,
    /// Floor after the hint discount, then take 90% and floor again.
    Sequential,
}

/// Discount percent for a hint level; out-of-range levels get none.
pub fn hint_discount(hint_level: u8) -> u32 {
    HINT_DISCOUNT_PERCENT
        .get(usize::from(hint_level))
        .copied()
        .unwrap_or(0)
}

/// Effective cost with the additive formula.
///
/// Evaluated in double precision exactly as the web planner does, so
/// results match it digit for digit (`compute_cost(90, 3, false)` is 62).
pub fn compute_cost(base_cost: u32, hint_level: u8, special: bool) -> u32 {
    compute_cost_with(CostFormula::Additive, base_cost, hint_level, special)
}

/// Effective cost with an explicit formula.
pub fn compute_cost_with(
    formula: CostFormula,
    base_cost: u32,
    hint_level: u8,
    special: bool,
) -> u32 {
    let base = f64::from(base_cost);
    let hint = f64::from(hint_discount(hint_level));

    let value = match formula {
        CostFormula::Additive => {
            let special_pct = if special { SPECIAL_DISCOUNT_PERCENT } else { 0 };
            let total = hint + f64::from(special_pct);
            (base * (1.0 - total / 100.0)).floor()
        }
        CostFormula::Sequential => {
            let hinted = (base * (1.0 - hint / 100.0)).floor();
            if special {
                (hinted * (1.0 - f64::from(SPECIAL_DISCOUNT_PERCENT) / 100.0)).floor()
            } else {
                hinted
            }
        }
    };

    if value <= 0.0 {
        0
    } else {
        value as u32
    }
}

/// Sum of per-row costs.
pub fn total_cost<I: IntoIterator<Item = u32>>(costs: I) -> u32 {
    costs.into_iter().fold(0u32, u32::saturating_add)
}
