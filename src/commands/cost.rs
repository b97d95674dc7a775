//! `cost`: compute a single effective cost.

use anyhow::{bail, Result};

use crate::plan::{compute_cost_with, hint_discount, CostFormula, MAX_HINT_LEVEL};

pub fn execute(base: u32, hint: u8, special: bool, formula: CostFormula) -> Result<()> {
    if hint > MAX_HINT_LEVEL {
        bail!("Hint level must be between 0 and {MAX_HINT_LEVEL}");
    }
    let cost = compute_cost_with(formula, base, hint, special);
    println!("{cost}");
    tracing::debug!(base, hint, special, discount = hint_discount(hint), ?formula, "Computed cost");
    Ok(())
}
