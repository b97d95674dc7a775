//! Composing a plan: rows, costs, dependency expansion and the session
//! command interface.

pub mod composition;
mod cost;
mod expand;
mod session;
mod view;

pub use composition::{Composition, CompositionRow, RowDraft, RowId};
pub use cost::{
    compute_cost, compute_cost_with, hint_discount, total_cost, CostFormula,
    HINT_DISCOUNT_PERCENT, MAX_HINT_LEVEL, SPECIAL_DISCOUNT_PERCENT,
};
pub use expand::{expand, expand_all, expand_selection, ExpansionReport};
pub use session::{PlannerSession, Suggestion};
pub use view::{PlanView, RowView};
