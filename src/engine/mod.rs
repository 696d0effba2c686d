//! Threshold engine: decides when a run notifies.

pub mod evaluate;
pub mod events;

pub use evaluate::{
    apply_monthly_summary, apply_weekly_summary, evaluate_tick, initialize, is_last_day_of_month,
    monthly_summary_due, weekly_summary_due,
};
pub use events::Event;
