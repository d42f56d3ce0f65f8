//! Schedule construction and cost-rate analytics

mod cashflows;
mod engine;
pub mod irr;
mod state;

pub use cashflows::{PeriodRow, SimulationResult, SimulationSummary};
pub use engine::{french_installment, simulate, ScheduleBuilder};
pub use irr::{internal_rate, present_value, tcea_from_cashflows, DEFAULT_IRR_GUESS};
pub use state::{SchedulePhase, ScheduleState};
