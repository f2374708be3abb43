pub mod engine;

pub use engine::{RedemptionEngine, RedemptionOutcome, RedemptionQuote};
