pub mod grading_flow;
pub mod run_ctx;

pub use grading_flow::GradingFlow;
pub use run_ctx::RunCtx;
