pub mod engine;
pub mod flow;

pub use engine::BookingEngine;
pub use flow::{BookingFlow, BookingStep, FlowError, FlowSnapshot};
