//! The two stateful cores of the platform: the Project/Service matching
//! engine and the payment settlement flow. Everything here runs as a single
//! store transaction per operation; handlers stay thin and never mutate
//! entity fields directly.

pub mod error;
pub mod matching;
pub mod money;
pub mod settlement;
pub mod transitions;

pub use error::EngineError;
