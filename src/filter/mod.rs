/// Image filter module
///
/// This module handles:
/// - The fixed set of filter kinds and the parameters each one accepts (kind.rs)
/// - Binding the intensity slider to concrete filter parameters (params.rs)
/// - The processing backend that turns a source image into an output (engine.rs)
/// - CPU pixel operations behind the backend (ops.rs)

pub mod kind;
pub mod params;
pub mod engine;
mod ops;

pub use engine::{CpuEngine, FilterEngine};
pub use kind::FilterKind;
pub use params::{FilterConfig, Intensity};
