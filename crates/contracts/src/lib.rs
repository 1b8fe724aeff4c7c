//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace:
//! work descriptors, per-item outcomes, the unit-of-work seam, the status
//! sink seam and the configuration model.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Durations are wall-clock (`std::time::Duration`)
//! - Batch elapsed time is measured from "all units submitted" to "join wait returned"

mod call;
mod document;
mod error;
mod outcome;
mod settings;
mod sink;
mod work;

pub use call::*;
pub use document::*;
pub use error::*;
pub use outcome::*;
pub use settings::*;
pub use sink::*;
pub use work::*;
