//! Health Calculators Shared Library
//!
//! Units, formulas, classifiers, the profile store and the calculators that
//! tie them together. Used by the WASM bindings the browser calls and by the
//! backend hosting the recommendation gateway.

pub mod calculators;
pub mod classifiers;
pub mod errors;
pub mod formulas;
pub mod profile;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use calculators::{Advisory, Calculation, CalculatorResult};
pub use classifiers::*;
pub use errors::*;
pub use formulas::*;
pub use profile::{Profile, ProfilePatch, ProfileStore};
pub use types::*;

// Export units module items (canonical source for unit types)
pub use units::*;
