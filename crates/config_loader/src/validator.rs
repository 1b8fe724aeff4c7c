//! Configuration validation
//!
//! Rules:
//! - unit_cost_ms > 0
//! - deadline_ms > 0
//!
//! `deadline_ms <= unit_cost_ms` is reported as a warning only.

use contracts::{ContractError, FanoutConfig};

/// Validate a FanoutConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &FanoutConfig) -> Result<(), ContractError> {
    validate_dispatch(config)?;
    Ok(())
}

fn validate_dispatch(config: &FanoutConfig) -> Result<(), ContractError> {
    let dispatch = &config.dispatch;

    if dispatch.unit_cost_ms == 0 {
        return Err(ContractError::config_validation(
            "dispatch.unit_cost_ms",
            "unit_cost_ms must be > 0",
        ));
    }

    if dispatch.deadline_ms == 0 {
        return Err(ContractError::config_validation(
            "dispatch.deadline_ms",
            "deadline_ms must be > 0",
        ));
    }

    Ok(())
}

/// Collect non-fatal issues
pub fn warnings(config: &FanoutConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.dispatch.deadline_covers_unit_cost() {
        warnings.push(format!(
            "dispatch.deadline_ms ({}) <= dispatch.unit_cost_ms ({}): every dispatch will take the timeout path",
            config.dispatch.deadline_ms, config.dispatch.unit_cost_ms
        ));
    }

    warnings
}
