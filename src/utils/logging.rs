use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: u64, details: Option<&str>) {
    match details {
        Some(d) => info!("CMD_START: {} by {}({}) - {}", command, user, user_id, d),
        None => info!("CMD_START: {} by {}({})", command, user, user_id),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, user: &str, user_id: u64, error: &str) {
    error!("CMD_ERROR: {} by {}({}) - {}", command, user, user_id, error);
}

/// Logs conversation state changes
pub fn log_transition(admin_id: u64, from: &str, to: &str) {
    debug!("STATE: admin {} {} -> {}", admin_id, from, to);
}

/// Logs validation errors with consistent format
pub fn log_validation_error(step: &str, value: &str, error: &str, admin_id: u64) {
    warn!(
        "VALIDATION_ERROR: {} value '{}' invalid: {} - admin {}",
        step, value, error, admin_id
    );
}

/// Logs draft store operations
pub fn log_draft_operation(operation: &str, key: &str) {
    debug!("DRAFT_OP: {} {}", operation, key);
}

/// Logs backend calls
pub fn log_backend_call(call: &str) {
    debug!("API_CALL: {}", call);
}

/// Logs sweep progress with consistent format
pub fn log_sweep_event(sweep: &str, event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SWEEP: {} {} - {}", sweep, event, d),
        None => info!("SWEEP: {} {}", sweep, event),
    }
}

/// Logs a failure confined to one campaign inside a sweep
pub fn log_sweep_error(sweep: &str, gift_id: &str, error: &str) {
    error!("SWEEP_ERROR: {} gift {} - {}", sweep, gift_id, error);
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
