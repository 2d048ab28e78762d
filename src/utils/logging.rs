use log::{debug, error, info, warn};

/// Initialize the logger
pub fn init_logger() {
    env_logger::init();
}

/// Log an informational message
pub fn log_info(message: &str) {
    info!("{}", message);
}

/// Log a debug message
pub fn log_debug(message: &str) {
    debug!("{}", message);
}

/// Log a warning message
pub fn log_warning(message: &str) {
    warn!("{}", message);
}

/// Log an error message
pub fn log_error(message: &str) {
    error!("{}", message);
}

/// Log node connection details with the password masked
pub fn log_rpc_connection_details(host: &str, port: &str, username: &str) {
    info!(
        "Raptoreum RPC connection details: http://{}:****@{}:{}",
        username, host, port
    );
}

/// Log database connection details with credentials stripped
pub fn log_database_connection_details(url: &str) {
    let redacted = match url.split_once('@') {
        Some((_, host_part)) => format!("****@{}", host_part),
        None => url.to_string(),
    };
    info!("Database connection details: {}", redacted);
}
