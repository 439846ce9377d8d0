use serde::{Deserialize, Serialize};

use crate::system::audit::AuditEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityOverviewRequest {
    /// Window size in hours
    pub hours: u32,
}

/// Failed login statistics for one source address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpFailureStat {
    pub ip_address: String,
    pub failed_attempts: u32,
    pub usernames: Vec<String>,
    pub last_attempt_at: String,
    pub suspicious: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityOverviewResponse {
    pub window_hours: u32,
    pub failed_logins: u32,
    pub successful_logins: u32,
    /// Accounts currently locked out after repeated failures
    pub locked_accounts: Vec<String>,
    pub active_sessions: u32,
    pub top_ips: Vec<IpFailureStat>,
    pub events: Vec<AuditEntry>,
}
