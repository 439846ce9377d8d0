use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use chrono::{Duration, Utc};
use contracts::dashboards::d403_security_overview::{
    IpFailureStat, SecurityOverviewRequest, SecurityOverviewResponse,
};
use contracts::system::auth::LoginAttempt;

use crate::shared::config;
use crate::system::audit::service as audit;
use crate::system::auth::login_attempts;
use crate::system::sessions::service as sessions;

const TOP_IPS: usize = 10;
const EVENTS_LIMIT: u64 = 50;
const MAX_WINDOW_HOURS: u32 = 24 * 30;

/// Неудачные входы по адресам, самые активные первыми.
/// Адрес подозрителен, если число неудач достигло порога блокировки.
pub fn ip_failures(attempts: &[LoginAttempt], threshold: u32) -> Vec<IpFailureStat> {
    let mut by_ip: HashMap<String, IpFailureStat> = HashMap::new();
    for attempt in attempts.iter().filter(|a| !a.success) {
        let ip = attempt.ip_address.clone().unwrap_or_else(|| "unknown".to_string());
        let stat = by_ip.entry(ip.clone()).or_insert_with(|| IpFailureStat {
            ip_address: ip,
            failed_attempts: 0,
            usernames: Vec::new(),
            last_attempt_at: String::new(),
            suspicious: false,
        });
        stat.failed_attempts += 1;
        if !stat.usernames.contains(&attempt.username) {
            stat.usernames.push(attempt.username.clone());
        }
        if attempt.attempted_at > stat.last_attempt_at {
            stat.last_attempt_at = attempt.attempted_at.clone();
        }
    }

    let mut stats: Vec<IpFailureStat> = by_ip
        .into_values()
        .map(|mut stat| {
            stat.usernames.sort();
            stat.suspicious = stat.failed_attempts >= threshold;
            stat
        })
        .collect();
    stats.sort_by(|a, b| {
        b.failed_attempts
            .cmp(&a.failed_attempts)
            .then_with(|| b.last_attempt_at.cmp(&a.last_attempt_at))
    });
    stats.truncate(TOP_IPS);
    stats
}

pub async fn get_security_overview(request: SecurityOverviewRequest) -> Result<SecurityOverviewResponse> {
    let hours = request.hours.clamp(1, MAX_WINDOW_HOURS);
    let since = Utc::now() - Duration::hours(hours as i64);
    let attempts = login_attempts::list_since(since).await?;

    let failed_logins = attempts.iter().filter(|a| !a.success).count() as u32;
    let successful_logins = attempts.len() as u32 - failed_logins;

    let failed_usernames: BTreeSet<&str> = attempts
        .iter()
        .filter(|a| !a.success)
        .map(|a| a.username.as_str())
        .collect();
    let mut locked_accounts = Vec::new();
    for username in failed_usernames {
        if login_attempts::is_locked_out(username).await? {
            locked_accounts.push(username.to_string());
        }
    }

    let threshold = config::get().auth.max_failed_logins.max(1) as u32;
    let active_sessions = sessions::count_active().await?.max(0) as u32;
    let events = audit::security_events(&since.to_rfc3339(), EVENTS_LIMIT).await?;

    if !locked_accounts.is_empty() {
        tracing::warn!("Locked accounts in the last {}h: {:?}", hours, locked_accounts);
    }

    Ok(SecurityOverviewResponse {
        window_hours: hours,
        failed_logins,
        successful_logins,
        locked_accounts,
        active_sessions,
        top_ips: ip_failures(&attempts, threshold),
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(username: &str, ip: Option<&str>, success: bool, at: &str) -> LoginAttempt {
        LoginAttempt {
            username: username.to_string(),
            ip_address: ip.map(str::to_string),
            success,
            attempted_at: at.to_string(),
        }
    }

    #[test]
    fn groups_failures_by_address() {
        let attempts = vec![
            attempt("admin", Some("10.0.0.5"), false, "2025-05-01T10:03:00+00:00"),
            attempt("root", Some("10.0.0.5"), false, "2025-05-01T10:02:00+00:00"),
            attempt("admin", Some("10.0.0.5"), false, "2025-05-01T10:01:00+00:00"),
            attempt("manager", Some("192.168.1.2"), false, "2025-05-01T09:00:00+00:00"),
            attempt("manager", Some("192.168.1.2"), true, "2025-05-01T09:01:00+00:00"),
            attempt("ghost", None, false, "2025-05-01T08:00:00+00:00"),
        ];

        let stats = ip_failures(&attempts, 3);
        assert_eq!(stats.len(), 3);

        let first = &stats[0];
        assert_eq!(first.ip_address, "10.0.0.5");
        assert_eq!(first.failed_attempts, 3);
        assert_eq!(first.usernames, vec!["admin".to_string(), "root".to_string()]);
        assert_eq!(first.last_attempt_at, "2025-05-01T10:03:00+00:00");
        assert!(first.suspicious);

        assert_eq!(stats[1].ip_address, "192.168.1.2");
        assert!(!stats[1].suspicious);
        assert_eq!(stats[2].ip_address, "unknown");
    }

    #[test]
    fn successes_only_yield_nothing() {
        let attempts = vec![attempt("admin", Some("10.0.0.1"), true, "2025-05-01T10:00:00+00:00")];
        assert!(ip_failures(&attempts, 5).is_empty());
    }
}
