//! Configuration module
//!
//! Configuration structures for the store and the workflow services. Values
//! load from `KADRO_*` environment variables (a `.env` file is honored) with
//! working defaults for every field.

use std::env;

use chrono::NaiveTime;

// Defaults
const DEFAULT_WORK_START: &str = "09:00";
const DEFAULT_LATE_GRACE_MINUTES: i64 = 15;
const DEFAULT_CARRY_FORWARD_PERCENTAGE: u32 = 50;
const DEFAULT_MAX_CARRY_FORWARD_DAYS: f64 = 10.0;
const DEFAULT_CARRY_FORWARD_VALIDITY_MONTHS: u32 = 3;

/// Loads `.env` if present. Call once at process start, before `from_env`.
pub fn load_env() {
    dotenvy::dotenv().ok();
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Store client configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Logical name of the shared administrative store.
    pub global_store_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            global_store_name: "kadro_global".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            global_store_name: env::var("KADRO_GLOBAL_STORE_NAME")
                .unwrap_or_else(|_| "kadro_global".to_string()),
        }
    }
}

/// Attendance state machine configuration.
#[derive(Clone, Debug)]
pub struct AttendanceConfig {
    /// Nominal start of the working day; clock-ins after start + grace are
    /// recorded as Late.
    pub work_start: NaiveTime,
    pub late_grace_minutes: i64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            work_start: NaiveTime::parse_from_str(DEFAULT_WORK_START, "%H:%M")
                .expect("default work start is valid"),
            late_grace_minutes: DEFAULT_LATE_GRACE_MINUTES,
        }
    }
}

impl AttendanceConfig {
    pub fn from_env() -> Self {
        let work_start = env::var("KADRO_WORK_START")
            .ok()
            .and_then(|v| NaiveTime::parse_from_str(&v, "%H:%M").ok())
            .unwrap_or_else(|| {
                NaiveTime::parse_from_str(DEFAULT_WORK_START, "%H:%M")
                    .expect("default work start is valid")
            });
        Self {
            work_start,
            late_grace_minutes: env_or("KADRO_LATE_GRACE_MINUTES", DEFAULT_LATE_GRACE_MINUTES),
        }
    }
}

/// Carry-forward calculator configuration.
#[derive(Clone, Debug)]
pub struct CarryForwardConfig {
    /// Leave types eligible for carry-forward when the tenant has no policy
    /// for the type. Empty means every type is eligible.
    pub eligible_leave_types: Vec<String>,
    pub carry_forward_percentage: u32,
    pub max_carry_forward_days: f64,
    /// Carried credit expires at the end of this many months into the
    /// following year.
    pub validity_months: u32,
}

impl Default for CarryForwardConfig {
    fn default() -> Self {
        Self {
            eligible_leave_types: vec!["annual".to_string(), "earned".to_string()],
            carry_forward_percentage: DEFAULT_CARRY_FORWARD_PERCENTAGE,
            max_carry_forward_days: DEFAULT_MAX_CARRY_FORWARD_DAYS,
            validity_months: DEFAULT_CARRY_FORWARD_VALIDITY_MONTHS,
        }
    }
}

impl CarryForwardConfig {
    pub fn from_env() -> Self {
        let eligible_leave_types = env::var("KADRO_CARRY_FORWARD_TYPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec!["annual".to_string(), "earned".to_string()]);
        Self {
            eligible_leave_types,
            carry_forward_percentage: env_or(
                "KADRO_CARRY_FORWARD_PERCENTAGE",
                DEFAULT_CARRY_FORWARD_PERCENTAGE,
            ),
            max_carry_forward_days: env_or(
                "KADRO_MAX_CARRY_FORWARD_DAYS",
                DEFAULT_MAX_CARRY_FORWARD_DAYS,
            ),
            validity_months: env_or(
                "KADRO_CARRY_FORWARD_VALIDITY_MONTHS",
                DEFAULT_CARRY_FORWARD_VALIDITY_MONTHS,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = CarryForwardConfig::default();
        assert_eq!(cfg.carry_forward_percentage, 50);
        assert_eq!(cfg.max_carry_forward_days, 10.0);
        assert_eq!(cfg.validity_months, 3);

        let att = AttendanceConfig::default();
        assert_eq!(att.late_grace_minutes, 15);
    }
}
