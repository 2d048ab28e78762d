use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a locked output holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockType {
    Rtm,
    Asset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FutureStatus {
    Locked,
    Unlocked,
}

/// Condition that released a locked output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockTrigger {
    Confirmations,
    Time,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(format!("Unknown {}: {}", stringify!($ty), other)),
                }
            }
        }
    };
}

string_enum!(LockType { Rtm => "rtm", Asset => "asset" });
string_enum!(FutureStatus { Locked => "locked", Unlocked => "unlocked" });
string_enum!(UnlockTrigger { Confirmations => "confirmations", Time => "time" });

/// Output whose spendability is deferred by confirmations and/or time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureOutput {
    pub txid: String,
    pub vout: u32,
    pub lock_type: LockType,
    pub asset_id: Option<String>,
    pub asset_name: Option<String>,
    pub amount: Decimal,
    pub recipient: Option<String>,
    pub maturity: i64,
    pub lock_time: i64,
    /// `None` when the confirmation condition is disabled
    pub unlock_height: Option<u64>,
    /// `None` when the time condition is disabled
    pub unlock_time: Option<i64>,
    pub updatable_by_destination: bool,
    pub block_height: u64,
    pub block_time: i64,
    pub status: FutureStatus,
    pub unlocked_by: Option<UnlockTrigger>,
    pub unlocked_at_height: Option<u64>,
    pub unlocked_at_time: Option<i64>,
}

impl FutureOutput {
    pub fn height_reached(&self, height: u64) -> bool {
        self.unlock_height.map_or(false, |unlock| unlock <= height)
    }

    pub fn time_reached(&self, time: i64) -> bool {
        self.unlock_time.map_or(false, |unlock| unlock <= time)
    }

    /// Whether a scan at `height`/`time` should release this output
    pub fn is_mature(&self, height: u64, time: i64) -> bool {
        self.status == FutureStatus::Locked && (self.height_reached(height) || self.time_reached(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked(unlock_height: Option<u64>, unlock_time: Option<i64>) -> FutureOutput {
        FutureOutput {
            txid: "f1".to_string(),
            vout: 0,
            lock_type: LockType::Rtm,
            asset_id: None,
            asset_name: None,
            amount: Decimal::ONE,
            recipient: Some("RA".to_string()),
            maturity: 10,
            lock_time: -1,
            unlock_height,
            unlock_time,
            updatable_by_destination: false,
            block_height: 100,
            block_time: 1_000,
            status: FutureStatus::Locked,
            unlocked_by: None,
            unlocked_at_height: None,
            unlocked_at_time: None,
        }
    }

    #[test]
    fn test_maturity_by_height_only() {
        let future = locked(Some(110), None);
        assert!(!future.is_mature(109, i64::MAX));
        assert!(future.is_mature(110, 0));
    }

    #[test]
    fn test_maturity_by_time_only() {
        let future = locked(None, Some(5_000));
        assert!(!future.is_mature(u64::MAX, 4_999));
        assert!(future.is_mature(0, 5_000));
    }

    #[test]
    fn test_disabled_conditions_never_mature() {
        assert!(!locked(None, None).is_mature(u64::MAX, i64::MAX));
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(UnlockTrigger::Confirmations.to_string(), "confirmations");
        assert_eq!("asset".parse::<LockType>(), Ok(LockType::Asset));
        assert!("maybe".parse::<FutureStatus>().is_err());
    }
}
