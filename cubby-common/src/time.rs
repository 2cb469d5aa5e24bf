use std::time::{Duration, SystemTime};

pub fn now() -> Duration {
    let now = SystemTime::now();
    now.duration_since(SystemTime::UNIX_EPOCH).unwrap()
}

/// Wall-clock milliseconds since the unix epoch.
pub fn now_millis() -> u64 {
    now().as_millis() as u64
}
