//! Wall-clock and uptime services.

use std::cell::Cell;
use std::fmt;

use retro_types::error::Result;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A simple wall-clock timestamp (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl SystemTime {
    /// Break seconds since the Unix epoch into calendar fields.
    pub fn from_unix_secs(secs: u64) -> Self {
        let days = secs / 86400;
        let time_of_day = secs % 86400;
        let (year, month, day) = days_to_ymd(days);
        Self {
            year,
            month,
            day,
            hour: (time_of_day / 3600) as u8,
            minute: ((time_of_day % 3600) / 60) as u8,
            second: (time_of_day % 60) as u8,
        }
    }

    /// Day of week, 0 = Sunday.
    pub fn weekday(&self) -> u8 {
        day_of_week(i32::from(self.year), u32::from(self.month), u32::from(self.day)) as u8
    }

    /// Long form, e.g. `Fri Feb 13 2026 14:30:45 UTC`.
    pub fn long_format(&self) -> String {
        let month = MONTHS[usize::from(self.month.clamp(1, 12)) - 1];
        format!(
            "{} {month} {:02} {} {:02}:{:02}:{:02} UTC",
            WEEKDAYS[usize::from(self.weekday())],
            self.day,
            self.year,
            self.hour,
            self.minute,
            self.second,
        )
    }
}

impl fmt::Display for SystemTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

/// Abstraction over platform time services.
pub trait TimeService {
    /// Current wall-clock time.
    fn now(&self) -> Result<SystemTime>;

    /// Seconds since the session started.
    fn uptime_secs(&self) -> Result<u64>;
}

/// `std`-backed clock.
pub struct DesktopClock {
    start_time: std::time::Instant,
}

impl DesktopClock {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

impl Default for DesktopClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeService for DesktopClock {
    fn now(&self) -> Result<SystemTime> {
        use std::time::SystemTime as StdTime;
        let secs = StdTime::now()
            .duration_since(StdTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Ok(SystemTime::from_unix_secs(secs))
    }

    fn uptime_secs(&self) -> Result<u64> {
        Ok(self.start_time.elapsed().as_secs())
    }
}

/// Deterministic clock: a fixed wall time and a manually advanced uptime.
#[derive(Debug)]
pub struct FixedClock {
    time: SystemTime,
    uptime: Cell<u64>,
}

impl FixedClock {
    pub fn new(time: SystemTime) -> Self {
        Self {
            time,
            uptime: Cell::new(0),
        }
    }

    /// Move the uptime forward.
    pub fn advance(&self, secs: u64) {
        self.uptime.set(self.uptime.get() + secs);
    }
}

impl TimeService for FixedClock {
    fn now(&self) -> Result<SystemTime> {
        Ok(self.time)
    }

    fn uptime_secs(&self) -> Result<u64> {
        Ok(self.uptime.get())
    }
}

/// Render elapsed seconds as `1h 2m 3s`, `2m 3s` or `3s`.
pub fn format_uptime(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// Convert days since Unix epoch to (year, month, day).
pub fn days_to_ymd(mut days: u64) -> (u16, u8, u8) {
    let mut year = 1970u16;
    loop {
        let year_days = if is_leap(year) { 366 } else { 365 };
        if days < year_days {
            break;
        }
        days -= year_days;
        year += 1;
    }
    let leap = is_leap(year);
    let month_days: [u64; 12] = [
        31,
        if leap { 29 } else { 28 },
        31,
        30,
        31,
        30,
        31,
        31,
        30,
        31,
        30,
        31,
    ];
    let mut month = 12u8;
    for (i, &md) in month_days.iter().enumerate() {
        if days < md {
            month = (i + 1) as u8;
            break;
        }
        days -= md;
    }
    (year, month, (days + 1) as u8)
}

pub fn is_leap(y: u16) -> bool {
    (y.is_multiple_of(4) && !y.is_multiple_of(100)) || y.is_multiple_of(400)
}

fn day_of_week(year: i32, month: u32, day: u32) -> u32 {
    // Tomohiko Sakamoto's algorithm.
    let t = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = if month < 3 { year - 1 } else { year };
    ((y + y / 4 - y / 100 + y / 400 + t[(month - 1) as usize] + day as i32) % 7) as u32
}
