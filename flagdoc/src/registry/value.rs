//! Default-value rendering for registered flags.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Values that can back a flag and render the flag's default.
pub trait FlagValue {
    /// Display form of the value as shown in `--help` output.
    fn flag_default(&self) -> String;
}

macro_rules! flag_value_via_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FlagValue for $ty {
                fn flag_default(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

flag_value_via_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
    String, IpAddr, SocketAddr,
);

impl FlagValue for str {
    fn flag_default(&self) -> String {
        self.to_owned()
    }
}

impl FlagValue for &str {
    fn flag_default(&self) -> String {
        (*self).to_owned()
    }
}

impl FlagValue for PathBuf {
    fn flag_default(&self) -> String {
        self.display().to_string()
    }
}

impl FlagValue for Duration {
    fn flag_default(&self) -> String {
        format_duration(*self)
    }
}

impl<T: FlagValue> FlagValue for Option<T> {
    fn flag_default(&self) -> String {
        self.as_ref().map(FlagValue::flag_default).unwrap_or_default()
    }
}

impl<T: FlagValue> FlagValue for Vec<T> {
    fn flag_default(&self) -> String {
        self.iter()
            .map(FlagValue::flag_default)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Formats a duration the way command-line help conventionally shows it:
/// `0s`, `500ms`, `15s`, `1m30s`, `1h0m0s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "0s".to_owned();
    }
    let total_secs = duration.as_secs();
    let nanos = duration.subsec_nanos();
    if total_secs == 0 {
        return format_subsecond(nanos);
    }

    let hours = total_secs.div_euclid(3600);
    let minutes = total_secs.rem_euclid(3600).div_euclid(60);
    let secs = total_secs.rem_euclid(60);
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&hours.to_string());
        out.push('h');
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&minutes.to_string());
        out.push('m');
    }
    out.push_str(&secs.to_string());
    if nanos != 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push('s');
    out
}

fn format_subsecond(nanos: u32) -> String {
    if nanos.rem_euclid(1_000_000) == 0 {
        format!("{}ms", nanos.div_euclid(1_000_000))
    } else if nanos.rem_euclid(1_000) == 0 {
        format!("{}µs", nanos.div_euclid(1_000))
    } else {
        format!("{nanos}ns")
    }
}
