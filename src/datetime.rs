//! Packed 16-bit FAT date/time fields and the host-side conversion that
//! feeds them.
//!
//! The packing/unpacking math mirrors
//! `examples/original_source/diskput.c:process_date`/`process_time` and
//! `disklist.c:process_date`/`process_time` bit for bit. Retrieving a
//! host file's modification time is the caller's job; this module only
//! converts an already-obtained `chrono::DateTime<Local>` and never
//! touches the filesystem itself.

use chrono::{DateTime, Datelike, Local, Timelike};

/// Pack a calendar date into the 16-bit FAT representation:
/// `((year - 1980) << 9) | (month << 5) | day`.
pub fn pack_date(year: i32, month: u32, day: u32) -> u16 {
    let year_offset = (year - 1980).clamp(0, 0x7F) as u16;
    ((year_offset & 0x7F) << 9) | ((month as u16 & 0x0F) << 5) | (day as u16 & 0x1F)
}

/// Unpack a 16-bit FAT date into `(year, month, day)`.
pub fn unpack_date(packed: u16) -> (i32, u32, u32) {
    let year = ((packed >> 9) & 0x7F) as i32 + 1980;
    let month = ((packed >> 5) & 0x0F) as u32;
    let day = (packed & 0x1F) as u32;
    (year, month, day)
}

/// Pack an hour/minute into the 16-bit FAT representation (seconds are
/// always coarsened to zero, matching the 2-second granularity of the
/// on-disk format).
pub fn pack_time(hour: u32, minute: u32) -> u16 {
    ((hour as u16 & 0x1F) << 11) | ((minute as u16 & 0x3F) << 5)
}

/// Unpack a 16-bit FAT time into `(hour, minute)`.
pub fn unpack_time(packed: u16) -> (u32, u32) {
    let hour = ((packed >> 11) & 0x1F) as u32;
    let minute = ((packed >> 5) & 0x3F) as u32;
    (hour, minute)
}

/// Pack a `chrono` timestamp into `(date, time)` ready to store in a
/// directory entry.
pub fn pack_timestamp(when: DateTime<Local>) -> (u16, u16) {
    let date = pack_date(when.year(), when.month(), when.day());
    let time = pack_time(when.hour(), when.minute());
    (date, time)
}

/// Render a packed date as `YYYY/MM/DD`, as `list` prints it.
pub fn format_date(packed: u16) -> String {
    let (year, month, day) = unpack_date(packed);
    format!("{year:04}/{month:02}/{day:02}")
}

/// Render a packed time as `HH:MM`, as `list` prints it.
pub fn format_time(packed: u16) -> String {
    let (hour, minute) = unpack_time(packed);
    format!("{hour:02}:{minute:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_round_trips_across_the_representable_range() {
        for year in [1980, 2000, 2026, 2107] {
            for month in 1..=12 {
                for day in [1, 15, 28, 31] {
                    let packed = pack_date(year, month, day);
                    assert_eq!(unpack_date(packed), (year, month, day));
                }
            }
        }
    }

    #[test]
    fn time_round_trips_across_the_representable_range() {
        for hour in 0..24 {
            for minute in [0, 1, 30, 59] {
                let packed = pack_time(hour, minute);
                assert_eq!(unpack_time(packed), (hour, minute));
            }
        }
    }

    #[test]
    fn formats_date_and_time_for_listing() {
        let packed_date = pack_date(2024, 3, 1);
        let packed_time = pack_time(12, 30);
        assert_eq!(format_date(packed_date), "2024/03/01");
        assert_eq!(format_time(packed_time), "12:30");
    }
}
