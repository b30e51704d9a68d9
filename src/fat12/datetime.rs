//! FAT date and time words
//!
//! Time word: bits 15-11 hour, 10-5 minute, 4-0 seconds / 2.
//! Date word: bits 15-9 years since 1980, 8-5 month, 4-0 day.

use std::time::SystemTime;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

/// Calendar timestamp as stored in a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: u16,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

impl Timestamp {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Timestamp { year, month, day, hour, minute, second }
    }

    /// Calendar fields of `time` in the local time zone, as FAT stores them.
    pub fn from_system_time(time: SystemTime) -> Self {
        Self::from_datetime(&DateTime::<Local>::from(time))
    }

    /// Calendar fields of `time` in its own time zone
    pub fn from_datetime<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Timestamp {
            year: time.year().clamp(0, u16::MAX as i32) as u16,
            month: time.month() as u8,
            day: time.day() as u8,
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            // a leap second reads as 59
            second: time.second().min(59) as u8,
        }
    }

    /// Packed time word
    pub fn fat_time(&self) -> u16 {
        let hour = (self.hour as u16) & 0x1F;
        let minute = (self.minute as u16) & 0x3F;
        let second = ((self.second as u16) >> 1) & 0x1F;
        (hour << 11) | (minute << 5) | second
    }

    /// Packed date word. Years before 1980 wrap inside the 7-bit field.
    pub fn fat_date(&self) -> u16 {
        let year = (self.year as i32 - 1980) as u16 & 0x7F;
        let month = (self.month as u16) & 0x0F;
        let day = (self.day as u16) & 0x1F;
        (year << 9) | (month << 5) | day
    }

    /// Creation time fine resolution byte (10ths of a second).
    ///
    /// Set to 10 on even seconds and 0 on odd ones.
    pub fn fine_tenths(&self) -> u8 {
        if self.second & 1 == 0 {
            10
        } else {
            0
        }
    }

    /// Rebuild a timestamp from packed date and time words
    pub fn from_fat(date: u16, time: u16) -> Self {
        Timestamp {
            year: 1980 + ((date >> 9) & 0x7F),
            month: ((date >> 5) & 0x0F) as u8,
            day: (date & 0x1F) as u8,
            hour: ((time >> 11) & 0x1F) as u8,
            minute: ((time >> 5) & 0x3F) as u8,
            second: ((time & 0x1F) * 2) as u8,
        }
    }
}
