use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// Date conventions of the source site.
#[derive(Debug, Clone)]
pub struct DateLocale {
    /// chrono pattern for a date followed by a time, e.g. `24/03/24 18:30`.
    pub date_time_format: &'static str,
    /// chrono pattern for a date with an empty time, e.g. `24/03/24 `.
    pub date_only_format: &'static str,
    /// Offset the wall-clock values are read in.
    pub offset: FixedOffset,
}

impl DateLocale {
    /// Day-before-month French notation with two-digit years, read as UTC.
    pub fn french() -> Self {
        Self {
            date_time_format: "%d/%m/%y %H:%M",
            date_only_format: "%d/%m/%y ",
            offset: Utc.fix(),
        }
    }
}

impl Default for DateLocale {
    fn default() -> Self {
        Self::french()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DateParser {
    locale: DateLocale,
}

impl DateParser {
    pub fn new(locale: DateLocale) -> Self {
        Self { locale }
    }

    /// Parses `"<date> <time>"`, or `"<date> "` when no time is given.
    ///
    /// Parsing is strict: the input must render back identically under the
    /// pattern it matched, so `1/3/24` or `24/03/24 18:30 extra` fail instead
    /// of being coerced.
    pub fn parse(&self, date: &str, time: Option<&str>) -> Option<DateTime<Utc>> {
        let composed = format!("{} {}", date, time.unwrap_or_default());

        let naive = match time {
            Some(_) => NaiveDateTime::parse_from_str(&composed, self.locale.date_time_format)
                .ok()
                .filter(|parsed| {
                    parsed.format(self.locale.date_time_format).to_string() == composed
                }),
            None => NaiveDate::parse_from_str(&composed, self.locale.date_only_format)
                .ok()
                .filter(|parsed| {
                    parsed.format(self.locale.date_only_format).to_string() == composed
                })
                .and_then(|parsed| parsed.and_hms_opt(0, 0, 0)),
        }?;

        self.locale
            .offset
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc))
    }
}
