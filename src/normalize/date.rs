use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Russian genitive month names, as they appear in posted-at strings.
const RUS_MONTHS: [(&str, u32); 12] = [
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
];

static TODAY_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Сегодня\s*в\s*([0-2]?\d:[0-5]\d)").expect("static regex"));

static YESTERDAY_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Вчера\s*в\s*([0-2]?\d:[0-5]\d)").expect("static regex"));

/// `<day> <month-name> [<year>] [г.] [в HH:MM]`, e.g. "21 ноября в 13:20"
/// or "1 января 2025 г.". The year group only matters on detail pages;
/// results pages omit it.
static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s+([а-яё]+)(?:\s+(\d{4})(?:\s*г\.)?)?\s*(?:в\s*([0-2]?\d:[0-5]\d))?")
        .expect("static regex")
});

/// `<d>.<m>[.<y>]`, e.g. "01.11.2025" or "01.11".
static DOTTED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.(\d{1,2})(?:\.(\d{2,4}))?").expect("static regex"));

/// Result of posted-at normalization
#[derive(Debug, Clone, PartialEq)]
pub struct PostedAt {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

impl PostedAt {
    fn none() -> Self {
        Self {
            date: None,
            time: None,
        }
    }
}

/// Location plus posted-at fields recovered from one combined text block
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDate {
    pub location_text: Option<String>,
    pub posted_date_raw: Option<String>,
    pub posted_date: Option<NaiveDate>,
    pub time_raw: Option<String>,
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    RUS_MONTHS
        .iter()
        .find(|(month, _)| *month == lower)
        .map(|(_, number)| *number)
}

/// Normalizes a posted-at string into a calendar date and an HH:MM time
///
/// Recognized shapes, in priority order:
///
/// 1. a "Сегодня" marker → `today`
/// 2. a "Вчера" marker → `today - 1 day`
/// 3. `<day> <month-name> [<year>] [в HH:MM]` — an explicit year wins;
///    otherwise the current year is assumed, minus one when the named month
///    is numerically greater than the current month (listings are recent,
///    so a "future" month means last year)
/// 4. `<d>.<m>[.<y>]` — two-digit years are normalized by adding 2000
///
/// Anything else yields `date = None, time = None`. A day/month combination
/// that is not a real calendar date (e.g. "31 февраля") also yields `None`.
pub fn parse_posted(raw: &str, today: NaiveDate) -> PostedAt {
    let s = raw.trim();
    if s.is_empty() {
        return PostedAt::none();
    }

    if s.contains("Сегодня") {
        return PostedAt {
            date: Some(today),
            time: TODAY_TIME.captures(s).map(|caps| caps[1].to_string()),
        };
    }

    if s.contains("Вчера") {
        return PostedAt {
            date: today.pred_opt(),
            time: YESTERDAY_TIME.captures(s).map(|caps| caps[1].to_string()),
        };
    }

    if let Some(caps) = DAY_MONTH.captures(s) {
        let day: u32 = match caps[1].parse() {
            Ok(day) => day,
            Err(_) => return PostedAt::none(),
        };
        // An unknown month word swallows the match without falling through
        // to the dotted form: "21 чего-то" is noise, not a date.
        let Some(month) = month_number(&caps[2]) else {
            return PostedAt::none();
        };
        let year = match caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok()) {
            Some(explicit) => explicit,
            None => {
                let mut year = today.year();
                if month > today.month() {
                    year -= 1;
                }
                year
            }
        };
        return PostedAt {
            date: NaiveDate::from_ymd_opt(year, month, day),
            time: caps.get(4).map(|m| m.as_str().to_string()),
        };
    }

    if let Some(caps) = DOTTED_DATE.captures(s) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let mut year: i32 = caps
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or_else(|| today.year());
        if year < 100 {
            year += 2000;
        }
        return PostedAt {
            date: NaiveDate::from_ymd_opt(year, month, day),
            time: None,
        };
    }

    PostedAt::none()
}

/// Splits a combined "location - posted-at" block and normalizes both halves
///
/// Input examples:
///
/// - "Ташкент, Шайхантахурский район - Сегодня в 10:47"
/// - "Ташкент, Мирзо-Улугбекский район - 21 ноября в 13:20"
/// - "Ташкент, Чиланзар - 01.11.2025"
///
/// The split is on `" - "`; some markup variants use a double space
/// instead. A block with no recognizable date half keeps the location and
/// leaves every date field `None`.
pub fn parse_location_date(raw: &str, today: NaiveDate) -> LocationDate {
    let s = raw.trim();
    if s.is_empty() {
        return LocationDate {
            location_text: None,
            posted_date_raw: None,
            posted_date: None,
            time_raw: None,
        };
    }

    let (location, date_part) = match s.split_once(" - ") {
        Some((location, date_part)) => (location, date_part),
        None => s.split_once("  ").unwrap_or((s, "")),
    };
    let location = location.trim();
    let date_part = date_part.trim();

    let posted = parse_posted(date_part, today);

    LocationDate {
        location_text: (!location.is_empty()).then(|| location.to_string()),
        posted_date_raw: (!date_part.is_empty()).then(|| date_part.to_string()),
        posted_date: posted.date,
        time_raw: posted.time,
    }
}
