use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ValidationError;

/// Teaching days, declared in display order so `Ord` follows the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Day::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownDay(s.to_string()))
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The eight fixed one-hour bands of a teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeSlot {
    H0930,
    H1030,
    H1130,
    H1230,
    H1330,
    H1430,
    H1530,
    H1630,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 8] = [
        TimeSlot::H0930,
        TimeSlot::H1030,
        TimeSlot::H1130,
        TimeSlot::H1230,
        TimeSlot::H1330,
        TimeSlot::H1430,
        TimeSlot::H1530,
        TimeSlot::H1630,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::H0930 => "9:30 - 10:30",
            TimeSlot::H1030 => "10:30 - 11:30",
            TimeSlot::H1130 => "11:30 - 12:30",
            TimeSlot::H1230 => "12:30 - 1:30",
            TimeSlot::H1330 => "1:30 - 2:30",
            TimeSlot::H1430 => "2:30 - 3:30",
            TimeSlot::H1530 => "3:30 - 4:30",
            TimeSlot::H1630 => "4:30 - 5:30",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<TimeSlot> {
        TimeSlot::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<TimeSlot> {
        self.index().checked_sub(1).map(|i| TimeSlot::ALL[i])
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both "9:30 - 10:30" and the compact "9:30-10:30".
impl FromStr for TimeSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().replace(' ', "") == compact)
            .ok_or_else(|| ValidationError::UnknownTimeSlot(s.to_string()))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a free-form (day, time slot) label pair.
pub fn parse_slot_key(day: &str, time_slot: &str) -> Result<(Day, TimeSlot), ValidationError> {
    Ok((day.parse()?, time_slot.parse()?))
}

fn label_rank<T: FromStr>(label: &str, index: impl Fn(T) -> usize, known: usize) -> (usize, &str) {
    match label.parse::<T>() {
        Ok(value) => (index(value), ""),
        Err(_) => (known, label),
    }
}

fn compare_labels(a: &(String, String), b: &(String, String)) -> Ordering {
    let day_a = label_rank::<Day>(&a.0, Day::index, Day::ALL.len());
    let day_b = label_rank::<Day>(&b.0, Day::index, Day::ALL.len());
    let slot_a = label_rank::<TimeSlot>(&a.1, TimeSlot::index, TimeSlot::ALL.len());
    let slot_b = label_rank::<TimeSlot>(&b.1, TimeSlot::index, TimeSlot::ALL.len());
    day_a.cmp(&day_b).then(slot_a.cmp(&slot_b))
}

/// Orders label pairs for display: days Monday to Saturday, the catalog bands
/// in sequence, and anything outside the catalog after them lexicographically.
pub fn canonical_order<I>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut ordered: Vec<(String, String)> = pairs.into_iter().collect();
    ordered.sort_by(compare_labels);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_neighbours() {
        assert_eq!(TimeSlot::H0930.next(), Some(TimeSlot::H1030));
        assert_eq!(TimeSlot::H0930.prev(), None);
        assert_eq!(TimeSlot::H1630.next(), None);
        assert!(TimeSlot::H1630.is_last());
        assert!(!TimeSlot::H1530.is_last());
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("9:30 - 10:30".parse::<TimeSlot>().unwrap(), TimeSlot::H0930);
        assert_eq!("12:30-1:30".parse::<TimeSlot>().unwrap(), TimeSlot::H1230);
        assert_eq!("wednesday".parse::<Day>().unwrap(), Day::Wednesday);
        assert_eq!(
            "Sunday".parse::<Day>(),
            Err(ValidationError::UnknownDay("Sunday".to_string()))
        );
        assert!(matches!(
            parse_slot_key("Monday", "5:30 - 6:30"),
            Err(ValidationError::UnknownTimeSlot(_))
        ));
    }

    #[test]
    fn test_catalog_order_is_not_alphabetic() {
        let mut slots = vec![TimeSlot::H1230, TimeSlot::H0930, TimeSlot::H1030];
        slots.sort();
        assert_eq!(slots, vec![TimeSlot::H0930, TimeSlot::H1030, TimeSlot::H1230]);
    }

    #[test]
    fn test_canonical_order_ignores_insertion_order() {
        let pairs = vec![
            ("Saturday".to_string(), "9:30 - 10:30".to_string()),
            ("Monday".to_string(), "4:30 - 5:30".to_string()),
            ("Monday".to_string(), "Lunch".to_string()),
            ("Monday".to_string(), "12:30 - 1:30".to_string()),
            ("Monday".to_string(), "9:30 - 10:30".to_string()),
            ("Monday".to_string(), "Assembly".to_string()),
            ("Tuesday".to_string(), "10:30 - 11:30".to_string()),
        ];

        let ordered = canonical_order(pairs);
        let labels: Vec<(&str, &str)> = ordered
            .iter()
            .map(|(d, t)| (d.as_str(), t.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Monday", "9:30 - 10:30"),
                ("Monday", "12:30 - 1:30"),
                ("Monday", "4:30 - 5:30"),
                ("Monday", "Assembly"),
                ("Monday", "Lunch"),
                ("Tuesday", "10:30 - 11:30"),
                ("Saturday", "9:30 - 10:30"),
            ]
        );
    }

    #[test]
    fn test_serde_uses_display_labels() {
        let json = serde_json::to_string(&(Day::Friday, TimeSlot::H1430)).unwrap();
        assert_eq!(json, r#"["Friday","2:30 - 3:30"]"#);
        let back: (Day, TimeSlot) = serde_json::from_str(&json).unwrap();
        assert_eq!(back, (Day::Friday, TimeSlot::H1430));
    }
}
