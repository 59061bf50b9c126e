use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Identity of one weekly timetable: `{stream_id}_{semester}_{division_id}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimetableKey {
    pub stream_id: String,
    pub semester: i32,
    pub division_id: String,
}

impl TimetableKey {
    pub fn new(stream_id: impl Into<String>, semester: i32, division_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            semester,
            division_id: division_id.into(),
        }
    }
}

impl fmt::Display for TimetableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.stream_id, self.semester, self.division_id)
    }
}

// Split from the right: the semester is numeric, so only the stream id may
// itself contain underscores.
impl FromStr for TimetableKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedKey(s.to_string());
        let mut parts = s.rsplitn(3, '_');
        let division_id = parts.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;
        let semester = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(malformed)?;
        let stream_id = parts.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;

        Ok(Self::new(stream_id, semester, division_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_and_parse() {
        let key = TimetableKey::new("cs", 3, "div-a");
        assert_eq!(key.to_string(), "cs_3_div-a");
        assert_eq!("cs_3_div-a".parse::<TimetableKey>().unwrap(), key);
    }

    #[test]
    fn test_stream_id_may_contain_underscores() {
        let key: TimetableKey = "comp_sci_2_b".parse().unwrap();
        assert_eq!(key.stream_id, "comp_sci");
        assert_eq!(key.semester, 2);
        assert_eq!(key.division_id, "b");
    }

    #[test]
    fn test_malformed_keys() {
        for raw in ["", "cs", "cs_x_a", "cs_0_a", "_1_a", "cs_1_"] {
            assert!(
                matches!(raw.parse::<TimetableKey>(), Err(ValidationError::MalformedKey(_))),
                "{raw} should be rejected"
            );
        }
    }
}
