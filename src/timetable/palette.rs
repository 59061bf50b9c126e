use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

const COLORS: [&str; 12] = [
    "#FDE2E4", "#E2ECE9", "#BEE1E6", "#F0EFEB", "#DFE7FD", "#CDDAFD",
    "#FFF1E6", "#FAD2E1", "#C5DEDD", "#DBE7E4", "#EDDCD2", "#D6E2E9",
];

/// Display colour per subject.
///
/// Built from the sorted, de-duplicated subject ids, so the same set of
/// subjects always gets the same colours no matter the order they were seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectPalette {
    colors: BTreeMap<String, &'static str>,
}

impl SubjectPalette {
    pub fn from_subject_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        let colors = sorted
            .into_iter()
            .zip(COLORS.iter().copied().cycle())
            .collect();
        Self { colors }
    }

    pub fn color_of(&self, subject_id: &str) -> Option<&'static str> {
        self.colors.get(subject_id).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
