//! Difficulty display names for charted tracks.
//!
//! Labels are looked up by chart position (the 0-based position of a track
//! among the tracks a run charts). Positions past the end of the supplied
//! list get a synthesized `"Difficulty {n}"` name, so labels never run out.

use serde::{Deserialize, Serialize};

/// Label for chart position `index`, falling back to `"Difficulty {index+1}"`.
pub fn difficulty_label(index: usize, provided: &[String]) -> String {
    provided
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Difficulty {}", index + 1))
}

/// One label per chart position. Excess entries in `provided` are ignored.
pub fn labels_for(count: usize, provided: &[String]) -> Vec<String> {
    (0..count).map(|i| difficulty_label(i, provided)).collect()
}

/// The supplied difficulty names, passed around as one config value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyLabels {
    names: Vec<String>,
}

impl DifficultyLabels {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn label(&self, index: usize) -> String {
        difficulty_label(index, &self.names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_short_list_synthesizes_rest() {
        let labels = labels_for(5, &owned(&["A", "B"]));
        assert_eq!(
            labels,
            owned(&["A", "B", "Difficulty 3", "Difficulty 4", "Difficulty 5"])
        );
    }

    #[test]
    fn test_long_list_truncated_by_use() {
        let labels = labels_for(2, &owned(&["Easy", "Hard", "Expert"]));
        assert_eq!(labels, owned(&["Easy", "Hard"]));
    }

    #[test]
    fn test_absent_list_all_synthesized() {
        assert_eq!(labels_for(3, &[]), owned(&["Difficulty 1", "Difficulty 2", "Difficulty 3"]));
        assert!(labels_for(0, &owned(&["A"])).is_empty());
    }

    #[test]
    fn test_difficulty_labels_lookup() {
        let labels = DifficultyLabels::new(["Beginner (10)", "Easy (20)"]);
        assert_eq!(labels.label(0), "Beginner (10)");
        assert_eq!(labels.label(1), "Easy (20)");
        assert_eq!(labels.label(7), "Difficulty 8");
        assert_eq!(labels.names().len(), 2);
    }

    #[test]
    fn test_difficulty_labels_serde_as_list() {
        let labels = DifficultyLabels::new(["A", "B"]);
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
        let back: DifficultyLabels = serde_json::from_str(&json).unwrap();
        assert_eq!(back, labels);
    }
}
