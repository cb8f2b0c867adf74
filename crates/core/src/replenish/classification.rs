use serde::{Deserialize, Serialize};

use crate::domain::sku::{SkuRecord, AVAILABLE_FLAG};

pub const TOP_RANK_CUTOFF: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewClass {
    Hotcake,
    Positive,
    NewSku,
    Standard,
}

impl ReviewClass {
    /// Matches labels ignoring case, hyphens, underscores and whitespace, so
    /// "Top-HotCake", "Top-Hotcake" and "Hot Cake" all land on `Hotcake`.
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '-' && *ch != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "tophotcake" | "hotcake" => Self::Hotcake,
            "positive" => Self::Positive,
            "newsku" => Self::NewSku,
            _ => Self::Standard,
        }
    }
}

/// Flag set derived once per record and threaded through the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationFlags {
    pub is_hotcake: bool,
    pub is_positive: bool,
    pub is_new_sku: bool,
    pub is_top_rank: bool,
    pub is_active: bool,
}

impl ClassificationFlags {
    pub fn is_priority(&self) -> bool {
        self.is_hotcake || self.is_positive || self.is_new_sku || self.is_top_rank
    }
}

pub fn classify(record: &SkuRecord) -> ClassificationFlags {
    let review = ReviewClass::from_label(&record.review_label);

    ClassificationFlags {
        is_hotcake: review == ReviewClass::Hotcake,
        is_positive: review == ReviewClass::Positive,
        is_new_sku: review == ReviewClass::NewSku,
        is_top_rank: record.rank <= TOP_RANK_CUTOFF,
        is_active: record.availability_flag == AVAILABLE_FLAG && record.box_quantity > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, ReviewClass};
    use crate::domain::sku::SkuRecord;

    fn record(review: &str, rank: u32, availability: &str, box_quantity: u32) -> SkuRecord {
        SkuRecord {
            review_label: review.to_string(),
            rank,
            availability_flag: availability.to_string(),
            box_quantity,
            ..SkuRecord::default()
        }
    }

    #[test]
    fn hotcake_label_variants_are_recognised() {
        for label in ["Top-HotCake", "Top-Hotcake", "Hot Cake", "top hotcake", "HOTCAKE"] {
            assert_eq!(ReviewClass::from_label(label), ReviewClass::Hotcake, "label {label}");
        }
    }

    #[test]
    fn other_review_labels_map_to_their_class() {
        assert_eq!(ReviewClass::from_label("Positive"), ReviewClass::Positive);
        assert_eq!(ReviewClass::from_label("New SKU"), ReviewClass::NewSku);
        assert_eq!(ReviewClass::from_label("new-sku"), ReviewClass::NewSku);
        assert_eq!(ReviewClass::from_label("Negative"), ReviewClass::Standard);
        assert_eq!(ReviewClass::from_label(""), ReviewClass::Standard);
    }

    #[test]
    fn activity_requires_exact_yes_and_a_box() {
        assert!(classify(&record("", 9999, "Yes", 6)).is_active);
        assert!(!classify(&record("", 9999, "yes", 6)).is_active);
        assert!(!classify(&record("", 9999, "No", 6)).is_active);
        assert!(!classify(&record("", 9999, "Yes", 0)).is_active);
    }

    #[test]
    fn top_rank_cutoff_is_inclusive() {
        assert!(classify(&record("", 200, "Yes", 1)).is_top_rank);
        assert!(!classify(&record("", 201, "Yes", 1)).is_top_rank);
    }

    #[test]
    fn priority_covers_every_non_standard_category() {
        assert!(classify(&record("Hot Cake", 9999, "Yes", 1)).is_priority());
        assert!(classify(&record("Positive", 9999, "Yes", 1)).is_priority());
        assert!(classify(&record("New SKU", 9999, "Yes", 1)).is_priority());
        assert!(classify(&record("", 12, "Yes", 1)).is_priority());
        assert!(!classify(&record("Average", 9999, "Yes", 1)).is_priority());
    }
}
