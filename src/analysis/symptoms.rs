//! Symptom aggregation
//!
//! Groups the full history of body-map markers by (region, symptom) and
//! ranks groups by how often they recur.

use serde::Serialize;
use std::collections::HashMap;

use crate::store::types::BodyMarker;

/// Recurring symptom pattern in one body region
#[derive(Debug, Clone, Serialize)]
pub struct SymptomGroup {
    /// Body region key ("head", "lower_back", ...)
    pub region: String,
    /// Symptom label ("Throbbing", "Ache", ...)
    pub symptom: String,
    /// How many markers share this (region, symptom)
    pub count: usize,
    /// Mean intensity across the group, 1-10 scale
    pub avg_intensity: f64,
}

/// Group markers by (region, symptom), most frequent first.
///
/// Equal counts are ordered by (region, symptom) so output is
/// deterministic; nothing downstream depends on tie order.
pub fn aggregate_symptoms(markers: &[BodyMarker]) -> Vec<SymptomGroup> {
    let mut grouping: HashMap<(String, String), (usize, i64)> = HashMap::new();

    for marker in markers {
        let key = (marker.body_region.clone(), marker.symptom.clone());
        let slot = grouping.entry(key).or_insert((0, 0));
        slot.0 += 1;
        slot.1 += i64::from(marker.intensity);
    }

    let mut groups: Vec<SymptomGroup> = grouping
        .into_iter()
        .map(|((region, symptom), (count, total_intensity))| SymptomGroup {
            region,
            symptom,
            count,
            avg_intensity: total_intensity as f64 / count as f64,
        })
        .collect();

    groups.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.region.cmp(&b.region))
            .then_with(|| a.symptom.cmp(&b.symptom))
    });

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn marker(region: &str, symptom: &str, intensity: i32) -> BodyMarker {
        BodyMarker {
            id: uuid::Uuid::new_v4().to_string(),
            entry_id: "e1".to_string(),
            user_id: "u1".to_string(),
            body_region: region.to_string(),
            x_pos: 50.0,
            y_pos: 50.0,
            symptom: symptom.to_string(),
            intensity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_groups_by_region_and_symptom() {
        let markers = vec![
            marker("head", "Throbbing", 7),
            marker("head", "Throbbing", 5),
            marker("head", "Stabbing", 9),
            marker("knee", "Throbbing", 3),
        ];

        let groups = aggregate_symptoms(&markers);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].region, "head");
        assert_eq!(groups[0].symptom, "Throbbing");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].avg_intensity, 6.0);
    }

    #[test]
    fn test_most_frequent_group_first() {
        let mut markers = Vec::new();
        for _ in 0..5 {
            markers.push(marker("head", "Throbbing", 7));
        }
        for _ in 0..2 {
            markers.push(marker("knee", "Ache", 4));
        }

        let groups = aggregate_symptoms(&markers);
        assert_eq!(groups[0].region, "head");
        assert_eq!(groups[0].symptom, "Throbbing");
        assert_eq!(groups[0].count, 5);
        assert_eq!(groups[0].avg_intensity, 7.0);
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn test_empty_markers_give_no_groups() {
        assert!(aggregate_symptoms(&[]).is_empty());
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let markers = vec![
            marker("shoulder", "Ache", 4),
            marker("head", "Throbbing", 6),
        ];

        let groups = aggregate_symptoms(&markers);
        assert_eq!(groups[0].region, "head");
        assert_eq!(groups[1].region, "shoulder");
    }
}
