//! Tracked health factors and series extraction
//!
//! A factor is one numeric health dimension tracked per journal entry.
//! The extractor turns a chronologically ordered list of entries into one
//! aligned series per factor, substituting a neutral default wherever a
//! field was left unset. Defaults live here as a named policy so tests can
//! assert on them directly instead of chasing inline literals.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::store::types::JournalEntry;

/// A tracked numeric health dimension
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    SleepHours,
    SleepQuality,
    MoodScore,
    EnergyLevel,
    StressLevel,
    ExerciseMins,
    WaterIntakeMl,
}

/// All factors in declaration order.
///
/// This order is load-bearing: pair discovery and trend discovery iterate
/// it, which fixes the otherwise implementation-defined tie and cap order.
pub const ALL_FACTORS: [Factor; 7] = [
    Factor::SleepHours,
    Factor::SleepQuality,
    Factor::MoodScore,
    Factor::EnergyLevel,
    Factor::StressLevel,
    Factor::ExerciseMins,
    Factor::WaterIntakeMl,
];

impl Factor {
    /// Stable key used in serialized payloads
    pub fn key(&self) -> &'static str {
        match self {
            Factor::SleepHours => "sleepHours",
            Factor::SleepQuality => "sleepQuality",
            Factor::MoodScore => "moodScore",
            Factor::EnergyLevel => "energyLevel",
            Factor::StressLevel => "stressLevel",
            Factor::ExerciseMins => "exerciseMins",
            Factor::WaterIntakeMl => "waterIntakeMl",
        }
    }

    /// Human-readable name used in insight text
    pub fn display_name(&self) -> &'static str {
        match self {
            Factor::SleepHours => "Sleep Duration",
            Factor::SleepQuality => "Sleep Quality",
            Factor::MoodScore => "Mood",
            Factor::EnergyLevel => "Energy",
            Factor::StressLevel => "Stress",
            Factor::ExerciseMins => "Exercise",
            Factor::WaterIntakeMl => "Water Intake",
        }
    }

    /// Neutral value substituted when an entry leaves this factor unset.
    ///
    /// Chosen to approximate a typical value so absent data does not drag
    /// correlations toward extremes.
    pub fn neutral_default(&self) -> f64 {
        match self {
            Factor::SleepHours => 7.0,
            Factor::SleepQuality => 3.0,
            Factor::MoodScore => 3.0,
            Factor::EnergyLevel => 3.0,
            Factor::StressLevel => 3.0,
            Factor::ExerciseMins => 0.0,
            Factor::WaterIntakeMl => 2000.0,
        }
    }

    /// Whether lower values of this factor are the healthy direction
    pub fn is_inverse(&self) -> bool {
        matches!(self, Factor::StressLevel)
    }

    /// Read this factor's raw value from an entry, if present
    pub fn value_of(&self, entry: &JournalEntry) -> Option<f64> {
        match self {
            Factor::SleepHours => entry.sleep_hours,
            Factor::SleepQuality => entry.sleep_quality.map(f64::from),
            Factor::MoodScore => entry.mood_score.map(f64::from),
            Factor::EnergyLevel => entry.energy_level.map(f64::from),
            Factor::StressLevel => entry.stress_level.map(f64::from),
            Factor::ExerciseMins => entry.exercise_mins.map(f64::from),
            Factor::WaterIntakeMl => entry.water_intake_ml.map(f64::from),
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One series per factor, aligned by entry index
pub type FactorMap = HashMap<Factor, Vec<f64>>;

/// Extract one numeric series per factor from ordered entries.
///
/// Output always contains all seven factors, each with exactly one value
/// per input entry, in input order. Entry list order is the time axis;
/// callers pass entries ascending by date. Missing days are simply absent,
/// not interpolated.
pub fn extract_factors(entries: &[JournalEntry]) -> FactorMap {
    let mut factors = FactorMap::with_capacity(ALL_FACTORS.len());

    for factor in ALL_FACTORS {
        let series = entries
            .iter()
            .map(|e| factor.value_of(e).unwrap_or_else(|| factor.neutral_default()))
            .collect();
        factors.insert(factor, series);
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::EntryDraft;
    use chrono::{NaiveDate, Utc};

    fn entry_from_draft(draft: EntryDraft) -> JournalEntry {
        JournalEntry {
            id: "e".to_string(),
            user_id: draft.user_id,
            entry_date: draft.entry_date,
            sleep_hours: draft.sleep_hours,
            sleep_quality: draft.sleep_quality,
            stress_level: draft.stress_level,
            energy_level: draft.energy_level,
            mood_score: draft.mood_score,
            exercise_mins: draft.exercise_mins,
            exercise_type: draft.exercise_type,
            water_intake_ml: draft.water_intake_ml,
            notes: draft.notes,
            created_at: Utc::now(),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_all_factors_present_with_input_length() {
        let entries: Vec<JournalEntry> = (1..=4)
            .map(|d| entry_from_draft(EntryDraft::new("u1", date(d)).mood(4)))
            .collect();

        let factors = extract_factors(&entries);
        assert_eq!(factors.len(), 7);
        for factor in ALL_FACTORS {
            assert_eq!(factors[&factor].len(), 4, "{factor} series length");
        }
    }

    #[test]
    fn test_missing_fields_get_neutral_defaults() {
        let entries = vec![entry_from_draft(EntryDraft::new("u1", date(1)))];
        let factors = extract_factors(&entries);

        assert_eq!(factors[&Factor::SleepHours], vec![7.0]);
        assert_eq!(factors[&Factor::SleepQuality], vec![3.0]);
        assert_eq!(factors[&Factor::MoodScore], vec![3.0]);
        assert_eq!(factors[&Factor::EnergyLevel], vec![3.0]);
        assert_eq!(factors[&Factor::StressLevel], vec![3.0]);
        assert_eq!(factors[&Factor::ExerciseMins], vec![0.0]);
        assert_eq!(factors[&Factor::WaterIntakeMl], vec![2000.0]);
    }

    #[test]
    fn test_set_fields_pass_through_in_entry_order() {
        let entries: Vec<JournalEntry> = [6.0, 7.5, 5.0]
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                entry_from_draft(EntryDraft::new("u1", date(i as u32 + 1)).sleep_hours(h))
            })
            .collect();

        let factors = extract_factors(&entries);
        assert_eq!(factors[&Factor::SleepHours], vec![6.0, 7.5, 5.0]);
    }

    #[test]
    fn test_empty_input_gives_empty_series() {
        let factors = extract_factors(&[]);
        assert_eq!(factors.len(), 7);
        assert!(factors.values().all(|s| s.is_empty()));
    }

    #[test]
    fn test_stress_is_the_only_inverse_factor() {
        let inverse: Vec<Factor> = ALL_FACTORS
            .iter()
            .copied()
            .filter(Factor::is_inverse)
            .collect();
        assert_eq!(inverse, vec![Factor::StressLevel]);
    }
}
