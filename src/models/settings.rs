use serde::{Deserialize, Serialize};

/// Last-used trip parameters, remembered between runs.
///
/// While `params_locked` is set the stored values cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSettings {
    #[serde(default)]
    pub trip_days: Option<u32>,

    #[serde(default)]
    pub people_count: Option<u32>,

    #[serde(default)]
    pub params_locked: bool,
}

impl TripSettings {
    /// Prefer explicit values, falling back to the stored ones.
    pub fn resolve(
        &self,
        trip_days: Option<u32>,
        people_count: Option<u32>,
    ) -> (Option<u32>, Option<u32>) {
        (
            trip_days.or(self.trip_days),
            people_count.or(self.people_count),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_explicit() {
        let settings = TripSettings {
            trip_days: Some(7),
            people_count: Some(4),
            params_locked: false,
        };
        assert_eq!(settings.resolve(Some(10), None), (Some(10), Some(4)));
        assert_eq!(settings.resolve(None, None), (Some(7), Some(4)));
    }

    #[test]
    fn test_missing_fields_default() {
        let settings: TripSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, TripSettings::default());
    }
}
