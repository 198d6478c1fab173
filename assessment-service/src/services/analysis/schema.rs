//! Shape check for model-produced analyses.

use crate::models::{TemplateVersion, MAX_OLQ_RATING, MIN_OLQ_RATING, OLQ_RATING_KEYS};
use serde_json::Value;

/// Check that `analysis` has the shape the template asked for.
///
/// Returns a human-readable description of the first violation found.
pub fn validate_analysis(analysis: &Value, version: TemplateVersion) -> Result<(), String> {
    let object = analysis
        .as_object()
        .ok_or_else(|| "analysis is not a JSON object".to_string())?;

    require_string(analysis, "overall_summary")?;
    require_string_list(analysis, "positive_traits")?;
    require_string_list(analysis, "areas_for_improvement")?;
    require_string(analysis, version.closing_key())?;

    let ratings = object
        .get("olq_rating")
        .and_then(Value::as_object)
        .ok_or_else(|| "olq_rating must be an object".to_string())?;

    for key in OLQ_RATING_KEYS {
        let value = ratings
            .get(key)
            .ok_or_else(|| format!("olq_rating is missing '{}'", key))?;
        let rating = value
            .as_f64()
            .ok_or_else(|| format!("olq_rating.{} must be a number", key))?;
        if !(MIN_OLQ_RATING..=MAX_OLQ_RATING).contains(&rating) {
            return Err(format!(
                "olq_rating.{} = {} is outside {}-{}",
                key, rating, MIN_OLQ_RATING, MAX_OLQ_RATING
            ));
        }
    }

    if let Some(extra) = ratings
        .keys()
        .find(|key| !OLQ_RATING_KEYS.contains(&key.as_str()))
    {
        return Err(format!("olq_rating has unexpected key '{}'", extra));
    }

    Ok(())
}

fn require_string(analysis: &Value, key: &str) -> Result<(), String> {
    match analysis.get(key) {
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(format!("{} must be a string", key)),
        None => Err(format!("missing '{}'", key)),
    }
}

fn require_string_list(analysis: &Value, key: &str) -> Result<(), String> {
    match analysis.get(key) {
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(format!("{} must be a list of strings", key)),
        None => Err(format!("missing '{}'", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockTextProvider;
    use serde_json::json;

    fn sample(version: TemplateVersion) -> Value {
        MockTextProvider::sample_analysis(version)
    }

    #[test]
    fn accepts_well_formed_analysis() {
        assert!(validate_analysis(&sample(TemplateVersion::V1), TemplateVersion::V1).is_ok());
        assert!(validate_analysis(&sample(TemplateVersion::V2), TemplateVersion::V2).is_ok());
    }

    #[test]
    fn rejects_non_object() {
        let err = validate_analysis(&json!(["a"]), TemplateVersion::V2).unwrap_err();
        assert!(err.contains("not a JSON object"));
    }

    #[test]
    fn closing_key_must_match_version() {
        let err = validate_analysis(&sample(TemplateVersion::V1), TemplateVersion::V2).unwrap_err();
        assert!(err.contains("final_verdict"));
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let mut analysis = sample(TemplateVersion::V2);
        analysis["olq_rating"]["initiative"] = json!(1);
        analysis["olq_rating"]["determination"] = json!(5);
        assert!(validate_analysis(&analysis, TemplateVersion::V2).is_ok());

        analysis["olq_rating"]["determination"] = json!(6);
        let err = validate_analysis(&analysis, TemplateVersion::V2).unwrap_err();
        assert!(err.contains("determination"));

        analysis["olq_rating"]["determination"] = json!(0);
        assert!(validate_analysis(&analysis, TemplateVersion::V2).is_err());
    }

    #[test]
    fn rating_must_be_numeric() {
        let mut analysis = sample(TemplateVersion::V2);
        analysis["olq_rating"]["cooperation"] = json!("4");
        let err = validate_analysis(&analysis, TemplateVersion::V2).unwrap_err();
        assert!(err.contains("cooperation must be a number"));
    }

    #[test]
    fn rating_keys_must_be_exact() {
        let mut analysis = sample(TemplateVersion::V2);
        analysis["olq_rating"]
            .as_object_mut()
            .unwrap()
            .remove("initiative");
        assert!(validate_analysis(&analysis, TemplateVersion::V2)
            .unwrap_err()
            .contains("missing 'initiative'"));

        let mut analysis = sample(TemplateVersion::V2);
        analysis["olq_rating"]["leadership"] = json!(4);
        assert!(validate_analysis(&analysis, TemplateVersion::V2)
            .unwrap_err()
            .contains("unexpected key 'leadership'"));
    }

    #[test]
    fn list_fields_hold_strings() {
        let mut analysis = sample(TemplateVersion::V2);
        analysis["positive_traits"] = json!(["calm", 3]);
        assert!(validate_analysis(&analysis, TemplateVersion::V2)
            .unwrap_err()
            .contains("positive_traits"));
    }
}
