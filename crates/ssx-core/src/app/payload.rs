//! ActivityPayload - 受信リクエストのデコード結果
//!
//! HTTP 層から見える唯一の入力形です。欠けたフィールドは既定値になり、
//! デコードの失敗はリクエストエラーにしません。

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::FieldBag;

/// Body of an activity submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityPayload {
    #[serde(rename = "scenarioId")]
    pub scenario_id: i64,
    #[serde(rename = "scenarioInputsValue", deserialize_with = "lenient_bag")]
    pub scenario_inputs_value: FieldBag,
    #[serde(rename = "triggerName")]
    pub trigger_name: String,
}

/// A bag that is not a JSON object is dropped; the rest of the payload still applies.
fn lenient_bag<'de, D>(deserializer: D) -> Result<FieldBag, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(FieldBag::deserialize(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "scenario inputs are not a field bag; using empty bag");
        FieldBag::default()
    }))
}

impl ActivityPayload {
    /// Build a payload from a loose string map keyed by field wire names.
    ///
    /// Meant for clients preparing a request; unknown keys are dropped.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    /// use ssx_core::app::ActivityPayload;
    ///
    /// let input = HashMap::from([("Reference".to_string(), "R1".to_string())]);
    /// let payload = ActivityPayload::new(1002, &input, "deploy");
    /// assert_eq!(payload.reference(), "R1");
    /// ```
    pub fn new(
        scenario_id: i64,
        input: &HashMap<String, String>,
        trigger_name: impl Into<String>,
    ) -> Self {
        Self {
            scenario_id,
            scenario_inputs_value: FieldBag::from_map(input),
            trigger_name: trigger_name.into(),
        }
    }

    /// Reference id carried inside the field bag.
    pub fn reference(&self) -> &str {
        &self.scenario_inputs_value.reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn decodes_wire_body() {
        let body = r#"{
            "scenarioId": 1002,
            "scenarioInputsValue": {"OSName": "linux", "Reference": "R1"},
            "triggerName": "deploy"
        }"#;

        let payload: ActivityPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.scenario_id, 1002);
        assert_eq!(payload.scenario_inputs_value.os_name, "linux");
        assert_eq!(payload.reference(), "R1");
        assert_eq!(payload.trigger_name, "deploy");
    }

    #[test]
    fn missing_sections_default() {
        let payload: ActivityPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, ActivityPayload::default());
        assert_eq!(payload.reference(), "");
    }

    #[rstest]
    #[case::null_and_number(
        json!({"OSName": "linux", "CPUcount": 4, "SiteID": null, "Reference": "R1"}),
        "linux",
        "R1"
    )]
    #[case::not_an_object(json!("R1"), "", "")]
    #[case::null_bag(json!(null), "", "")]
    fn loose_inputs_keep_the_scenario(
        #[case] inputs: Value,
        #[case] os_name: &str,
        #[case] reference: &str,
    ) {
        let payload: ActivityPayload = serde_json::from_value(json!({
            "scenarioId": 1002,
            "scenarioInputsValue": inputs,
            "triggerName": "deploy",
        }))
        .unwrap();

        assert_eq!(payload.scenario_id, 1002);
        assert_eq!(payload.trigger_name, "deploy");
        assert_eq!(payload.scenario_inputs_value.os_name, os_name);
        assert_eq!(payload.scenario_inputs_value.cpu_count, "");
        assert_eq!(payload.reference(), reference);
    }

    #[test]
    fn new_matches_decoded_body() {
        let input = HashMap::from([
            ("OSName".to_string(), "linux".to_string()),
            ("Reference".to_string(), "R1".to_string()),
        ]);
        let built = ActivityPayload::new(1005, &input, "resize");

        let decoded: ActivityPayload = serde_json::from_value(json!({
            "scenarioId": 1005,
            "scenarioInputsValue": {"OSName": "linux", "Reference": "R1"},
            "triggerName": "resize",
        }))
        .unwrap();

        assert_eq!(built, decoded);
    }
}
