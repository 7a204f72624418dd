// 🔌 Datasource Protocol - JSON bodies exchanged with the dashboard
// Responses for /query reuse `series::TimeSeries` directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUESTS
// ============================================================================

/// POST /query body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub range: QueryRange,

    #[serde(default)]
    pub targets: Vec<QueryTarget>,

    /// Suggested bucket width, e.g. "30s". Points are never bucketed.
    #[serde(default)]
    pub interval: Option<String>,

    #[serde(default)]
    pub max_data_points: Option<u64>,
}

impl QueryRequest {
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.target.as_str()).collect()
    }
}

/// Absolute time range, RFC 3339 on the wire
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct QueryRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTarget {
    pub target: String,

    #[serde(default)]
    pub ref_id: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

// ============================================================================
// FIXED RESPONSES
// ============================================================================

/// One entry of the /tag-keys response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagKey {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'static str,
}

/// The only tag the datasource advertises
pub const TAG_KEYS: [TagKey; 1] = [TagKey {
    kind: "string",
    text: "Account",
}];

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_dashboard_query() {
        let body = r#"{
            "panelId": 1,
            "range": {
                "from": "2016-10-31T06:33:44.866Z",
                "to": "2016-10-31T12:33:44.866Z",
                "raw": { "from": "now-6h", "to": "now" }
            },
            "interval": "30s",
            "targets": [
                { "target": "Assets:", "refId": "A", "type": "timeserie" },
                { "target": "Expenses:Food", "refId": "B", "type": "timeserie" }
            ],
            "format": "json",
            "maxDataPoints": 550
        }"#;

        let request: QueryRequest = serde_json::from_str(body).unwrap();

        assert_eq!(
            request.range.from,
            Utc.with_ymd_and_hms(2016, 10, 31, 6, 33, 44).unwrap()
                + chrono::Duration::milliseconds(866)
        );
        assert_eq!(request.target_names(), vec!["Assets:", "Expenses:Food"]);
        assert_eq!(request.targets[0].ref_id.as_deref(), Some("A"));
        assert_eq!(request.targets[1].kind.as_deref(), Some("timeserie"));
        assert_eq!(request.interval.as_deref(), Some("30s"));
        assert_eq!(request.max_data_points, Some(550));
    }

    #[test]
    fn test_parse_minimal_query() {
        let body = r#"{"range": {"from": "2023-01-01T00:00:00Z", "to": "2023-02-01T00:00:00Z"}}"#;

        let request: QueryRequest = serde_json::from_str(body).unwrap();

        assert!(request.targets.is_empty());
        assert!(request.interval.is_none());
    }

    #[test]
    fn test_query_without_range_is_rejected() {
        let result: Result<QueryRequest, _> = serde_json::from_str(r#"{"targets": []}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_tag_keys_shape() {
        let json = serde_json::to_string(&TAG_KEYS).unwrap();

        assert_eq!(json, r#"[{"type":"string","text":"Account"}]"#);
    }
}
