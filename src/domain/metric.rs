use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::{errors::NewRelicError, xml::XmlElement};

/// One time slice returned by a metric data query.
///
/// The attribute set depends on the metric, so values are kept by name:
/// `attributes` holds the `<metric>` attributes (`app`, `agent_id`, `begin`,
/// `end`, `name`, ...) and `fields` the nested `<field name="..">` values.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Metric {
    pub attributes: BTreeMap<String, String>,
    pub fields: BTreeMap<String, String>,
}

impl Metric {
    pub fn from_element(element: &XmlElement) -> Self {
        let fields = element
            .find_all("field")
            .into_iter()
            .filter_map(|field| {
                field
                    .attr("name")
                    .map(|name| (name.to_string(), field.text().to_string()))
            })
            .collect();

        Self {
            attributes: element.attributes.clone(),
            fields,
        }
    }

    /// Looks a value up by name; fields shadow attributes of the same name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .or_else(|| self.attributes.get(key))
            .map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").map(String::as_str)
    }

    pub fn app(&self) -> Option<&str> {
        self.attributes.get("app").map(String::as_str)
    }

    pub fn begin(&self) -> Option<&str> {
        self.attributes.get("begin").map(String::as_str)
    }

    pub fn end(&self) -> Option<&str> {
        self.attributes.get("end").map(String::as_str)
    }
}

/// Parameters of a metric data request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDataQuery {
    pub applications: Vec<String>,
    pub metrics: Vec<String>,
    pub field: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: bool,
}

impl MetricDataQuery {
    pub fn new(
        applications: Vec<String>,
        metrics: Vec<String>,
        field: impl Into<String>,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            applications,
            metrics,
            field: field.into(),
            begin,
            end,
            summary: false,
        }
    }

    pub fn summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    /// Applications are addressed by `app_id` when the first one is numeric,
    /// otherwise by `app`; several applications switch to the `[]` form.
    pub(crate) fn query_pairs(&self) -> Result<Vec<(String, String)>, NewRelicError> {
        let Some(first) = self.applications.first() else {
            return Err(NewRelicError::invalid_parameter(
                "at least one application id or name is required",
            ));
        };

        let mut app_key = if first.trim().parse::<i64>().is_ok() {
            "app_id".to_string()
        } else {
            "app".to_string()
        };
        if self.applications.len() > 1 {
            app_key.push_str("[]");
        }

        let mut pairs: Vec<(String, String)> = self
            .applications
            .iter()
            .map(|application| (app_key.clone(), application.clone()))
            .collect();
        pairs.extend(
            self.metrics
                .iter()
                .map(|metric| ("metrics[]".to_string(), metric.clone())),
        );
        pairs.push(("field".to_string(), self.field.clone()));
        pairs.push(("begin".to_string(), format_timestamp(&self.begin)));
        pairs.push(("end".to_string(), format_timestamp(&self.end)));
        pairs.push(("summary".to_string(), u8::from(self.summary).to_string()));

        Ok(pairs)
    }
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::xml::parse_response;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2011, 4, 20, 15, 47, 0).unwrap(),
            Utc.with_ymd_and_hms(2011, 4, 20, 15, 52, 0).unwrap(),
        )
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn copies_attributes_and_fields() {
        let root = parse_response(
            r#"<metrics><metric app="My Application" agent_id="123456" begin="2011-04-20T15:47:00Z" end="2011-04-20T15:48:00Z" name="ActiveRecord/all"><field type="integer" name="average_response_time">0</field></metric></metrics>"#,
        )
        .expect("valid xml");
        let metric = Metric::from_element(root.find("metric").expect("metric"));

        assert_eq!(metric.name(), Some("ActiveRecord/all"));
        assert_eq!(metric.app(), Some("My Application"));
        assert_eq!(metric.begin(), Some("2011-04-20T15:47:00Z"));
        assert_eq!(metric.end(), Some("2011-04-20T15:48:00Z"));
        assert_eq!(metric.get("agent_id"), Some("123456"));
        assert_eq!(metric.get("average_response_time"), Some("0"));
        assert_eq!(metric.get("call_count"), None);
    }

    #[test]
    fn fields_shadow_attributes() {
        let root = parse_response(
            r#"<metrics><metric name="a" foo="bar"><field name="foo">baz</field></metric></metrics>"#,
        )
        .expect("valid xml");
        let metric = Metric::from_element(root.find("metric").expect("metric"));
        assert_eq!(metric.get("foo"), Some("baz"));
        assert_eq!(metric.attributes.get("foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn single_numeric_application_uses_app_id() {
        let (begin, end) = window();
        let query = MetricDataQuery::new(
            vec!["123".to_string()],
            vec!["ActiveRecord/all".to_string()],
            "average_response_time",
            begin,
            end,
        );

        assert_eq!(
            query.query_pairs().expect("valid query"),
            vec![
                pair("app_id", "123"),
                pair("metrics[]", "ActiveRecord/all"),
                pair("field", "average_response_time"),
                pair("begin", "2011-04-20T15:47:00Z"),
                pair("end", "2011-04-20T15:52:00Z"),
                pair("summary", "0"),
            ]
        );
    }

    #[test]
    fn several_named_applications_use_array_key() {
        let (begin, end) = window();
        let query = MetricDataQuery::new(
            vec!["My Application".to_string(), "Other".to_string()],
            vec!["A".to_string(), "B".to_string()],
            "call_count",
            begin,
            end,
        )
        .summary(true);

        let pairs = query.query_pairs().expect("valid query");
        assert_eq!(&pairs[..4], &[
            pair("app[]", "My Application"),
            pair("app[]", "Other"),
            pair("metrics[]", "A"),
            pair("metrics[]", "B"),
        ]);
        assert_eq!(pairs.last(), Some(&pair("summary", "1")));
    }

    #[test]
    fn no_applications_is_an_invalid_parameter() {
        let (begin, end) = window();
        let query = MetricDataQuery::new(vec![], vec!["A".to_string()], "call_count", begin, end);
        let err = query.query_pairs().expect_err("applications required");
        assert!(matches!(err, NewRelicError::InvalidParameter(_)));
    }
}
