use serde::{Deserialize, Deserializer, Serialize};

/// A business listing as exported by the prospecting dashboard.
///
/// Every field is optional. Absent, `null` and empty-string values all mean
/// "no signal" to the scoring engine. Columns this crate does not know about
/// are kept in `extra` so a rescored export round-trips them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub categories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yelp_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angi_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "hasCMS", default, skip_serializing_if = "Option::is_none")]
    pub has_cms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_analytics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_live_chat: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_booking_widget: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_website: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_linkedin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_reviews: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification_signals: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Treat `None` and `""` alike.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Prospect {
    /// Display name, falling back to a placeholder for unnamed records
    pub fn display_name(&self) -> &str {
        present(&self.company_name).unwrap_or("(unnamed)")
    }

    pub fn has_website(&self) -> bool {
        present(&self.website).is_some()
    }

    pub fn has_facebook(&self) -> bool {
        present(&self.facebook).is_some() || present(&self.company_facebook).is_some()
    }

    pub fn has_instagram(&self) -> bool {
        present(&self.instagram).is_some() || present(&self.company_instagram).is_some()
    }

    pub fn has_linkedin(&self) -> bool {
        present(&self.linkedin).is_some() || present(&self.company_linkedin).is_some()
    }

    pub fn has_any_email(&self) -> bool {
        present(&self.email).is_some()
            || self
                .additional_emails
                .as_ref()
                .is_some_and(|emails| emails.iter().any(|e| !e.is_empty()))
    }

    /// Rating used for reputation checks (Google is the primary source)
    pub fn rating(&self) -> f64 {
        self.google_rating.unwrap_or(0.0)
    }

    pub fn reviews(&self) -> u64 {
        self.review_count.unwrap_or(0)
    }

    pub fn employees(&self) -> u64 {
        self.employee_count.unwrap_or(0)
    }
}

/// Accepts `"a, b"` or `["a", "b"]` (joined with `", "`) or `null`.
fn text_or_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrList {
        Text(String),
        List(Vec<String>),
    }

    Ok(match Option::<TextOrList>::deserialize(deserializer)? {
        None => None,
        Some(TextOrList::Text(s)) => Some(s),
        Some(TextOrList::List(items)) => Some(items.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_export() {
        let json = r#"{
            "id": "p1",
            "companyName": "Northside Roofing",
            "businessType": "Roofing Contractor",
            "googleRating": 4.7,
            "reviewCount": 88,
            "hasCMS": true,
            "hasLiveChat": false,
            "companyFacebook": "https://facebook.com/northside"
        }"#;
        let prospect: Prospect = serde_json::from_str(json).unwrap();
        assert_eq!(prospect.display_name(), "Northside Roofing");
        assert_eq!(prospect.has_cms, Some(true));
        assert_eq!(prospect.has_live_chat, Some(false));
        assert_eq!(prospect.reviews(), 88);
        assert!(prospect.has_facebook());
        assert!(!prospect.has_instagram());
        assert!(prospect.extra.is_empty());
    }

    #[test]
    fn test_categories_accepts_list() {
        let json = r#"{"categories": ["Plumber", "Water Heater Installation"]}"#;
        let prospect: Prospect = serde_json::from_str(json).unwrap();
        assert_eq!(
            prospect.categories.as_deref(),
            Some("Plumber, Water Heater Installation")
        );
    }

    #[test]
    fn test_null_fields_are_absent() {
        let json = r#"{"website": null, "facebook": null, "categories": null, "additionalEmails": null}"#;
        let prospect: Prospect = serde_json::from_str(json).unwrap();
        assert!(!prospect.has_website());
        assert!(!prospect.has_facebook());
        assert!(prospect.categories.is_none());
        assert!(!prospect.has_any_email());
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let prospect = Prospect {
            website: Some(String::new()),
            email: Some(String::new()),
            additional_emails: Some(vec![String::new()]),
            ..Default::default()
        };
        assert!(!prospect.has_website());
        assert!(!prospect.has_any_email());
        assert_eq!(prospect.display_name(), "(unnamed)");
    }

    #[test]
    fn test_unknown_columns_round_trip() {
        let json = r#"{"companyName": "Acme", "status": "contacted", "ownerId": 7}"#;
        let prospect: Prospect = serde_json::from_str(json).unwrap();
        assert_eq!(prospect.extra.len(), 2);

        let back = serde_json::to_value(&prospect).unwrap();
        assert_eq!(back["status"], "contacted");
        assert_eq!(back["ownerId"], 7);
        assert_eq!(back["companyName"], "Acme");
    }
}
