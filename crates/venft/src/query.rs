use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::error::Error;

/// A `(venft, id)` pair as it arrives from a page address or the command line.
///
/// Both parts stay as raw strings. Whether they name anything is decided by
/// the lookup service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupQuery {
    pub venft: Option<String>,
    pub id: Option<String>,
}

impl LookupQuery {
    pub fn new(venft: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            venft: Some(venft.into()),
            id: Some(id.into()),
        }
    }

    /// Parse `venft=...&id=...` from a query string. A leading `?` is ignored
    /// and the first occurrence of a parameter wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            match name.as_ref() {
                "venft" if parsed.venft.is_none() => parsed.venft = Some(value.into_owned()),
                "id" if parsed.id.is_none() => parsed.id = Some(value.into_owned()),
                _ => {}
            }
        }
        parsed
    }

    pub fn from_url(url: &Url) -> Self {
        url.query().map(Self::from_query).unwrap_or_default()
    }

    /// Parse a full page address such as `https://host/?venft=veFVM&id=42`.
    pub fn parse_url(input: &str) -> Result<Self, Error> {
        let url =
            Url::parse(input).map_err(|e| Error::Config(format!("invalid url {input:?}: {e}")))?;
        Ok(Self::from_url(&url))
    }

    pub fn venft(&self) -> Option<&str> {
        self.venft.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Both parts present and non-empty.
    pub fn is_complete(&self) -> bool {
        matches!(self.venft(), Some(k) if !k.is_empty())
            && matches!(self.id(), Some(i) if !i.is_empty())
    }

    /// Render back into a query string, omitting missing parts.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(venft) = &self.venft {
            serializer.append_pair("venft", venft);
        }
        if let Some(id) = &self.id {
            serializer.append_pair("id", id);
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        let q = LookupQuery::from_query("?venft=veFVM&id=42");
        assert_eq!(q, LookupQuery::new("veFVM", "42"));
        assert!(q.is_complete());
    }

    #[test]
    fn test_missing_and_empty_parts() {
        let q = LookupQuery::from_query("venft=veAero");
        assert_eq!(q.venft(), Some("veAero"));
        assert_eq!(q.id(), None);
        assert!(!q.is_complete());

        let q = LookupQuery::from_query("venft=&id=7");
        assert_eq!(q.venft(), Some(""));
        assert!(!q.is_complete());

        assert_eq!(LookupQuery::from_query(""), LookupQuery::default());
    }

    #[test]
    fn test_first_occurrence_wins_and_decoding() {
        let q = LookupQuery::from_query("id=1&id=2&venft=ve%20X&other=y");
        assert_eq!(q.id(), Some("1"));
        assert_eq!(q.venft(), Some("ve X"));
    }

    #[test]
    fn test_parse_url() {
        let q = LookupQuery::parse_url("https://venft.example.org/?venft=veVelo&id=1001").unwrap();
        assert_eq!(q, LookupQuery::new("veVelo", "1001"));

        let bare = LookupQuery::parse_url("https://venft.example.org/").unwrap();
        assert_eq!(bare, LookupQuery::default());

        assert!(LookupQuery::parse_url("not a url").is_err());
    }

    #[test]
    fn test_to_query_string() {
        assert_eq!(LookupQuery::new("veFVM", "42").to_query_string(), "venft=veFVM&id=42");
        let partial = LookupQuery {
            venft: None,
            id: Some("9".to_string()),
        };
        assert_eq!(partial.to_query_string(), "id=9");
    }
}
