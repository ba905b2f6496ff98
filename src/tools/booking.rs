//! Concert booking tools: search and ticket booking.

use super::{find_spec, DispatchError, ToolDispatcher, ToolParam, ToolSpec};
use crate::booking::{ConcertApi, Location, ALL_LOCATIONS};
use crate::error::LeseError;
use tracing::info;

/// Tools for searching concerts and booking tickets.
pub struct BookingTools {
    api: ConcertApi,
    catalogue: Vec<ToolSpec>,
}

impl BookingTools {
    pub fn new(api: ConcertApi) -> Self {
        Self {
            api,
            catalogue: build_catalogue(),
        }
    }

    fn search_concerts(&self, band: &str, location: Location) -> Result<String, DispatchError> {
        let matches = self.api.search(band, location);
        serde_json::to_string(&matches).map_err(|e| DispatchError::Adapter(e.to_string()))
    }

    fn book_ticket(&self, id: i64) -> Result<String, DispatchError> {
        let id = u32::try_from(id)
            .map_err(|_| DispatchError::MalformedArguments(format!("id out of range: {}", id)))?;

        match self.api.book(id) {
            Ok(()) => Ok("Success!".to_string()),
            Err(LeseError::NotFound(msg)) => Err(DispatchError::NotFound(msg)),
            Err(e) => Err(DispatchError::Adapter(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl ToolDispatcher for BookingTools {
    fn catalogue(&self) -> &[ToolSpec] {
        &self.catalogue
    }

    async fn dispatch(&self, name: &str, raw_arguments: &str) -> Result<String, DispatchError> {
        let spec = find_spec(&self.catalogue, name)?;
        let args = spec.parse_arguments(raw_arguments)?;
        info!("Dispatching tool: {}", name);

        match name {
            "search_concerts" => {
                let location: Location = args
                    .str("location")?
                    .parse()
                    .map_err(DispatchError::MalformedArguments)?;
                self.search_concerts(args.str("band")?, location)
            }
            "book_ticket" => self.book_ticket(args.integer("id")?),
            _ => Err(DispatchError::UnknownTool(name.to_string())),
        }
    }
}

fn build_catalogue() -> Vec<ToolSpec> {
    let locations: Vec<&str> = ALL_LOCATIONS.iter().map(Location::as_str).collect();

    vec![
        ToolSpec::new(
            "search_concerts",
            "Searches for concerts by a specific band name and location. Returns a list of \
             concerts, each one with its ID, date, band, location, ticket prices and currency.",
            vec![
                ToolParam::string("band", "Band or artist name"),
                ToolParam::enumeration("location", "Concert location", &locations),
            ],
        ),
        ToolSpec::new(
            "book_ticket",
            "Books a concert ticket to a concert, using the concert's ID.",
            vec![ToolParam::integer("id", "The concert ID")],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> BookingTools {
        BookingTools::new(ConcertApi::new())
    }

    #[tokio::test]
    async fn test_search_finds_both_zurich_concerts() {
        let output = tools()
            .dispatch(
                "search_concerts",
                r#"{"band": "Iron Maiden", "location": "Zurich"}"#,
            )
            .await
            .unwrap();

        let matches: serde_json::Value = serde_json::from_str(&output).unwrap();
        let ids: Vec<u64> = matches
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_search_no_matches_serializes_empty_list() {
        let output = tools()
            .dispatch(
                "search_concerts",
                r#"{"band": "Iron Maiden", "location": "Toronto"}"#,
            )
            .await
            .unwrap();
        assert_eq!(output, "[]");
    }

    #[tokio::test]
    async fn test_search_missing_band() {
        let err = tools()
            .dispatch("search_concerts", r#"{"location": "Zurich"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::MissingRequiredParameter(name) if name == "band"));
    }

    #[tokio::test]
    async fn test_search_invalid_location() {
        let err = tools()
            .dispatch(
                "search_concerts",
                r#"{"band": "Iron Maiden", "location": "Oslo"}"#,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidEnumValue { param, .. } if param == "location"));
    }

    #[tokio::test]
    async fn test_book_existing_ticket() {
        let output = tools()
            .dispatch("book_ticket", r#"{"id": 1}"#)
            .await
            .unwrap();
        assert_eq!(output, "Success!");
    }

    #[tokio::test]
    async fn test_book_missing_ticket() {
        let err = tools()
            .dispatch("book_ticket", r#"{"id": 99}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_book_negative_id() {
        let err = tools()
            .dispatch("book_ticket", r#"{"id": -1}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::MalformedArguments(_)));
    }

    #[tokio::test]
    async fn test_dispatch_malformed_arguments() {
        let err = tools()
            .dispatch("book_ticket", "id=1")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::MalformedArguments(_)));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let err = tools().dispatch("cancel_ticket", "{}").await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTool(_)));
    }
}
