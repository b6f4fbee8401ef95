use async_trait::async_trait;
use skyway_core::{CoreResult, Request, RequestHandler, ValidationErrors};
use skyway_shared::{PageParams, PagedResult};
use std::sync::Arc;

use crate::models::FlightDto;
use crate::repository::{FlightRepository, SORTABLE_FIELDS};

/// Paged flight listing; the search term matches the flight number.
#[derive(Debug, Clone, Default)]
pub struct GetFlights {
    pub params: PageParams,
}

impl Request for GetFlights {
    const NAME: &'static str = "flight.get_flights";
    type Response = PagedResult<FlightDto>;
}

pub struct GetFlightsHandler {
    repository: Arc<dyn FlightRepository>,
}

impl GetFlightsHandler {
    pub fn new(repository: Arc<dyn FlightRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetFlights> for GetFlightsHandler {
    fn validate(&self, request: &GetFlights) -> Result<(), ValidationErrors> {
        request.params.rules(SORTABLE_FIELDS).finish()
    }

    async fn handle(&self, request: GetFlights) -> CoreResult<PagedResult<FlightDto>> {
        let page = self.repository.find_flights(&request.params.to_query()).await?;
        Ok(page.map(FlightDto::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{create_flight, Harness};
    use skyway_core::CoreError;

    async fn seeded(count: usize) -> Harness {
        let harness = Harness::new();
        for i in 0..count {
            harness
                .mediator
                .send(create_flight(&format!("SK{:03}", i)))
                .await
                .unwrap();
        }
        harness
    }

    fn page(page: i64, page_size: i64) -> GetFlights {
        GetFlights {
            params: PageParams {
                page,
                page_size,
                ..PageParams::default()
            },
        }
    }

    #[tokio::test]
    async fn test_second_page_returns_offset_items_and_total() {
        let harness = seeded(25).await;

        let result = harness.mediator.send(page(2, 10)).await.unwrap();

        assert_eq!(result.total, 25);
        let ids: Vec<i64> = result.items.iter().map(|f| f.id).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_page_beyond_data_is_empty_not_error() {
        let harness = seeded(25).await;

        let result = harness.mediator.send(page(9, 10)).await.unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.total, 25);
    }

    #[tokio::test]
    async fn test_page_number_beyond_u32_is_empty() {
        let harness = seeded(25).await;

        let result = harness
            .mediator
            .send(page(u32::MAX as i64 + 2, 10))
            .await
            .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.total, 25);
    }

    #[tokio::test]
    async fn test_descending_search_by_flight_number() {
        let harness = seeded(12).await;
        let request = GetFlights {
            params: PageParams {
                order_by: "flightNumber".into(),
                order: "DESC".into(),
                search_term: Some("SK01".into()),
                ..PageParams::default()
            },
        };

        let result = harness.mediator.send(request).await.unwrap();

        let numbers: Vec<&str> = result.items.iter().map(|f| f.flight_number.as_str()).collect();
        assert_eq!(numbers, vec!["SK011", "SK010"]);
        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn test_unknown_sort_field_is_rejected() {
        let harness = Harness::new();
        let request = GetFlights {
            params: PageParams {
                order_by: "password".into(),
                ..PageParams::default()
            },
        };

        let err = harness.mediator.send(request).await.unwrap_err();

        assert!(matches!(err, CoreError::ValidationFailed(_)));
    }
}
