use async_trait::async_trait;
use skyway_core::{CoreResult, Request, RequestHandler, ValidationErrors};
use skyway_shared::{PageParams, PagedResult};
use std::sync::Arc;

use crate::models::PassengerDto;
use crate::repository::{PassengerRepository, SORTABLE_FIELDS};

/// Paged passenger listing; the search term matches the passenger name.
///
/// `pageSize` is capped at [`skyway_shared::MAX_PAGE_SIZE`] like every other
/// listing; a larger size fails validation instead of returning everything.
#[derive(Debug, Clone, Default)]
pub struct GetPassengers {
    pub params: PageParams,
}

impl Request for GetPassengers {
    const NAME: &'static str = "passenger.get_passengers";
    type Response = PagedResult<PassengerDto>;
}

pub struct GetPassengersHandler {
    repository: Arc<dyn PassengerRepository>,
}

impl GetPassengersHandler {
    pub fn new(repository: Arc<dyn PassengerRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetPassengers> for GetPassengersHandler {
    fn validate(&self, request: &GetPassengers) -> Result<(), ValidationErrors> {
        request.params.rules(SORTABLE_FIELDS).finish()
    }

    async fn handle(&self, request: GetPassengers) -> CoreResult<PagedResult<PassengerDto>> {
        let page = self.repository.find_passengers(&request.params.to_query()).await?;
        Ok(page.map(PassengerDto::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::CreatePassenger;
    use crate::fixtures::{create_passenger, Harness};

    #[tokio::test]
    async fn test_sorted_by_passport_number_descending() {
        let harness = Harness::new();
        for (user_id, passport) in [(1, "B200"), (2, "C300"), (3, "A100")] {
            harness
                .mediator
                .send(CreatePassenger {
                    passport_number: Some(passport.into()),
                    ..create_passenger(user_id)
                })
                .await
                .unwrap();
        }

        let result = harness
            .mediator
            .send(GetPassengers {
                params: PageParams {
                    order_by: "passportNumber".into(),
                    order: "DESC".into(),
                    page_size: 2,
                    ..PageParams::default()
                },
            })
            .await
            .unwrap();

        let passports: Vec<&str> = result.items.iter().map(|p| p.passport_number.as_str()).collect();
        assert_eq!(passports, vec!["C300", "B200"]);
        assert_eq!(result.total, 3);
    }

    #[tokio::test]
    async fn test_empty_listing_serializes_as_empty_array() {
        let harness = Harness::new();

        let result = harness.mediator.send(GetPassengers::default()).await.unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["total"], 0);
    }
}
