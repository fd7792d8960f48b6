// src/web/query.rs
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use std::convert::Infallible;

use crate::filter::RawQuery;

/// Request guard exposing the raw query string as a [`RawQuery`].
pub struct QueryParams(RawQuery);

impl From<RawQuery> for QueryParams {
    fn from(raw: RawQuery) -> Self {
        QueryParams(raw)
    }
}

impl QueryParams {
    pub fn into_inner(self) -> RawQuery {
        self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for QueryParams {
    type Error = Infallible;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let query = req.uri().query().map(|q| q.as_str()).unwrap_or_default();
        Outcome::Success(QueryParams(RawQuery::parse(query)))
    }
}
