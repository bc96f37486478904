//! The search seam between the service operations and the registry index.

use std::future::Future;

use cvr_api::types::SearchResponse;
use cvr_api::{Client, CompanyQuery};

/// Executes a company query against the registry index.
///
/// [`cvr_api::Client`] is the production implementation. Tests substitute
/// canned responses.
pub trait RegistrySearch {
    fn search(
        &self,
        query: &CompanyQuery,
    ) -> impl Future<Output = Result<SearchResponse, cvr_api::Error>> + Send;
}

impl RegistrySearch for Client {
    fn search(
        &self,
        query: &CompanyQuery,
    ) -> impl Future<Output = Result<SearchResponse, cvr_api::Error>> + Send {
        Client::search(self, query)
    }
}
