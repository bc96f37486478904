//! Request/response operations over the registry.
//!
//! Every operation is one awaited search followed by pure projection of the
//! returned document. Nothing is cached or retried.

use cvr_api::types::{Hit, SearchResponse};
use cvr_api::{CompanyQuery, Query};

use crate::error::CvrError;
use crate::model::{
    CompanyMatch, CvrNumber, FullDetail, GeneralInfo, KeyIndividuals, Ownership,
    PossibleOwnership,
};
use crate::normalize::EntityDocument;
use crate::registry::RegistrySearch;

/// Hits returned by a partial-name search unless configured otherwise.
pub const DEFAULT_SEARCH_SIZE: i64 = 10;

/// `_source` paths needed to list name search results.
const MATCH_SOURCE_FIELDS: &[&str] = &[
    "Vrvirksomhed.cvrNummer",
    "Vrvirksomhed.virksomhedMetadata.nyesteNavn.navn",
];

/// Company lookups against any [`RegistrySearch`] implementation.
pub struct CvrService<S> {
    registry: S,
    search_size: i64,
}

impl<S: RegistrySearch> CvrService<S> {
    pub fn new(registry: S) -> Self {
        Self {
            registry,
            search_size: DEFAULT_SEARCH_SIZE,
        }
    }

    /// Sets how many hits [`Self::search_by_partial_name`] requests.
    pub fn with_search_size(mut self, size: i64) -> Self {
        self.search_size = size;
        self
    }

    pub fn registry(&self) -> &S {
        &self.registry
    }

    async fn search(&self, query: &CompanyQuery) -> Result<SearchResponse, CvrError> {
        Ok(self.registry.search(query).await?)
    }

    /// Searches by CVR number and returns the first hit.
    async fn fetch_company(&self, cvr: CvrNumber) -> Result<Hit, CvrError> {
        let query = CompanyQuery::default().with_cvr_number(cvr).with_size(1);
        let response = self.search(&query).await?;
        response
            .hits
            .hits
            .into_iter()
            .next()
            .ok_or_else(|| CvrError::NotFound(format!("no company with CVR number {}", cvr)))
    }

    /// Returns the best match for a company name, with its registered name.
    pub async fn lookup_by_name(&self, name: &str) -> Result<CompanyMatch, CvrError> {
        let query = CompanyQuery::default().with_name(name).with_size(1);
        let response = self.search(&query).await?;
        let hit = response
            .first()
            .ok_or_else(|| CvrError::NotFound(format!("no company named '{}'", name)))?;
        EntityDocument::from_hit(hit)?.company_match().ok_or_else(|| {
            CvrError::MalformedRecord(format!("best match for '{}' has no CVR number", name))
        })
    }

    /// Returns the CVR number of the best match for a company name.
    pub async fn lookup_id_by_name(&self, name: &str) -> Result<CvrNumber, CvrError> {
        Ok(self.lookup_by_name(name).await?.cvr_number)
    }

    /// Lists companies whose most recent name starts with `prefix`.
    ///
    /// Hits without a company document or CVR number are skipped. Zero hits
    /// is an empty list, not an error.
    pub async fn search_by_partial_name(&self, prefix: &str) -> Result<Vec<CompanyMatch>, CvrError> {
        let query = MATCH_SOURCE_FIELDS.iter().fold(
            CompanyQuery::default()
                .with_name_prefix(prefix)
                .with_size(self.search_size),
            |query, field| query.with_source_field(field),
        );
        let response = self.search(&query).await?;
        tracing::debug!(
            "Prefix '{}' matched {} companies, {} returned",
            prefix,
            response.total(),
            response.hits.hits.len()
        );

        let mut matches = Vec::with_capacity(response.hits.hits.len());
        for hit in &response.hits.hits {
            let found = EntityDocument::from_hit(hit)
                .ok()
                .and_then(|document| document.company_match());
            match found {
                Some(company) => matches.push(company),
                None => tracing::warn!(
                    "Skipping search hit {} without a company document",
                    hit.id.as_deref().unwrap_or("<no id>")
                ),
            }
        }
        Ok(matches)
    }

    pub async fn get_general_info(&self, cvr: CvrNumber) -> Result<GeneralInfo, CvrError> {
        let hit = self.fetch_company(cvr).await?;
        Ok(EntityDocument::from_hit(&hit)?.general_info())
    }

    pub async fn get_possible_ownership(
        &self,
        cvr: CvrNumber,
    ) -> Result<PossibleOwnership, CvrError> {
        let hit = self.fetch_company(cvr).await?;
        Ok(EntityDocument::from_hit(&hit)?.possible_ownership())
    }

    pub async fn get_key_individuals(&self, cvr: CvrNumber) -> Result<KeyIndividuals, CvrError> {
        let hit = self.fetch_company(cvr).await?;
        Ok(EntityDocument::from_hit(&hit)?.key_individuals())
    }

    pub async fn get_ownership(&self, cvr: CvrNumber) -> Result<Ownership, CvrError> {
        let hit = self.fetch_company(cvr).await?;
        Ok(EntityDocument::from_hit(&hit)?.ownership())
    }

    pub async fn get_full_detail(&self, cvr: CvrNumber) -> Result<FullDetail, CvrError> {
        let hit = self.fetch_company(cvr).await?;
        Ok(EntityDocument::from_hit(&hit)?.full_detail())
    }
}
