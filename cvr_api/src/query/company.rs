use serde_json::{json, Map, Value};

use crate::types::{CvrNumber, CVR_NUMBER_FIELD, NAME_FIELD};

use super::{common::QueryCommon, Query};

/// How a [`CompanyQuery`] selects documents.
#[derive(Clone)]
pub enum CompanyFilter {
    /// Exact match on the CVR number.
    CvrNumber(CvrNumber),
    /// Full-text match on the most recent company name.
    Name(String),
    /// Phrase-prefix match on the most recent company name.
    NamePrefix(String),
}

/// Query builder for company (`Vrvirksomhed`) documents.
#[derive(Clone, Default)]
pub struct CompanyQuery {
    pub common: QueryCommon,
    pub filter: Option<CompanyFilter>,
}

impl Query for CompanyQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_body(&self) -> Value {
        let query = match &self.filter {
            Some(CompanyFilter::CvrNumber(cvr)) => json!({ "term": { CVR_NUMBER_FIELD: cvr } }),
            Some(CompanyFilter::Name(name)) => json!({ "match": { NAME_FIELD: name } }),
            Some(CompanyFilter::NamePrefix(prefix)) => {
                json!({ "match_phrase_prefix": { NAME_FIELD: prefix } })
            }
            None => json!({ "match_all": {} }),
        };

        let mut body = Map::new();
        body.insert("query".to_string(), query);
        self.common.add_to_body(&mut body);
        Value::Object(body)
    }
}

impl CompanyQuery {
    pub fn with_cvr_number(mut self, cvr: CvrNumber) -> Self {
        self.filter = Some(CompanyFilter::CvrNumber(cvr));
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.filter = Some(CompanyFilter::Name(name.to_string()));
        self
    }

    pub fn with_name_prefix(mut self, prefix: &str) -> Self {
        self.filter = Some(CompanyFilter::NamePrefix(prefix.to_string()));
        self
    }
}
