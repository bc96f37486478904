mod search;
pub use self::search::{
    CvrNumber, Hit, Hits, SearchResponse, TotalHits, CVR_NUMBER_FIELD, ENTITY_KEY, NAME_FIELD,
};
