mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, Credentials, DEFAULT_SEARCH_URL};
pub use self::errors::Error;
pub use self::query::{CompanyFilter, CompanyQuery, Query, QueryCommon};
