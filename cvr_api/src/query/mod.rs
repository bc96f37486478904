mod common;
pub use self::common::{Query, QueryCommon};
mod company;
pub use self::company::{CompanyFilter, CompanyQuery};
