//! Normalization of raw registry documents into flat output shapes.
//!
//! Nothing in here fails on missing or oddly shaped data: absent scalars
//! become `"N/A"`, absent lists become empty. Only unwrapping the company
//! envelope of a search hit can fail.

pub mod address;
pub mod participants;
pub mod projection;
pub mod temporal;
pub mod value;

/// Placeholder for any scalar the registry does not provide.
pub const NOT_AVAILABLE: &str = "N/A";

pub use address::format_address;
pub use participants::{
    classify_ownership, classify_possible_owners, classify_roles, ParticipantRelation,
};
pub use projection::EntityDocument;
pub use temporal::{AttributeHistory, OwnershipShare};
pub use value::OneOrMany;
