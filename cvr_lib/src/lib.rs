//! Library layer for CVR company lookups: normalization, service operations,
//! configuration, validation, and the document export boundary.
//!
//! Wraps the `cvr_api` crate. Raw `Vrvirksomhed` documents are projected into
//! flat output shapes by the [`normalize`] module; [`CvrService`] runs one
//! registry search per operation and projects the first hit.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod service;
pub mod validation;

pub use cvr_api;
pub use cvr_api::types;
pub use cvr_api::{Client, CompanyFilter, CompanyQuery, Credentials, Query};

pub use config::{ConfigError, ExportSettings, Settings};
pub use error::CvrError;
pub use export::{CommandTrigger, DocumentExporter, ExportTrigger, ExportedFile};
pub use model::{
    CompanyMatch, CvrNumber, FullDetail, GeneralInfo, KeyIndividuals, KeyPerson, Owner, OwnerType,
    Ownership, OwnershipBuckets, PossibleOwners, PossibleOwnership, RoleBuckets,
};
pub use registry::RegistrySearch;
pub use service::CvrService;
