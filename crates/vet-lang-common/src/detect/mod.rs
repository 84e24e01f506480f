//! Table-driven detection routines.
//!
//! All algorithms here are language-agnostic: node-kind decisions go
//! through [`NodeTypeTable`](vet_lang_api::NodeTypeTable) and pattern
//! decisions through [`DetectorHooks`](crate::DetectorHooks). Language
//! crates reach these via [`TableDetector`](crate::TableDetector).

pub(crate) mod quality;
pub(crate) mod security;

pub mod async_misuse;
