//! Credit and trust scoring for small and medium business profiles.
//!
//! The [`scoring`] module holds the engine itself: it reads a
//! [`scoring::BusinessProfile`] and produces a 300-850 credit score and a
//! 0-100 trust score, each with itemized components, a tier and a synthetic
//! trend. The remaining modules carry the service plumbing shared with the
//! HTTP adapter in `services/api`.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
