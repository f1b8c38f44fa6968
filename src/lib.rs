//! Browsable catalog pages for MITRE knowledge-base entities.
//!
//! A read-oriented content browser: users navigate entity listings, apply
//! filters, view detail pages, and follow canonical-identifier redirects.
//! The route composer derives a consistent index/detail/filter endpoint
//! triple per entity from an explicit registration table, bound to generic
//! listing/detail/filter-entry engines. Filter criteria travel through URLs
//! as an encoded `q` token and are evaluated by a pluggable filterset
//! capability.
//!
//! Record storage and page templating are collaborators behind the
//! [`store::RecordStore`] and [`render::Renderer`] traits.

pub mod attack;
pub mod config;
pub mod entity;
pub mod error;
pub mod filtering;
pub mod mbc;
pub mod record;
pub mod render;
pub mod routes;
pub mod state;
pub mod store;
pub mod views;

pub use config::Config;
pub use error::{AppError, ConfigError, ValidationError};
pub use state::AppState;
