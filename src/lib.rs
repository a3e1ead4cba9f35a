//! Orthographic globe maps, one per country.
//!
//! The pipeline fetches the country list ([`country`]), resolves each
//! country's boundary ([`resolver`]), renders a globe centered on it
//! ([`map`]) and saves the result ([`batch`]).

pub mod batch;
pub mod config;
pub mod country;
pub mod data;
pub mod error;
pub mod map;
pub mod resolver;
