//! Assortment
//!
//! Assortment generates the variants of a configurable product from its options (e.g. every
//! Size × Color pairing) and keeps merchant-entered stock, pricing and SKUs attached to the right
//! variant as the options are edited.

pub mod combinations;
pub mod configuration;
pub mod edits;
pub mod fixtures;
pub mod ids;
pub mod limits;
pub mod matrix;
pub mod options;
pub mod prelude;
pub mod reconcile;
pub mod utils;
pub mod variants;
