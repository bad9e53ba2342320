//! Cross-referencing fetched collections into per-policy email routing.
//!
//! Two strategies, one per API generation. They report "no recipients"
//! differently and the difference is kept: the legacy join substitutes a
//! placeholder, the workflow join yields an empty set.

pub mod legacy;
pub mod workflow;

pub use legacy::{NO_CHANNEL, email_channel_names};
pub use workflow::EmailRouting;
