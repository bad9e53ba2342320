//! NerdGraph (GraphQL) API: alert policies, workflows and notification
//! channels/destinations.

pub mod client;
pub mod page;
pub mod queries;
pub mod types;

pub use client::NerdGraphClient;
pub use page::{Page, extract_page};
pub use queries::PagedQuery;
pub use types::{Destination, NotificationChannel, Policy, Workflow};
