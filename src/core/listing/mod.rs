mod controller;
mod error;
mod page;

pub use controller::{ListingController, ListingView, NetworkStatus, PageFetcher, Presentation};
pub use error::PageFetchError;
pub use page::{combine, Identity, Page, PageInfo};
