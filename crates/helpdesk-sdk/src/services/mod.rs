//! API services, one per area

mod categories;
mod identity;
mod tickets;
mod users;

pub use categories::{CategoriesService, SubcategoriesService};
pub use identity::IdentityService;
pub use tickets::TicketsService;
pub use users::UsersService;

use serde_json::Value;

use crate::{Client, Page, Result};

/// Walk every page of a listing, following `totalPages`.
pub(crate) async fn collect_pages<T: serde::de::DeserializeOwned>(
    client: &Client,
    path: &str,
    page_size: u32,
) -> Result<Vec<T>> {
    let mut all = Vec::new();
    let mut page_number = 1;
    loop {
        let params = crate::ListParams::page(page_number, page_size).query();
        let value: Value = client.get_raw(path, &params).await?;
        let page = Page::<T>::from_value(value)?;
        let total_pages = page.total_pages;
        let fetched = page.data.len();
        all.extend(page.data);
        tracing::debug!(path, page_number, total_pages, fetched, "fetched page");
        if page_number >= total_pages || fetched == 0 {
            break;
        }
        page_number += 1;
    }
    Ok(all)
}
