//! Following `nextPageToken` across list calls.
//!
//! Google list methods take a `pageToken` query parameter and answer with a
//! `nextPageToken` field until the last page.

use http::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ApiClient, ApiClientError, CallParams, NoBody};

/// A parameter bag of a paginated list method.
pub trait PageTokenParams: CallParams {
    /// Sets the `pageToken` of the next request, `None` for the first page.
    fn set_page_token(&mut self, token: Option<String>);
}

/// A page of a list method.
pub trait Paginated {
    /// Returns the token of the next page, `None` on the last page.
    fn next_page_token(&self) -> Option<&str>;
}

impl ApiClient {
    /// Performs a list call and follows `nextPageToken` until the last page.
    ///
    /// Stops when a page has no token, an empty token, or the token of the
    /// previous page. `max_pages` bounds the number of requests.
    ///
    /// # Errors
    ///
    /// Returns the first error, the pages fetched before it are dropped.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gapi_core::{ApiClient, CallParams, CallQuery, PageTokenParams, Paginated};
    /// use http::Method;
    /// # use serde::Deserialize;
    ///
    /// #[derive(Default)]
    /// struct ListFiles {
    ///     page_token: Option<String>,
    /// }
    ///
    /// impl CallParams for ListFiles {
    ///     fn add_query_params(&self, query: CallQuery) -> CallQuery {
    ///         query.add_param("pageToken", &self.page_token)
    ///     }
    /// }
    ///
    /// impl PageTokenParams for ListFiles {
    ///     fn set_page_token(&mut self, token: Option<String>) {
    ///         self.page_token = token;
    ///     }
    /// }
    ///
    /// #[derive(Deserialize)]
    /// #[serde(rename_all = "camelCase")]
    /// struct FileList {
    ///     next_page_token: Option<String>,
    ///     files: Vec<serde_json::Value>,
    /// }
    ///
    /// impl Paginated for FileList {
    ///     fn next_page_token(&self) -> Option<&str> {
    ///         self.next_page_token.as_deref()
    ///     }
    /// }
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ApiClient::builder()
    ///     .with_base_url("https://www.googleapis.com/drive/v3/")
    ///     .build()?;
    ///
    /// let pages: Vec<FileList> = client
    ///     .perform_all_pages(Method::GET, "files", ListFiles::default(), Some(10))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn perform_all_pages<P, O>(
        &self,
        method: Method,
        path: &str,
        mut params: P,
        max_pages: Option<usize>,
    ) -> Result<Vec<O>, ApiClientError>
    where
        P: PageTokenParams,
        O: DeserializeOwned + Paginated,
    {
        let mut pages = Vec::new();

        loop {
            if max_pages.is_some_and(|max| pages.len() >= max) {
                warn!(%path, pages = pages.len(), "page limit reached");
                break;
            }

            let page: O = self
                .perform(method.clone(), path, &params, None::<&NoBody>)
                .await?;

            let previous = last_token(&pages);
            let next = page
                .next_page_token()
                .filter(|token| !token.is_empty())
                .filter(|token| previous.as_deref() != Some(*token))
                .map(str::to_string);
            pages.push(page);

            let Some(token) = next else {
                break;
            };
            debug!(%path, page = pages.len(), "following next page");
            params.set_page_token(Some(token));
        }

        Ok(pages)
    }
}

fn last_token<O: Paginated>(pages: &[O]) -> Option<String> {
    pages
        .last()
        .and_then(Paginated::next_page_token)
        .map(str::to_string)
}
