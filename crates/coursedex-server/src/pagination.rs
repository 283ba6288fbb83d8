//! Page-number pagination.

use crate::error::ApiError;
use crate::params::Params;
use coursedex_core::api::Page;
use coursedex_core::config::ServerConfig;

/// Requested page, validated against the server limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    /// Read `page` and `page_size`. A `page` that is not a positive number is
    /// an invalid page; a bad `page_size` falls back to the default.
    pub fn from_params(params: &Params, server: &ServerConfig) -> Result<Self, ApiError> {
        let page = match params.non_empty("page") {
            None => 1,
            Some(raw) => match raw.parse::<usize>() {
                Ok(page) if page > 0 => page,
                _ => return Err(ApiError::invalid_page()),
            },
        };
        let page_size = params
            .non_empty("page_size")
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|size| *size > 0)
            .map_or(server.default_page_size, |size| size.min(server.max_page_size));

        Ok(Self { page, page_size })
    }

    /// Cut one page out of `items`, converting the kept entries with `f`.
    ///
    /// Links repeat the request parameters with `page` replaced; the link to
    /// page 1 omits `page`.
    pub fn apply<T, U>(
        &self,
        items: Vec<T>,
        links: (&Params, &str, &str),
        f: impl FnMut(T) -> U,
    ) -> Result<Page<U>, ApiError> {
        let (params, base, path) = links;
        let count = items.len();
        let pages = count.div_ceil(self.page_size).max(1);
        if self.page > pages {
            return Err(ApiError::invalid_page());
        }

        let next = (self.page < pages).then(|| {
            let page = (self.page + 1).to_string();
            params.url(base, path, &["page"], &[("page", page.as_str())])
        });
        let previous = match self.page {
            1 => None,
            2 => Some(params.url(base, path, &["page"], &[])),
            n => {
                let page = (n - 1).to_string();
                Some(params.url(base, path, &["page"], &[("page", page.as_str())]))
            }
        };

        let results = items
            .into_iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .map(f)
            .collect();

        Ok(Page {
            count,
            next,
            previous,
            results,
        })
    }
}
