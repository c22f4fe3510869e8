//! Filters and paging of search listings, sent as query parameters.

use reqwest::Url;

/// Accumulates the parameters that are set.
#[derive(Debug, Default)]
struct Query(Vec<(&'static str, String)>);

impl Query {
    fn param(mut self, name: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.0.push((name, value.to_string()));
        }
        self
    }

    /// Append to `url`. A URL without parameters is left untouched.
    fn apply(self, mut url: Url) -> Url {
        if !self.0.is_empty() {
            url.query_pairs_mut().extend_pairs(self.0);
        }
        url
    }
}

/// Paging shared by every search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Paging {
    start_with: Option<u32>,
    limit: Option<u32>,
}

impl Paging {
    fn query(&self) -> Query {
        Query::default()
            .param("startwith", self.start_with)
            .param("limit", self.limit)
    }
}

/// Search over enterprises.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnterpriseOptions {
    has: Option<String>,
    order_by: Option<String>,
    ascending: Option<bool>,
    paging: Paging,
}

impl EnterpriseOptions {
    /// Only enterprises whose name contains `text`.
    pub fn has(mut self, text: impl Into<String>) -> Self {
        self.has = Some(text.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order_by = Some(field.into());
        self.ascending = Some(ascending);
        self
    }

    /// Skip the first `start` results.
    pub fn start_with(mut self, start: u32) -> Self {
        self.paging.start_with = Some(start);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.paging.limit = Some(limit);
        self
    }

    pub(crate) fn apply(&self, url: Url) -> Url {
        self.paging
            .query()
            .param("has", self.has.as_deref())
            .param("by", self.order_by.as_deref())
            .param("asc", self.ascending)
            .apply(url)
    }
}

/// Search over the volumes of a virtual datacenter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeOptions {
    only_available: bool,
    has: Option<String>,
    order_by: Option<String>,
    ascending: Option<bool>,
    paging: Paging,
}

impl VolumeOptions {
    /// Only volumes not attached to any virtual machine.
    pub fn only_available(mut self) -> Self {
        self.only_available = true;
        self
    }

    /// Only volumes whose name contains `text`.
    pub fn has(mut self, text: impl Into<String>) -> Self {
        self.has = Some(text.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order_by = Some(field.into());
        self.ascending = Some(ascending);
        self
    }

    pub fn start_with(mut self, start: u32) -> Self {
        self.paging.start_with = Some(start);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.paging.limit = Some(limit);
        self
    }

    pub(crate) fn apply(&self, url: Url) -> Url {
        self.paging
            .query()
            .param("available", self.only_available.then_some(true))
            .param("has", self.has.as_deref())
            .param("by", self.order_by.as_deref())
            .param("asc", self.ascending)
            .apply(url)
    }
}

/// Paging over the addresses of a network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IpOptions {
    paging: Paging,
}

impl IpOptions {
    pub fn start_with(mut self, start: u32) -> Self {
        self.paging.start_with = Some(start);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.paging.limit = Some(limit);
        self
    }

    pub(crate) fn apply(&self, url: Url) -> Url {
        self.paging.query().apply(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost/api/admin/enterprises").unwrap()
    }

    #[test]
    fn test_unset_options_leave_url_alone() {
        assert_eq!(EnterpriseOptions::default().apply(base()).as_str(), base().as_str());
        assert_eq!(IpOptions::default().apply(base()).as_str(), base().as_str());
    }

    #[test]
    fn test_enterprise_options_query() {
        let url = EnterpriseOptions::default()
            .has("abi quo")
            .order_by("name", true)
            .start_with(20)
            .limit(10)
            .apply(base());
        assert_eq!(
            url.as_str(),
            "http://localhost/api/admin/enterprises?startwith=20&limit=10&has=abi+quo&by=name&asc=true"
        );
    }

    #[test]
    fn test_volume_options_query() {
        let url = VolumeOptions::default()
            .only_available()
            .has("data")
            .apply(base());
        assert_eq!(url.query(), Some("available=true&has=data"));
    }
}
