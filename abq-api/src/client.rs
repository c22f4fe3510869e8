use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::link::RestLink;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::{AcceptedRequestDto, Collection, ErrorsDto};

/// Media type of every request and response body.
pub const MEDIA_TYPE_XML: &str = "application/xml";

/// API version this client speaks.
pub const API_VERSION: &str = "2.0";

/// Typed client for the Abiquo REST API.
///
/// Cheap to clone; clones share the same transport.
#[derive(Clone)]
pub struct Client {
    endpoint: Url,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client talking HTTP to `endpoint` (e.g. `https://host/api`).
    pub fn new(endpoint: &str, credentials: Credentials) -> Result<Self> {
        Self::builder(endpoint, credentials).build()
    }

    pub fn builder(endpoint: impl Into<String>, credentials: Credentials) -> ClientBuilder {
        ClientBuilder {
            endpoint: endpoint.into(),
            credentials,
            timeout: None,
            transport: None,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Absolute URL of an API path such as `/cloud/virtualdatacenters`.
    pub fn url(&self, path: &str) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        parse_url(&format!("{base}{path}"))
    }

    /// URL of a link, optionally extended with extra path segments.
    pub fn link_url(&self, link: &RestLink, segments: &[&str]) -> Result<Url> {
        let mut href = link.href.trim_end_matches('/').to_owned();
        for segment in segments {
            href.push('/');
            href.push_str(segment);
        }
        parse_url(&href)
    }

    // =========================================================================
    // Request execution
    // =========================================================================

    /// Send a request and fail on any non-success status.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        let mut headers = HeaderMap::new();
        let (auth_name, auth_value) = self.credentials.header()?;
        headers.insert(auth_name, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE_XML));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE_XML));
        }

        debug!(%method, %url, "sending request");
        let request = HttpRequest {
            method: method.clone(),
            url: url.clone(),
            headers,
            body,
        };
        let response = self.transport.send(request).await?;
        debug!(%method, %url, status = %response.status, "received response");

        if response.status.is_success() {
            return Ok(response);
        }

        let errors = if response.has_body() {
            quick_xml::de::from_str::<ErrorsDto>(&response.body)
                .map(|e| e.collection)
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        Err(Error::Status {
            status: response.status,
            method,
            url: url.to_string(),
            errors,
            body: response.body,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.execute(Method::GET, url, None).await?;
        decode(&response)
    }

    /// GET that maps `404 Not Found` to `None`.
    pub async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        match self.get(url).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn list<C: Collection>(&self, url: Url) -> Result<Vec<C::Item>> {
        let collection: C = self.get(url).await?;
        Ok(collection.into_items())
    }

    pub async fn post<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::POST, url, Some(encode(body)?)).await?;
        decode(&response)
    }

    pub async fn put<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.execute(Method::PUT, url, Some(encode(body)?)).await?;
        decode(&response)
    }

    /// PUT whose response body, if any, is discarded.
    pub async fn put_discarding<B: Serialize>(&self, url: Url, body: &B) -> Result<()> {
        self.execute(Method::PUT, url, Some(encode(body)?)).await?;
        Ok(())
    }

    pub async fn delete(&self, url: Url) -> Result<()> {
        self.execute(Method::DELETE, url, None).await?;
        Ok(())
    }

    /// Send a state-mutating request that the server may complete
    /// asynchronously.
    ///
    /// Returns the task reference of a `202 Accepted` response, or `None`
    /// when the operation completed synchronously.
    pub async fn accepted<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Option<AcceptedRequestDto>> {
        let body = body.map(encode).transpose()?;
        let response = self.execute(method, url, body).await?;
        if response.status != StatusCode::ACCEPTED || !response.has_body() {
            return Ok(None);
        }
        decode(&response).map(Some)
    }

    /// Like [`accepted`](Self::accepted) for operations that always answer
    /// with a task reference.
    pub async fn accepted_required<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<AcceptedRequestDto> {
        let what = format!("{method} {url}");
        self.accepted(method, url, body)
            .await?
            .ok_or_else(|| Error::Protocol(format!("{what} returned no task reference")))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("credentials", &self.credentials)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    endpoint: String,
    credentials: Credentials,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Per-request timeout of the default HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Client> {
        let endpoint = parse_url(&self.endpoint)?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.timeout)?),
        };
        Ok(Client {
            endpoint,
            credentials: self.credentials,
            transport,
        })
    }
}

/// Serialize a transfer object to its XML representation.
pub fn encode<B: Serialize>(body: &B) -> Result<String> {
    Ok(quick_xml::se::to_string(body)?)
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    Ok(quick_xml::de::from_str(&response.body)?)
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn client(mock: &MockTransport) -> Client {
        Client::builder("http://localhost/api/", Credentials::basic("admin", "xabiquo"))
            .transport(Arc::new(mock.clone()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_url_joins_paths_under_endpoint() {
        let client = client(&MockTransport::new());
        assert_eq!(
            client.url("/cloud/virtualdatacenters").unwrap().as_str(),
            "http://localhost/api/cloud/virtualdatacenters"
        );
    }

    #[test]
    fn test_link_url_appends_segments() {
        let client = client(&MockTransport::new());
        let link = RestLink::new("tiers", "http://localhost/api/cloud/virtualdatacenters/1/tiers/");
        assert_eq!(
            client.link_url(&link, &["3"]).unwrap().as_str(),
            "http://localhost/api/cloud/virtualdatacenters/1/tiers/3"
        );
    }

    #[tokio::test]
    async fn test_requests_carry_auth_and_media_headers() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "http://localhost/api/admin/datacenters", StatusCode::OK, "<datacenters/>");
        let client = client(&mock);

        client.get::<crate::types::DatacentersDto>(client.url("/admin/datacenters").unwrap())
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let headers = &requests[0].headers;
        assert_eq!(headers[ACCEPT], MEDIA_TYPE_XML);
        assert!(headers["authorization"].to_str().unwrap().starts_with("Basic "));
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_error_body_is_decoded() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "http://localhost/api/admin/datacenters",
            StatusCode::CONFLICT,
            "<errors><error><code>DC-3</code><message>Duplicated name</message></error></errors>",
        );
        let client = client(&mock);

        let err = client
            .get::<crate::types::DatacentersDto>(client.url("/admin/datacenters").unwrap())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert!(err.to_string().contains("DC-3: Duplicated name"));
    }

    #[tokio::test]
    async fn test_accepted_without_body_means_no_task() {
        let mock = MockTransport::new();
        let url = "http://localhost/api/cloud/virtualdatacenters/1/virtualappliances/1/virtualmachines/1";
        mock.on(Method::PUT, url, StatusCode::NO_CONTENT, "");
        let client = client(&mock);

        let accepted = client
            .accepted(Method::PUT, Url::parse(url).unwrap(), Some(&crate::types::LinksDto::default()))
            .await
            .unwrap();
        assert!(accepted.is_none());
    }
}
