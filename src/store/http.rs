//! HttpSparqlStore: SPARQL 1.1 protocol client
//!
//! Queries and updates are sent as form-encoded `POST` bodies. When the store
//! answers `401`, the request is repeated once with credentials matching the
//! challenge (Digest or Basic).

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::{Challenge, SparqlStore, StoreError, StoreResult};
use crate::config::Config;
use crate::rdf::{parse_turtle, Triple};
use crate::sparql::{ResultFormat, SparqlResults};

/// `application/x-www-form-urlencoded` keeps only these unescaped
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

const TURTLE: &str = "text/turtle";

/// User name and password for the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// Network client for a SPARQL 1.1 endpoint.
pub struct HttpSparqlStore {
    client: Client,
    query_endpoint: Url,
    update_endpoint: Url,
    credentials: Option<Credentials>,
}

impl HttpSparqlStore {
    /// Create a client sending queries and updates to `endpoint`.
    ///
    /// # Example
    /// ```no_run
    /// # use device_repo::store::HttpSparqlStore;
    /// let store = HttpSparqlStore::new("http://localhost:8890/sparql").unwrap();
    /// ```
    pub fn new(endpoint: &str) -> StoreResult<Self> {
        Ok(Self {
            client: Client::new(),
            query_endpoint: parse_url(endpoint)?,
            update_endpoint: parse_url(endpoint)?,
            credentials: None,
        })
    }

    /// Create a client from repository configuration
    pub fn from_config(config: &Config) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let update_endpoint = config.update_endpoint.as_deref().unwrap_or(&config.endpoint);

        let credentials = match (&config.user, &config.password) {
            (Some(user), password) if !user.is_empty() => Some(Credentials {
                user: user.clone(),
                password: password.clone().unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Self {
            client,
            query_endpoint: parse_url(&config.endpoint)?,
            update_endpoint: parse_url(update_endpoint)?,
            credentials,
        })
    }

    /// Send updates to a different endpoint than queries
    pub fn with_update_endpoint(mut self, endpoint: &str) -> StoreResult<Self> {
        self.update_endpoint = parse_url(endpoint)?;
        Ok(self)
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// POST `{param}={text}` and return the success body
    async fn post(&self, endpoint: &Url, param: &str, text: &str, accept: &str) -> StoreResult<Vec<u8>> {
        let body = format!("{param}={}", utf8_percent_encode(text, FORM));

        let mut response = self.send(endpoint, &body, accept, None).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let Some(credentials) = &self.credentials else {
                return Err(StoreError::Auth("store requires credentials".to_string()));
            };
            let challenge = response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok())
                .and_then(Challenge::parse)
                .ok_or_else(|| StoreError::Auth("unsupported authentication challenge".to_string()))?;

            debug!(endpoint = %endpoint, "answering authentication challenge");
            response = self
                .send(endpoint, &body, accept, Some((credentials, &challenge)))
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(StoreError::Auth(format!(
                    "credentials for {} refused",
                    credentials.user
                )));
            }
        }

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(status = status.as_u16(), "store rejected request");
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(bytes.to_vec())
    }

    async fn send(
        &self,
        endpoint: &Url,
        body: &str,
        accept: &str,
        auth: Option<(&Credentials, &Challenge)>,
    ) -> StoreResult<reqwest::Response> {
        let mut request = self
            .client
            .post(endpoint.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, accept)
            .body(body.to_string());

        match auth {
            Some((credentials, Challenge::Digest(challenge))) => {
                let uri = request_uri(endpoint);
                let header = challenge.authorization(
                    &credentials.user,
                    &credentials.password,
                    "POST",
                    &uri,
                );
                request = request.header(AUTHORIZATION, header);
            }
            Some((credentials, Challenge::Basic)) => {
                request = request.basic_auth(&credentials.user, Some(&credentials.password));
            }
            None => {}
        }

        Ok(request.send().await?)
    }
}

#[async_trait]
impl SparqlStore for HttpSparqlStore {
    async fn select(&self, query: &str) -> StoreResult<Vec<Triple>> {
        debug!("sparql select");
        let format = ResultFormat::Json;
        let body = self
            .post(&self.query_endpoint, "query", query, format.media_type())
            .await?;
        Ok(SparqlResults::parse(&body, format)?.into_triples()?)
    }

    async fn construct(&self, query: &str) -> StoreResult<Vec<Triple>> {
        debug!("sparql construct");
        let body = self
            .post(&self.query_endpoint, "query", query, TURTLE)
            .await?;
        Ok(parse_turtle(&String::from_utf8_lossy(&body))?)
    }

    async fn ask(&self, query: &str) -> StoreResult<bool> {
        debug!("sparql ask");
        let format = ResultFormat::Json;
        let body = self
            .post(&self.query_endpoint, "query", query, format.media_type())
            .await?;
        Ok(SparqlResults::parse(&body, format)?.into_boolean()?)
    }

    async fn update(&self, update: &str) -> StoreResult<()> {
        debug!("sparql update");
        self.post(&self.update_endpoint, "update", update, "*/*")
            .await?;
        Ok(())
    }
}

fn parse_url(endpoint: &str) -> StoreResult<Url> {
    Url::parse(endpoint).map_err(|e| StoreError::InvalidEndpoint(format!("{endpoint}: {e}")))
}

/// Request target as it appears in the digest `uri` parameter
fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}
