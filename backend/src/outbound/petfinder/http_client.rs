//! Reqwest-backed adoption provider client.
//!
//! Implements both the credential-issuer and the listing-source ports against
//! the Petfinder v2 API: `POST oauth2/token` with client credentials and
//! `GET animals` with a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::ClientCredentials;
use crate::domain::adoption::{AccessToken, PetQuery, TokenGrant};
use crate::domain::ports::{AdoptionApiError, AdoptionCredentialIssuer, AdoptionListingSource};

/// Public Petfinder v2 API root.
pub const DEFAULT_PETFINDER_BASE_URL: &str = "https://api.petfinder.com/v2/";

const TOKEN_PATH: &str = "oauth2/token";
const ANIMALS_PATH: &str = "animals";

#[derive(Debug, Deserialize)]
struct TokenResponseDto {
    access_token: String,
    expires_in: u64,
}

/// Petfinder client holding optional credentials.
pub struct PetfinderHttpClient {
    client: Client,
    base_url: Url,
    credentials: Option<ClientCredentials>,
}

impl PetfinderHttpClient {
    /// Build a client with an explicit request timeout.
    ///
    /// Without credentials every call fails with
    /// [`AdoptionApiError::MissingCredentials`].
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        credentials: Option<ClientCredentials>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AdoptionApiError> {
        self.base_url
            .join(path)
            .map_err(|error| AdoptionApiError::transport(format!("invalid provider URL: {error}")))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl AdoptionCredentialIssuer for PetfinderHttpClient {
    async fn issue_token(&self) -> Result<TokenGrant, AdoptionApiError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(AdoptionApiError::missing_credentials)?;
        let response = self
            .client
            .post(self.endpoint(TOKEN_PATH)?)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id()),
                ("client_secret", credentials.client_secret()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;
        let dto: TokenResponseDto = decode_json(response).await?;
        debug!(expires_in = dto.expires_in, "issued adoption provider token");
        Ok(TokenGrant {
            access_token: AccessToken::new(dto.access_token),
            expires_in: Duration::from_secs(dto.expires_in),
        })
    }
}

#[async_trait]
impl AdoptionListingSource for PetfinderHttpClient {
    async fn list_animals(
        &self,
        token: &AccessToken,
        query: &PetQuery,
    ) -> Result<Value, AdoptionApiError> {
        let response = self
            .client
            .get(self.endpoint(ANIMALS_PATH)?)
            .bearer_auth(token.expose())
            .query(&query.to_pairs())
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_json(response).await
    }
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, AdoptionApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(AdoptionApiError::rejected(
            status.as_u16(),
            body_preview(body.as_ref()),
        ));
    }
    serde_json::from_slice(body.as_ref()).map_err(|error| {
        AdoptionApiError::decode(format!("invalid provider JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> AdoptionApiError {
    AdoptionApiError::transport(error.to_string())
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    compact.chars().take(PREVIEW_CHAR_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, dev::ServerHandle, web};
    use serde_json::json;
    use std::collections::HashMap;

    async fn fake_token(form: web::Form<HashMap<String, String>>) -> HttpResponse {
        let valid = form.get("grant_type").map(String::as_str) == Some("client_credentials")
            && form.get("client_id").map(String::as_str) == Some("id")
            && form.get("client_secret").map(String::as_str) == Some("secret");
        if valid {
            HttpResponse::Ok().json(json!({
                "token_type": "Bearer",
                "expires_in": 3600,
                "access_token": "abc"
            }))
        } else {
            HttpResponse::Unauthorized().json(json!({"title": "Unauthorized"}))
        }
    }

    async fn fake_animals(
        req: HttpRequest,
        query: web::Query<HashMap<String, String>>,
    ) -> HttpResponse {
        let authorised = req
            .headers()
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            == Some("Bearer abc");
        if !authorised {
            return HttpResponse::Unauthorized().finish();
        }
        HttpResponse::Ok().json(json!({
            "animals": [],
            "echo": query.into_inner()
        }))
    }

    async fn start_provider() -> (Url, ServerHandle) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let server = HttpServer::new(|| {
            App::new()
                .route("/v2/oauth2/token", web::post().to(fake_token))
                .route("/v2/animals", web::get().to(fake_animals))
        })
        .listen(listener)
        .expect("bind test server")
        .disable_signals()
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        // No trailing slash: the client must add one before joining paths.
        let base = Url::parse(&format!("http://{addr}/v2")).expect("url");
        (base, handle)
    }

    fn client(base: Url, credentials: Option<ClientCredentials>) -> PetfinderHttpClient {
        PetfinderHttpClient::new(base, Duration::from_secs(5), credentials).expect("client")
    }

    #[actix_rt::test]
    async fn exchanges_credentials_and_lists_animals() {
        let (base, handle) = start_provider().await;
        let client = client(base, ClientCredentials::new("id", "secret"));

        let grant = client.issue_token().await.expect("token");
        assert_eq!(grant.access_token.expose(), "abc");
        assert_eq!(grant.expires_in, Duration::from_secs(3600));

        let query = PetQuery::new(Some("cat".to_owned()), Some(5), None).expect("query");
        let body = client
            .list_animals(&grant.access_token, &query)
            .await
            .expect("listing");
        assert_eq!(
            body,
            json!({
                "animals": [],
                "echo": {"type": "cat", "limit": "5", "location": "10001"}
            })
        );

        handle.stop(false).await;
    }

    #[actix_rt::test]
    async fn surfaces_rejections_with_status() {
        let (base, handle) = start_provider().await;
        let client = client(base, ClientCredentials::new("id", "wrong"));

        let error = client.issue_token().await.expect_err("rejected");
        assert!(matches!(error, AdoptionApiError::Rejected { status: 401, .. }));

        let error = client
            .list_animals(&AccessToken::new("stale"), &PetQuery::default())
            .await
            .expect_err("rejected");
        assert!(matches!(error, AdoptionApiError::Rejected { status: 401, .. }));

        handle.stop(false).await;
    }

    #[tokio::test]
    async fn missing_credentials_short_circuit() {
        let base = Url::parse(DEFAULT_PETFINDER_BASE_URL).expect("url");
        let error = client(base, None).issue_token().await.expect_err("no creds");
        assert_eq!(error, AdoptionApiError::missing_credentials());
    }

    #[test]
    fn appends_missing_trailing_slash() {
        let url = with_trailing_slash(Url::parse("https://api.example/v2").expect("url"));
        assert_eq!(url.join("animals").expect("join").as_str(), "https://api.example/v2/animals");
    }
}
