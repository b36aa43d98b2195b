//! Datadog API client for the HTTP(S) protocol.
use anyhow::Result;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::Client as ReqwestClient;
use serde_json::Value as Json;

use datadog_client::models::ApiKeyValidation;
use datadog_client::models::RoleList;
use datadog_client::models::RoleUserRequest;
use datadog_client::models::TeamList;
use datadog_client::models::User;
use datadog_client::models::UserList;
use datadog_client::models::UserResponse;
use datadog_client::models::UserTeamList;
use datadog_client::models::UserTeamRequest;
use datadog_client::IDatadog;

mod config;

pub mod error;

pub use self::config::ClientOptions;
pub use self::config::ClientOptionsBuilder;

/// String to set as the user agent in HTTP request.
static CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key on every request.
const HEADER_API_KEY: &str = "DD-API-KEY";

/// Header carrying the application key on every request.
const HEADER_APP_KEY: &str = "DD-APPLICATION-KEY";

/// Datadog API client for the HTTP(S) protocol.
pub struct HttpClient {
    /// Base URL of the API server to send requests to.
    base: String,

    /// Low-level [`Client`](reqwest::Client) to perform HTTP requests with.
    client: ReqwestClient,
}

impl HttpClient {
    /// Initialise a client with [`ClientOptions`].
    pub fn with<O>(options: O) -> Result<HttpClient>
    where
        O: Into<ClientOptions>,
    {
        let options = options.into();
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(&options.api_key)?;
        api_key.set_sensitive(true);
        headers.insert(HEADER_API_KEY, api_key);
        let mut app_key = HeaderValue::from_str(&options.app_key)?;
        app_key.set_sensitive(true);
        headers.insert(HEADER_APP_KEY, app_key);
        let client = ReqwestClient::builder()
            .connect_timeout(options.timeout_connect)
            .timeout(options.timeout)
            .default_headers(headers)
            .user_agent(CLIENT_USER_AGENT);
        let client = HttpClient {
            base: options.address,
            client: client.build()?,
        };
        Ok(client)
    }

    async fn get_page<T>(&self, url: String, page: u64) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(url)
            .query(&[("page[number]", page)])
            .send()
            .await?;
        match crate::error::inspect(response).await? {
            None => anyhow::bail!(crate::error::EmptyResponse),
            Some(response) => Ok(response),
        }
    }
}

#[async_trait::async_trait]
impl IDatadog for HttpClient {
    async fn validate(&self) -> Result<ApiKeyValidation> {
        let response = self
            .client
            .get(format!("{}api/v1/validate", self.base))
            .send()
            .await?;
        match crate::error::inspect(response).await? {
            None => anyhow::bail!(crate::error::EmptyResponse),
            Some(response) => Ok(response),
        }
    }

    async fn user_get(&self, user: &str) -> Result<User> {
        let response = self
            .client
            .get(format!("{}api/v2/users/{}", self.base, user))
            .send()
            .await?;
        match crate::error::inspect::<UserResponse>(response).await? {
            None => anyhow::bail!(crate::error::EmptyResponse),
            Some(response) => Ok(response.data),
        }
    }

    async fn users_list(&self, page: u64) -> Result<UserList> {
        self.get_page(format!("{}api/v2/users", self.base), page)
            .await
    }

    async fn teams_list(&self, page: u64) -> Result<TeamList> {
        self.get_page(format!("{}api/v2/team", self.base), page)
            .await
    }

    async fn team_memberships(&self, team: &str, page: u64) -> Result<UserTeamList> {
        self.get_page(
            format!("{}api/v2/team/{}/memberships", self.base, team),
            page,
        )
        .await
    }

    async fn team_membership_create(&self, team: &str, request: UserTeamRequest) -> Result<()> {
        let response = self
            .client
            .post(format!("{}api/v2/team/{}/memberships", self.base, team))
            .json(&request)
            .send()
            .await?;
        crate::error::inspect::<Json>(response).await?;
        Ok(())
    }

    async fn team_membership_delete(&self, team: &str, user: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!(
                "{}api/v2/team/{}/memberships/{}",
                self.base, team, user
            ))
            .send()
            .await?;
        crate::error::inspect::<Json>(response).await?;
        Ok(())
    }

    async fn roles_list(&self, page: u64) -> Result<RoleList> {
        self.get_page(format!("{}api/v2/roles", self.base), page)
            .await
    }

    async fn role_users(&self, role: &str, page: u64) -> Result<UserList> {
        self.get_page(format!("{}api/v2/roles/{}/users", self.base, role), page)
            .await
    }

    async fn role_user_add(&self, role: &str, request: RoleUserRequest) -> Result<()> {
        let response = self
            .client
            .post(format!("{}api/v2/roles/{}/users", self.base, role))
            .json(&request)
            .send()
            .await?;
        crate::error::inspect::<Json>(response).await?;
        Ok(())
    }

    async fn role_user_remove(&self, role: &str, request: RoleUserRequest) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}api/v2/roles/{}/users", self.base, role))
            .json(&request)
            .send()
            .await?;
        crate::error::inspect::<Json>(response).await?;
        Ok(())
    }
}
