//! Configuration options for Datadog HTTP(S) clients.
use std::time::Duration;

/// Options to initialise clients with.
pub struct ClientOptions {
    /// Base URL of the API server to connect to, with trailing slash.
    pub address: String,

    /// API key used to authenticate to the API.
    pub api_key: String,

    /// Application key paired with the API key to scope API access.
    pub app_key: String,

    /// Timeout for requests made by the client.
    pub timeout: Duration,

    /// Timeout for new connections initialised by the client.
    pub timeout_connect: Duration,
}

impl ClientOptions {
    /// Define options for clients of a Datadog site (e.g. `datadoghq.com`).
    ///
    /// Full URLs (anything with a scheme) are used as the API address as-is,
    /// which is how tests point clients at local servers.
    pub fn site<S>(site: S) -> ClientOptionsBuilder
    where
        S: Into<String>,
    {
        ClientOptionsBuilder {
            site: site.into(),
            api_key: String::new(),
            app_key: String::new(),
            timeout: Duration::from_secs(30),
            timeout_connect: Duration::from_secs(1),
        }
    }
}

/// Incrementally build [`ClientOptions`] objects.
pub struct ClientOptionsBuilder {
    site: String,
    api_key: String,
    app_key: String,
    timeout: Duration,
    timeout_connect: Duration,
}

impl ClientOptionsBuilder {
    pub fn api_key<S>(mut self, api_key: S) -> Self
    where
        S: Into<String>,
    {
        self.api_key = api_key.into();
        self
    }

    pub fn app_key<S>(mut self, app_key: S) -> Self
    where
        S: Into<String>,
    {
        self.app_key = app_key.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_connect(mut self, timeout_connect: Duration) -> Self {
        self.timeout_connect = timeout_connect;
        self
    }

    /// All options are set, get a usable options object.
    pub fn client(self) -> ClientOptions {
        self.into()
    }
}

impl From<ClientOptionsBuilder> for ClientOptions {
    fn from(value: ClientOptionsBuilder) -> Self {
        let mut address = match value.site.contains("://") {
            true => value.site,
            false => format!("https://api.{}", value.site),
        };
        if !address.ends_with('/') {
            address.push('/');
        }
        ClientOptions {
            address,
            api_key: value.api_key,
            app_key: value.app_key,
            timeout: value.timeout,
            timeout_connect: value.timeout_connect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientOptions;

    #[test]
    fn site_expands_to_api_address() {
        let options = ClientOptions::site("datadoghq.com").client();
        assert_eq!(options.address, "https://api.datadoghq.com/");
    }

    #[test]
    fn full_url_is_used_as_is() {
        let options = ClientOptions::site("http://localhost:8080").client();
        assert_eq!(options.address, "http://localhost:8080/");
    }

    #[test]
    fn credentials_are_carried() {
        let options = ClientOptions::site("datadoghq.eu")
            .api_key("api")
            .app_key("app")
            .client();
        assert_eq!(options.api_key, "api");
        assert_eq!(options.app_key, "app");
    }
}
