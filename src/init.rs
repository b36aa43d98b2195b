//! Initialisation logic for dogsync processes.
use anyhow::Result;
use slog::Drain;
use slog::Logger;

use datadog_client::Client;
use datadog_client_http::ClientOptions;
use datadog_client_http::HttpClient;
use dogsync_conf::Conf;
use dogsync_conf::LogLevel;
use dogsync_conf::LogMode;
use dogsync_connector::Connector;
use dogsync_context::Context;

/// Root logger for the process, built from the logging configuration.
pub fn logger(conf: &Conf) -> Logger {
    let level = match conf.log.level {
        LogLevel::Debug => slog::Level::Debug,
        LogLevel::Info => slog::Level::Info,
        LogLevel::Warning => slog::Level::Warning,
        LogLevel::Error => slog::Level::Error,
    };
    match conf.log.mode {
        LogMode::Json => {
            let drain = slog_json::Json::default(std::io::stderr()).fuse();
            let drain = drain.filter_level(level).fuse();
            let drain = slog_async::Async::new(drain).build().fuse();
            Logger::root(drain, slog::o!())
        }
        LogMode::Term => {
            let decorator = slog_term::TermDecorator::new().stderr().build();
            let drain = slog_term::FullFormat::new(decorator).build().fuse();
            let drain = drain.filter_level(level).fuse();
            let drain = slog_async::Async::new(drain).build().fuse();
            Logger::root(drain, slog::o!())
        }
    }
}

/// Root context for the process.
pub fn context(conf: &Conf) -> Context {
    Context::root(logger(conf)).build()
}

/// Connector instance backed by an HTTP API client.
pub fn connector(conf: &Conf) -> Result<Connector> {
    let options = ClientOptions::site(&conf.site)
        .api_key(&conf.api_key)
        .app_key(&conf.app_key)
        .client();
    let client = HttpClient::with(options)?;
    Ok(Connector::new(Client::from(client)))
}
