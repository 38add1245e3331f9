use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

const DEFAULT_LOCALE: &str = "en";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";

#[derive(Parser, Debug)]
#[command(name = "wikijs-mcpd", version, about = "Wiki.js MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "WIKI_URL")]
    wiki_url: String,

    #[arg(long, env = "WIKI_API_KEY", hide_env_values = true)]
    wiki_api_key: String,

    #[arg(long, env = "WIKI_LOCALE", default_value = DEFAULT_LOCALE)]
    locale: String,

    #[arg(
        long,
        env = "WIKI_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(
        long = "http",
        env = "WIKI_MCP_SERVE_HTTP",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    serve_http: bool,

    #[arg(long, env = "WIKI_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,
}

/// Runtime configuration loaded from CLI arguments and environment
/// variables. Both the wiki URL and the API key are mandatory; a bad value
/// aborts startup rather than failing per call.
#[derive(Clone)]
pub struct WikiMcpdConfig {
    pub wiki_url: Url,
    pub api_token: String,
    pub locale: String,
    pub request_timeout: Duration,
    pub serve_http: bool,
    pub mcp_http_addr: SocketAddr,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl WikiMcpdConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        Self::try_from(CliArgs::parse())
    }
}

impl TryFrom<CliArgs> for WikiMcpdConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let trimmed_url = args.wiki_url.trim();
        if trimmed_url.is_empty() {
            return Err(ConfigError::MissingSetting("WIKI_URL"));
        }
        let wiki_url: Url = trimmed_url.parse().map_err(|_| ConfigError::InvalidSetting {
            name: "WIKI_URL",
            value: args.wiki_url.clone(),
        })?;

        if args.wiki_api_key.trim().is_empty() {
            return Err(ConfigError::MissingSetting("WIKI_API_KEY"));
        }

        if args.locale.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "WIKI_LOCALE",
                value: args.locale,
            });
        }

        Ok(Self {
            wiki_url,
            api_token: args.wiki_api_key,
            locale: args.locale,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            serve_http: args.serve_http,
            mcp_http_addr: args.mcp_http_addr,
        })
    }
}
