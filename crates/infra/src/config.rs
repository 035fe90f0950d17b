use chrono_tz::{Tz, UTC};
use notifier_utils::create_random_secret;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_PORT: usize = 5100;
const DEFAULT_TICK_SECONDS: u64 = 60;
const DEFAULT_TOKEN_ISSUER: &str = "daheim_token_issuer";
const DEFAULT_TOKEN_AUDIENCE: &str = "gschmarri";
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;
const DEFAULT_MAIL_SUBJECT: &str = "Benachrichtigung";

#[derive(Debug, Clone, PartialEq)]
pub struct LocalSenderConfig {
    pub url: String,
    pub token: String,
}

/// Signed tokens accepted next to the api key
#[derive(Debug, Clone, PartialEq)]
pub struct TokenConfig {
    /// Hmac secret, or the PEM encoded public key when `use_ecdsa` is set
    pub verification_secret: String,
    pub use_ecdsa: bool,
    pub issuer: String,
    pub audience: String,
    /// Maximum age of a token, measured from its `iat` claim
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub sender_address: String,
    pub password: String,
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Time zone in which the clients think. Anniversaries, weekdays and
    /// the fixed warning hours are all determined in this zone
    pub client_tz: Tz,
    /// Interval between two warner ticks
    pub tick_interval: Duration,
    /// Shared secret every request has to present in the `X-Token` header
    pub api_key: String,
    pub ifttt_api_key: Option<String>,
    pub local_sender: Option<LocalSenderConfig>,
    /// Base64 encoded json array of recipients merged into the address book at start
    pub address_book_seed: Option<String>,
    /// Sqlite file holding reminders, notifications and recipients. Everything
    /// lives in memory only when unset
    pub db_path: Option<PathBuf>,
    pub token: Option<TokenConfig>,
    pub mail: Option<MailConfig>,
}

impl Config {
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let api_key = match lookup("NOTIFIER_API_KEY") {
            Some(key) if !key.is_empty() => key,
            _ => {
                info!("Did not find NOTIFIER_API_KEY environment variable. Going to create one.");
                let key = create_random_secret(32);
                info!("Api key was generated and set to: {}", key);
                key
            }
        };

        let port = match lookup("PORT") {
            Some(port) => match port.parse::<usize>() {
                Ok(port) => port,
                Err(_) => {
                    warn!(
                        "The given PORT: {} is not valid, falling back to the default port: {}.",
                        port, DEFAULT_PORT
                    );
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };

        let client_tz = match lookup("MN_CLIENT_TZ") {
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given MN_CLIENT_TZ: {} is not a known time zone, falling back to UTC.",
                        name
                    );
                    UTC
                }
            },
            None => {
                warn!("Did not find MN_CLIENT_TZ environment variable, using UTC as client time zone.");
                UTC
            }
        };

        let tick_seconds = match lookup("MN_TICK_SECONDS") {
            Some(secs) => match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(
                        "The given MN_TICK_SECONDS: {} is not valid, falling back to {} seconds.",
                        secs, DEFAULT_TICK_SECONDS
                    );
                    DEFAULT_TICK_SECONDS
                }
            },
            None => DEFAULT_TICK_SECONDS,
        };

        let local_sender = match (lookup("MN_LOCAL_SENDER_URL"), lookup("MN_LOCAL_SENDER_TOKEN")) {
            (Some(url), Some(token)) => Some(LocalSenderConfig { url, token }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("MN_LOCAL_SENDER_URL and MN_LOCAL_SENDER_TOKEN have to be set together, local sender disabled.");
                None
            }
            (None, None) => None,
        };

        let db_path = match lookup("DB_PATH").filter(|path| !path.is_empty()) {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                warn!("Did not find DB_PATH environment variable, nothing will survive a restart.");
                None
            }
        };

        Self {
            port,
            client_tz,
            tick_interval: Duration::from_secs(tick_seconds),
            api_key,
            ifttt_api_key: lookup("IFTTT_API_KEY").filter(|key| !key.is_empty()),
            local_sender,
            address_book_seed: lookup("MN_ADDR_BOOK").filter(|seed| !seed.is_empty()),
            db_path,
            token: token_config(&lookup),
            mail: mail_config(&lookup),
        }
    }
}

fn token_config<F: Fn(&str) -> Option<String>>(lookup: &F) -> Option<TokenConfig> {
    let verification_secret = lookup("MN_NOTIFIER_VERIFICATION_SECRET").filter(|s| !s.is_empty())?;

    let ttl_seconds = match lookup("TOKEN_TTL") {
        Some(ttl) => match ttl.parse::<i64>() {
            Ok(ttl) if ttl > 0 => ttl,
            _ => {
                warn!(
                    "The given TOKEN_TTL: {} is not valid, falling back to {} seconds.",
                    ttl, DEFAULT_TOKEN_TTL_SECONDS
                );
                DEFAULT_TOKEN_TTL_SECONDS
            }
        },
        None => DEFAULT_TOKEN_TTL_SECONDS,
    };

    Some(TokenConfig {
        verification_secret,
        use_ecdsa: lookup("MN_NOTIFIER_USE_ECDSA").is_some(),
        issuer: lookup("EXPECTED_TOKEN_ISSUER").unwrap_or_else(|| DEFAULT_TOKEN_ISSUER.into()),
        audience: lookup("EXPECTED_TOKEN_AUDIENCE")
            .unwrap_or_else(|| DEFAULT_TOKEN_AUDIENCE.into()),
        ttl_seconds,
    })
}

fn mail_config<F: Fn(&str) -> Option<String>>(lookup: &F) -> Option<MailConfig> {
    let vars = (
        lookup("MN_MAIL_SERVER"),
        lookup("MN_MAIL_SERVER_PORT"),
        lookup("MN_MAIL_SENDER_ADDR"),
        lookup("MN_MAIL_SENDER_PW"),
    );
    match vars {
        (Some(server), Some(port), Some(sender_address), Some(password)) => {
            match port.parse::<u16>() {
                Ok(port) => Some(MailConfig {
                    server,
                    port,
                    sender_address,
                    password,
                    subject: lookup("MN_MAIL_SUBJECT")
                        .unwrap_or_else(|| DEFAULT_MAIL_SUBJECT.into()),
                }),
                Err(_) => {
                    warn!("The given MN_MAIL_SERVER_PORT: {} is not valid, mail transport disabled.", port);
                    None
                }
            }
        }
        (None, None, None, None) => None,
        _ => {
            warn!("MN_MAIL_SERVER, MN_MAIL_SERVER_PORT, MN_MAIL_SENDER_ADDR and MN_MAIL_SENDER_PW have to be set together, mail transport disabled.");
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
