use std::ffi::OsString;

pub use clap::Parser;

use crate::config;
use crate::login::events::DeliveryChannel;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// OTP service base URL
    /// Optional. Falls back to OTPLINE_SERVER_URL, then http://localhost:8000.
    #[clap(short = 's', long, help = "OTP service base URL")]
    server: Option<String>,

    /// Mobile number to prefill in the login form
    #[clap(short = 'n', long, help = "mobile number to prefill")]
    number: Option<String>,

    /// Delivery channel selected at start
    #[clap(
        short = 'c',
        long,
        default_value = "sms",
        help = "delivery channel (sms or whatsapp)"
    )]
    channel: DeliveryChannel,

    /// Skip the simulated progress display
    #[clap(long, help = "skip the simulated progress display")]
    no_progress: bool,

    /// Use the built-in service instead of a server
    #[clap(long, help = "run against a built-in service accepting code 123456")]
    offline: bool,

    /// Log level
    /// Optional. Enables logging to the log file. Falls back to OTPLINE_LOG_LEVEL.
    #[clap(long, help = "log level filter, e.g. debug or otpline=trace")]
    log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    server: Option<String>,
    number: Option<String>,
    channel: DeliveryChannel,
    no_progress: bool,
    offline: bool,
    log_level: Option<String>,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            server: args.server,
            number: args.number,
            channel: args.channel,
            no_progress: args.no_progress,
            offline: args.offline,
            log_level: args.log_level,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    /// Server URL from the flag, the environment, or the default
    pub fn server_url(&self) -> String {
        self.server.clone().unwrap_or_else(config::get_server_url)
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn channel(&self) -> DeliveryChannel {
        self.channel
    }

    pub fn no_progress(&self) -> bool {
        self.no_progress
    }

    pub fn offline(&self) -> bool {
        self.offline
    }

    /// Log level from the flag or the environment; None leaves logging off
    pub fn log_level(&self) -> Option<String> {
        self.log_level.clone().or_else(config::get_log_level)
    }
}
