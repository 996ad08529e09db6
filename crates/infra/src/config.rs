use statement_mailer_domain::{ScheduleSettings, Weekday};
use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};
use url::Url;

const DEFAULT_PORT: usize = 5000;
const DEFAULT_BACKEND_API_URL: &str = "http://localhost:8080/api/";

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the status api to run on
    pub port: usize,
    /// Schedule for the weekly and monthly customer statement emails
    pub statement_emails: ScheduleSettings,
    /// Base url of the shop inventory backend api. Always ends with a `/`
    /// so that relative paths can be joined onto it.
    pub backend_api_url: Url,
    /// Sent as `X-Api-Key` on every backend request when present
    pub backend_api_key: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ScheduleSettings::default();
        let statement_emails = ScheduleSettings {
            enabled: parse_var(
                &lookup,
                "STATEMENT_EMAILS_ENABLED",
                parse_bool,
                defaults.enabled,
            ),
            weekly_day_of_week: parse_var(
                &lookup,
                "STATEMENT_EMAILS_WEEKLY_DAY_OF_WEEK",
                |v| v.parse::<Weekday>().ok(),
                defaults.weekly_day_of_week,
            ),
            weekly_send_hour_utc: parse_var(
                &lookup,
                "STATEMENT_EMAILS_WEEKLY_SEND_HOUR_UTC",
                parse_from_str,
                defaults.weekly_send_hour_utc,
            ),
            monthly_day_of_month: parse_var(
                &lookup,
                "STATEMENT_EMAILS_MONTHLY_DAY_OF_MONTH",
                parse_from_str,
                defaults.monthly_day_of_month,
            ),
            monthly_send_hour_utc: parse_var(
                &lookup,
                "STATEMENT_EMAILS_MONTHLY_SEND_HOUR_UTC",
                parse_from_str,
                defaults.monthly_send_hour_utc,
            ),
            include_closed_invoices: parse_var(
                &lookup,
                "STATEMENT_EMAILS_INCLUDE_CLOSED_INVOICES",
                parse_bool,
                defaults.include_closed_invoices,
            ),
        };
        if !statement_emails.enabled {
            info!("Statement emails are disabled. Set STATEMENT_EMAILS_ENABLED=true to enable them.");
        }

        let port = parse_var(&lookup, "PORT", parse_from_str, DEFAULT_PORT);

        let backend_api_url = parse_var(&lookup, "BACKEND_API_URL", parse_base_url, default_url());
        let backend_api_key = lookup("BACKEND_API_KEY").filter(|key| !key.trim().is_empty());

        Self {
            port,
            statement_emails,
            backend_api_url,
            backend_api_key,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<F, T, P>(lookup: &F, name: &str, parse: P, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
    T: Display,
{
    let raw = match lookup(name) {
        Some(raw) => raw,
        None => return default,
    };
    match parse(raw.trim()) {
        Some(value) => value,
        None => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, raw, default
            );
            default
        }
    }
}

fn parse_from_str<T: FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_base_url(value: &str) -> Option<Url> {
    let mut url = Url::parse(value).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}

fn default_url() -> Url {
    // The constant is a valid absolute url
    Url::parse(DEFAULT_BACKEND_API_URL).expect("Default backend api url to be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn it_uses_defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.statement_emails, ScheduleSettings::default());
        assert!(!config.statement_emails.enabled);
        assert_eq!(config.statement_emails.weekly_day_of_week, Weekday::Mon);
        assert_eq!(config.statement_emails.weekly_send_hour_utc, 6);
        assert_eq!(config.statement_emails.monthly_day_of_month, 1);
        assert_eq!(config.statement_emails.monthly_send_hour_utc, 6);
        assert!(config.statement_emails.include_closed_invoices);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.backend_api_url.as_str(), DEFAULT_BACKEND_API_URL);
        assert!(config.backend_api_key.is_none());
    }

    #[test]
    fn it_reads_statement_email_settings() {
        let config = config_from(&[
            ("STATEMENT_EMAILS_ENABLED", "TRUE"),
            ("STATEMENT_EMAILS_WEEKLY_DAY_OF_WEEK", "friday"),
            ("STATEMENT_EMAILS_WEEKLY_SEND_HOUR_UTC", "17"),
            ("STATEMENT_EMAILS_MONTHLY_DAY_OF_MONTH", "31"),
            ("STATEMENT_EMAILS_MONTHLY_SEND_HOUR_UTC", " 3 "),
            ("STATEMENT_EMAILS_INCLUDE_CLOSED_INVOICES", "no"),
            ("PORT", "8088"),
            ("BACKEND_API_URL", "https://shop.example.com/api"),
            ("BACKEND_API_KEY", "secret"),
        ]);
        let settings = config.statement_emails;
        assert!(settings.enabled);
        assert_eq!(settings.weekly_day_of_week, Weekday::Fri);
        assert_eq!(settings.weekly_send_hour_utc, 17);
        assert_eq!(settings.monthly_day_of_month, 31);
        assert_eq!(settings.monthly_send_hour_utc, 3);
        assert!(!settings.include_closed_invoices);
        assert_eq!(config.port, 8088);
        assert_eq!(
            config.backend_api_url.as_str(),
            "https://shop.example.com/api/"
        );
        assert_eq!(config.backend_api_key, Some("secret".to_string()));
    }

    #[test]
    fn it_falls_back_to_defaults_on_invalid_values() {
        let config = config_from(&[
            ("STATEMENT_EMAILS_ENABLED", "maybe"),
            ("STATEMENT_EMAILS_WEEKLY_DAY_OF_WEEK", "someday"),
            ("STATEMENT_EMAILS_WEEKLY_SEND_HOUR_UTC", "six"),
            ("PORT", "-1"),
            ("BACKEND_API_URL", "not a url"),
            ("BACKEND_API_KEY", "  "),
        ]);
        assert_eq!(config.statement_emails, ScheduleSettings::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.backend_api_url.as_str(), DEFAULT_BACKEND_API_URL);
        assert!(config.backend_api_key.is_none());
    }

    #[test]
    fn it_keeps_out_of_range_numbers_for_the_schedule_to_clamp() {
        let config = config_from(&[
            ("STATEMENT_EMAILS_WEEKLY_SEND_HOUR_UTC", "42"),
            ("STATEMENT_EMAILS_MONTHLY_DAY_OF_MONTH", "0"),
        ]);
        assert_eq!(config.statement_emails.weekly_send_hour_utc, 42);
        assert_eq!(config.statement_emails.monthly_day_of_month, 0);
    }
}
