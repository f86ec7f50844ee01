use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::source::{ipdeny, ripe_stat};
use crate::{app::cli, logging};

/// File name used under the home directory when no output is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "ips_list.dat";

#[derive(PartialEq, Debug, Serialize, Deserialize)]
pub struct Config {
    /// The two-letter code of the country whose address space is fetched.
    pub country: String,

    /// Where the blocklist file is written.
    pub output: PathBuf,

    /// Base URL of the RIPEstat API.
    pub ripe_stat_base_url: String,

    /// Base URL of the ipdeny zone file mirror.
    pub ipdeny_base_url: String,

    /// The log level to filter logging to.
    pub log_level: logging::Level,

    /// The log format to output.
    pub log_format: logging::LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: "IL".to_owned(),
            output: dirs::home_dir().unwrap_or_default().join(DEFAULT_OUTPUT_FILE),
            ripe_stat_base_url: ripe_stat::DEFAULT_BASE_URL.to_owned(),
            ipdeny_base_url: ipdeny::DEFAULT_BASE_URL.to_owned(),
            log_level: logging::Level::Info,
            log_format: logging::LogFormat::Auto,
        }
    }
}

impl Config {
    /// Load configuration from an optional configuration file and environment
    pub fn extract(app: &cli::CliApp) -> anyhow::Result<Config> {
        let mut builder = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = &app.config {
            builder = builder.merge(Yaml::file(path));
        };

        // Override with env variables if provided
        builder = builder.merge(Env::prefixed("COUNTRY_BLOCKLIST_"));

        // Override some values from the CliApp
        if let Some(country) = &app.country {
            builder = builder.merge(Serialized::default("country", country))
        }
        if let Some(output) = &app.output {
            builder = builder.merge(Serialized::default("output", output))
        }
        if let Some(log_level) = app.log_level {
            builder = builder.merge(Serialized::default("log_level", log_level))
        }
        if let Some(log_format) = app.log_format {
            builder = builder.merge(Serialized::default("log_format", log_format))
        }

        let config: Config = builder.extract()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use similar_asserts::assert_eq;
    use std::path::PathBuf;

    use crate::{app::cli, logging};

    use super::Config;

    fn test_with_config<F>(yaml: &str, env_vars: &[(&str, &str)], test_fn: F)
    where
        F: FnOnce(Config),
    {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", yaml)?;

            for (key, value) in env_vars {
                jail.set_env(key, value);
            }

            let app = cli::CliApp {
                config: Some(PathBuf::from("config.yaml")),
                country: None,
                output: None,
                log_level: None,
                log_format: None,
                command: cli::Commands::Run,
            };

            let config = Config::extract(&app).unwrap();
            test_fn(config);
            Ok(())
        })
    }

    #[test]
    fn test_simple() {
        test_with_config(
            r#"
            country: NL
            output: /var/lib/blocklist/nl.dat
            ipdeny_base_url: http://mirror.internal
            "#,
            &[],
            |config| {
                assert_eq!(
                    config,
                    Config {
                        country: "NL".to_owned(),
                        output: PathBuf::from("/var/lib/blocklist/nl.dat"),
                        ripe_stat_base_url: "https://stat.ripe.net".to_owned(),
                        ipdeny_base_url: "http://mirror.internal".to_owned(),
                        log_level: logging::Level::Info,
                        log_format: logging::LogFormat::Auto,
                    }
                );
            },
        )
    }

    #[test]
    fn test_defaults() {
        test_with_config("{}", &[], |config| {
            assert_eq!(config, Config::default());
            assert_eq!(config.country, "IL");
            assert!(config.output.ends_with("ips_list.dat"));
        })
    }

    #[test]
    fn test_overrides() {
        test_with_config(
            r#"
            country: NL
            log_format: json
            "#,
            &[
                ("COUNTRY_BLOCKLIST_COUNTRY", "DE"),
                ("COUNTRY_BLOCKLIST_OUTPUT", "/tmp/de.dat"),
                ("COUNTRY_BLOCKLIST_RIPE_STAT_BASE_URL", "http://ripe.test"),
                ("COUNTRY_BLOCKLIST_LOG_LEVEL", "debug"),
            ],
            |config| {
                assert_eq!(
                    config,
                    Config {
                        country: "DE".to_owned(),
                        output: PathBuf::from("/tmp/de.dat"),
                        ripe_stat_base_url: "http://ripe.test".to_owned(),
                        ipdeny_base_url: "https://www.ipdeny.com".to_owned(),
                        log_level: logging::Level::Debug,
                        log_format: logging::LogFormat::Json,
                    }
                );
            },
        )
    }

    #[test]
    fn test_cli_flags_win() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "country: NL")?;
            jail.set_env("COUNTRY_BLOCKLIST_COUNTRY", "DE");

            let app = cli::CliApp {
                config: Some(PathBuf::from("config.yaml")),
                country: Some("FR".to_owned()),
                output: Some(PathBuf::from("custom.dat")),
                log_level: Some(logging::Level::Trace),
                log_format: None,
                command: cli::Commands::Run,
            };

            let config = Config::extract(&app).unwrap();
            assert_eq!(config.country, "FR");
            assert_eq!(config.output, PathBuf::from("custom.dat"));
            assert_eq!(config.log_level, logging::Level::Trace);
            Ok(())
        })
    }
}
