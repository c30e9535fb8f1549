pub mod toml_config;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::{
        TomlConfig, DATABASE_URL_SCHEMES, DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT,
        DEFAULT_SITE_TITLE,
    };
    use crate::core::{ConfigProvider, StoreBackend};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::parser::ValueSource;
    use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
    use std::collections::HashSet;
    use std::ffi::OsString;
    use std::path::PathBuf;

    /// Options a config file may fill in when the user did not set them.
    const FILE_OVERRIDABLE: [&str; 6] = [
        "host",
        "port",
        "store",
        "database_url",
        "max_connections",
        "site_title",
    ];

    #[derive(Debug, Clone, Parser)]
    #[command(name = "bar-registry")]
    #[command(about = "CRUD service for bar venue records")]
    pub struct ServerConfig {
        #[arg(long, default_value = DEFAULT_HOST)]
        pub host: String,

        #[arg(long, default_value_t = DEFAULT_PORT)]
        pub port: u16,

        #[arg(long, value_enum, default_value = "memory")]
        pub store: StoreBackend,

        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        pub database_url: Option<String>,

        #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
        pub max_connections: u32,

        #[arg(long, default_value = DEFAULT_SITE_TITLE)]
        pub site_title: String,

        #[arg(long, help = "Optional TOML configuration file")]
        pub config: Option<PathBuf>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        /// Options given on the command line or through the environment.
        #[arg(skip)]
        explicit: HashSet<&'static str>,
    }

    impl ServerConfig {
        fn from_matches(arg_matches: &ArgMatches) -> std::result::Result<Self, clap::Error> {
            let mut config = Self::from_arg_matches(arg_matches)?;
            config.explicit = FILE_OVERRIDABLE
                .into_iter()
                .filter(|id| {
                    matches!(
                        arg_matches.value_source(id),
                        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
                    )
                })
                .collect();
            Ok(config)
        }

        /// Parses `args` the way [`load`](Self::load) parses the process arguments.
        pub fn try_parse_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
        where
            I: IntoIterator<Item = T>,
            T: Into<OsString> + Clone,
        {
            let arg_matches = Self::command().try_get_matches_from(args)?;
            Self::from_matches(&arg_matches)
        }

        fn is_explicit(&self, id: &str) -> bool {
            self.explicit.contains(id)
        }

        /// Fills every option the user did not set with the file's value.
        pub fn merge_file(mut self, file: &TomlConfig) -> Self {
            if !self.is_explicit("host") {
                self.host = file.host().to_string();
            }
            if !self.is_explicit("port") {
                self.port = file.port();
            }
            if !self.is_explicit("store") {
                if let Some(backend) = file.backend() {
                    self.store = backend;
                }
            }
            if !self.is_explicit("database_url") {
                if let Some(url) = file.database_url() {
                    self.database_url = Some(url.to_string());
                }
            }
            if !self.is_explicit("max_connections") {
                self.max_connections = file.max_connections();
            }
            if !self.is_explicit("site_title") {
                if let Some(title) = file.site_title() {
                    self.site_title = title.to_string();
                }
            }
            self.verbose |= file.verbose();
            self.json_logs |= file.json_logs();
            self
        }

        /// Parses the command line and merges the `--config` file, if any.
        ///
        /// Only the merged result is meaningful to validate, so that is left
        /// to the caller.
        pub fn load() -> Result<Self> {
            let arg_matches = Self::command().get_matches();
            let config = Self::from_matches(&arg_matches).unwrap_or_else(|e| e.exit());
            match &config.config {
                Some(path) => {
                    let file = TomlConfig::from_file(path)?;
                    Ok(config.merge_file(&file))
                }
                None => Ok(config),
            }
        }
    }

    impl ConfigProvider for ServerConfig {
        fn bind_address(&self) -> String {
            format!("{}:{}", self.host, self.port)
        }

        fn store_backend(&self) -> StoreBackend {
            self.store
        }

        fn database_url(&self) -> Option<&str> {
            self.database_url.as_deref()
        }

        fn max_connections(&self) -> u32 {
            self.max_connections
        }
    }

    impl Validate for ServerConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_non_empty_string("host", &self.host)?;
            validation::validate_range("port", self.port, 1, u16::MAX)?;
            validation::validate_positive_number("max_connections", self.max_connections, 1)?;
            validation::validate_range("max_connections", self.max_connections, 1, 100)?;

            if self.store == StoreBackend::Postgres {
                let url = validation::validate_required_field("database_url", &self.database_url)?;
                validation::validate_url("database_url", url, DATABASE_URL_SCHEMES)?;
            }

            tracing::debug!("Server configuration validation passed");
            Ok(())
        }
    }

}

#[cfg(feature = "cli")]
pub use cli::ServerConfig;
