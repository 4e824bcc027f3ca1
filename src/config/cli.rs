use crate::config::toml_config::TomlConfig;
use crate::core::filter_state::{
    FilterState, KEY_CITY, KEY_COUNTRY, KEY_LOCATION, KEY_PAGE, KEY_PER_PAGE, KEY_PROFESSION,
    KEY_SEARCH, KEY_SKILLS,
};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use url::form_urlencoded;

#[derive(Debug, Clone, Parser)]
#[command(name = "dev-finder")]
#[command(about = "Search the developer directory from the command line")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Search developers and print one page of results
    Search(SearchArgs),
    /// List the skills, professions and locations usable as filters
    Lookups {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show the pagination window for a page
    Window { current: u32, last: u32 },
    /// Check whether the session is authenticated
    Whoami,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    /// Free text matched against name and username
    #[arg(short, long)]
    pub query: Option<String>,

    /// Skill id, repeat for several skills
    #[arg(long = "skill")]
    pub skills: Vec<String>,

    #[arg(long)]
    pub profession: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub page: Option<u32>,

    /// One of 10, 15, 25, 50
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Start from a shared query string, e.g. "search=Ada&skills[]=3"
    #[arg(long)]
    pub query_string: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl SearchArgs {
    /// 把命令列參數轉成與網址相同格式的查詢字串；
    /// 明確指定的參數放在前面，覆蓋 `--query-string` 中的同名欄位
    pub fn to_query(&self) -> Result<String> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if let Some(query) = &self.query {
            serializer.append_pair(KEY_SEARCH, query);
        }
        for skill in &self.skills {
            serializer.append_pair(KEY_SKILLS, skill);
        }
        let optional = [
            (KEY_PROFESSION, &self.profession),
            (KEY_LOCATION, &self.location),
            (KEY_CITY, &self.city),
            (KEY_COUNTRY, &self.country),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                serializer.append_pair(key, value);
            }
        }
        if let Some(page) = self.page {
            validation::validate_positive_number("page", u64::from(page), 1)?;
            serializer.append_pair(KEY_PAGE, &page.to_string());
        }
        if let Some(per_page) = self.per_page {
            validation::validate_page_size("per_page", per_page)?;
            serializer.append_pair(KEY_PER_PAGE, &per_page.to_string());
        }

        let explicit = serializer.finish();
        let shared = self
            .query_string
            .as_deref()
            .map(|q| q.trim().trim_start_matches('?'))
            .unwrap_or("");

        Ok(match (explicit.is_empty(), shared.is_empty()) {
            (_, true) => explicit,
            (true, false) => shared.to_string(),
            (false, false) => format!("{}&{}", explicit, shared),
        })
    }

    pub fn to_filter(&self) -> Result<FilterState> {
        Ok(FilterState::from_query(&self.to_query()?))
    }
}

impl CliConfig {
    /// 載入配置檔（若有）並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_seconds = Some(timeout);
        }
        if self.verbose || self.json_logs {
            let logging = config.logging.get_or_insert_with(Default::default);
            if self.verbose {
                logging.verbose = Some(true);
            }
            if self.json_logs {
                logging.format = Some("json".to_string());
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_parse_search_command() {
        let cli = CliConfig::try_parse_from([
            "dev-finder",
            "--base-url",
            "https://devs.example.com",
            "search",
            "--query",
            "  Ada ",
            "--skill",
            "3",
            "--skill",
            "7",
            "--per-page",
            "50",
            "--format",
            "json",
        ])
        .unwrap();

        let Command::Search(args) = &cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.format, OutputFormat::Json);

        let filter = args.to_filter().unwrap();
        assert_eq!(filter.free_text(), "Ada");
        assert_eq!(filter.skill_ids().len(), 2);
        assert_eq!(filter.page_size().get(), 50);

        let config = cli.resolve().unwrap();
        assert_eq!(config.api_base_url(), "https://devs.example.com");
    }

    #[test]
    fn test_default_search_args_match_cli_defaults() {
        let args = SearchArgs::default();
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.to_query().unwrap(), "");

        let cli = CliConfig::try_parse_from(["dev-finder", "search"]).unwrap();
        let Command::Search(parsed) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(parsed.format, args.format);
        assert_eq!(parsed.to_query().unwrap(), "");
    }

    #[test]
    fn test_explicit_flags_override_shared_query() {
        let args = SearchArgs {
            city: Some("Vienna".to_string()),
            query_string: Some("?city=Graz&search=rust&page=2".to_string()),
            ..Default::default()
        };

        let filter = args.to_filter().unwrap();
        assert_eq!(filter.city(), Some("Vienna"));
        assert_eq!(filter.free_text(), "rust");
        assert_eq!(filter.page(), 2);
    }

    #[test]
    fn test_invalid_per_page_is_rejected() {
        let args = SearchArgs {
            per_page: Some(20),
            ..Default::default()
        };
        assert!(args.to_query().is_err());

        let args = SearchArgs {
            page: Some(0),
            ..Default::default()
        };
        assert!(args.to_query().is_err());
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let cli = CliConfig::try_parse_from(["dev-finder", "--timeout", "5", "--json-logs", "whoami"]).unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.request_timeout(), Some(std::time::Duration::from_secs(5)));
        assert_eq!(config.log_format(), "json");
        assert_eq!(config.api_base_url(), crate::config::toml_config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_resolve_rejects_bad_base_url() {
        let cli = CliConfig::try_parse_from(["dev-finder", "--base-url", "ftp://x", "lookups"]).unwrap();
        assert!(cli.resolve().is_err());
    }
}
