use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::form_urlencoded;

/// Term shown to users who select the previous-works listing without one
pub const SUGGESTED_TERM: &str = "2024-1";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteProfile,
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Immutable description of the catalog being harvested
///
/// Both extractors take this by reference so crawls against different
/// mirrors or fixtures never share module-level state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteProfile {
    /// Scheme and host, no trailing slash
    pub base_url: String,

    /// Path of the current-works listing, relative to `base_url`
    pub listing_path: String,

    /// Path of the archived (per-term) listing, relative to `base_url`
    pub archive_listing_path: String,

    /// Substrings that mark an href as a project detail link
    pub detail_markers: Vec<String>,

    /// Substring that marks an href as a UI hook rather than a link
    pub script_marker: String,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            base_url: "https://softcon.ajou.ac.kr".to_string(),
            listing_path: "works/works_list.asp".to_string(),
            archive_listing_path: "works/works_list_prev.asp".to_string(),
            detail_markers: vec![
                "works.asp?uid=".to_string(),
                "works_prev.asp?uid=".to_string(),
            ],
            script_marker: "javascript:".to_string(),
        }
    }
}

impl SiteProfile {
    /// Creates a profile with default markers for the given base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Base URL without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns true if the href points at a project detail page
    pub fn is_detail_href(&self, href: &str) -> bool {
        self.detail_markers.iter().any(|m| href.contains(m.as_str()))
            && !href.contains(self.script_marker.as_str())
    }
}

/// Which listing surface to discover projects from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingMode {
    /// Exhibits of the running term
    #[default]
    Current,
    /// Archived exhibits of a past term (requires a term)
    Previous,
}

impl FromStr for ListingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" | "1" => Ok(Self::Current),
            "previous" | "prev" | "2" => Ok(Self::Previous),
            other => Err(ConfigError::Validation(format!(
                "mode must be 'current' or 'previous', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ListingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Previous => write!(f, "previous"),
        }
    }
}

/// Exhibit category code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Software
    #[default]
    S,
    /// Digital media
    D,
    /// Cyber security
    C,
    /// AI convergence
    I,
}

impl Category {
    /// The single-letter code used in listing URLs
    pub fn code(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::D => "D",
            Self::C => "C",
            Self::I => "I",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::S => "Software",
            Self::D => "Digital media",
            Self::C => "Cyber security",
            Self::I => "AI convergence",
        }
    }
}

impl FromStr for Category {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::S),
            "D" => Ok(Self::D),
            "C" => Ok(Self::C),
            "I" => Ok(Self::I),
            _ => Err(ConfigError::UnknownCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    pub mode: ListingMode,

    pub category: Category,

    /// Academic term such as "2024-1"; required for [`ListingMode::Previous`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,

    /// Maximum number of detail pages fetched per run
    pub max_items: usize,

    /// Minimum time between two detail requests on one worker lane (milliseconds)
    pub pacing_ms: u64,

    /// Number of concurrent worker lanes
    pub workers: usize,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            mode: ListingMode::Current,
            category: Category::S,
            term: None,
            max_items: 50,
            pacing_ms: 1000,
            workers: 1,
            request_timeout_secs: 10,
        }
    }
}

impl CrawlConfig {
    /// Builds the listing URL for the configured mode, category and term
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTerm`] when the previous-works listing is
    /// selected without a term.
    ///
    /// # Example
    ///
    /// ```
    /// use softcon_harvest::config::{Category, CrawlConfig, ListingMode, SiteProfile};
    ///
    /// let crawl = CrawlConfig {
    ///     mode: ListingMode::Previous,
    ///     category: Category::D,
    ///     term: Some("2023-2".to_string()),
    ///     ..CrawlConfig::default()
    /// };
    /// let url = crawl.listing_url(&SiteProfile::default()).unwrap();
    /// assert_eq!(
    ///     url,
    ///     "https://softcon.ajou.ac.kr/works/works_list_prev.asp?category=D&wTerm=2023-2"
    /// );
    /// ```
    pub fn listing_url(&self, site: &SiteProfile) -> Result<String, ConfigError> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("category", self.category.code());

        let path = match self.mode {
            ListingMode::Current => &site.listing_path,
            ListingMode::Previous => {
                let term = self
                    .term
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or(ConfigError::MissingTerm {
                        suggestion: SUGGESTED_TERM,
                    })?;
                query.append_pair("wTerm", term);
                &site.archive_listing_path
            }
        };

        Ok(format!(
            "{}/{}?{}",
            site.base(),
            path.trim_start_matches('/'),
            query.finish()
        ))
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// Sent as the `Accept-Language` header
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "softcon-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            accept_language: "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory all output files are written to
    pub directory: String,

    /// File name of the discovered references collection
    pub links_file: String,

    /// File name of the project details collection
    pub details_file: String,

    /// File name of the markdown run summary
    pub summary_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "softcon_data".to_string(),
            links_file: "project_links.json".to_string(),
            details_file: "project_details.json".to_string(),
            summary_file: "crawl_summary.md".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn links_path(&self) -> PathBuf {
        Path::new(&self.directory).join(&self.links_file)
    }

    pub fn details_path(&self) -> PathBuf {
        Path::new(&self.directory).join(&self.details_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        Path::new(&self.directory).join(&self.summary_file)
    }
}
