use crate::config::types::{
    Config, CrawlConfig, ListingMode, OutputConfig, SiteProfile, UserAgentConfig, SUGGESTED_TERM,
};
use crate::ConfigError;
use url::Url;

/// Upper bound for concurrent worker lanes
pub const MAX_WORKERS: usize = 4;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_profile(&config.site)?;
    validate_crawl_config(&config.crawl)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site profile
fn validate_site_profile(site: &SiteProfile) -> Result<(), ConfigError> {
    let url = Url::parse(&site.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", site.base_url, e)))?;

    if !crate::url::has_http_scheme(&site.base_url) {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must not carry a query or fragment: '{}'",
            site.base_url
        )));
    }

    if site.listing_path.trim().is_empty() || site.archive_listing_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "listing paths cannot be empty".to_string(),
        ));
    }

    if site.detail_markers.is_empty() || site.detail_markers.iter().any(|m| m.is_empty()) {
        return Err(ConfigError::Validation(
            "detail-markers must contain at least one non-empty marker".to_string(),
        ));
    }

    if site.script_marker.is_empty() {
        return Err(ConfigError::Validation(
            "script-marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_items < 1 {
        return Err(ConfigError::Validation(format!(
            "max-items must be >= 1, got {}",
            config.max_items
        )));
    }

    if config.pacing_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "pacing-ms must be >= 100ms, got {}ms",
            config.pacing_ms
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    match (config.mode, config.term.as_deref().map(str::trim)) {
        (ListingMode::Previous, None) | (ListingMode::Previous, Some("")) => {
            return Err(ConfigError::MissingTerm {
                suggestion: SUGGESTED_TERM,
            });
        }
        (_, Some(term)) if !term.is_empty() => validate_term(term)?,
        _ => {}
    }

    Ok(())
}

/// Validates a term token such as "2024-1"
fn validate_term(term: &str) -> Result<(), ConfigError> {
    if !term.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "term must contain only letters, digits and hyphens (e.g. '{}'), got '{}'",
            SUGGESTED_TERM, term
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    for (key, name) in [
        ("links-file", &config.links_file),
        ("details-file", &config.details_file),
        ("summary-file", &config.summary_file),
    ] {
        validate_file_name(key, name)?;
    }

    if config.links_file == config.details_file {
        return Err(ConfigError::Validation(
            "links-file and details-file must differ".to_string(),
        ));
    }

    Ok(())
}

/// Output files are plain names inside the output directory
fn validate_file_name(key: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "{} must be a plain file name, got '{}'",
            key, name
        )));
    }

    Ok(())
}
