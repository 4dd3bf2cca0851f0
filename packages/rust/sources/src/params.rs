//! Request parameters shared by every source adapter, and their validation.

use regex::Regex;

use itemsetcopier_shared::{ChampionRef, ItemSetError, Result, validate_title};

/// What the caller supplied alongside the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceParams {
    /// Title of the generated item set.
    pub title: String,
    /// Address the document was retrieved from.
    pub url: Option<String>,
    /// Explicit champion; wins over anything found in the document or URL.
    pub champion: Option<ChampionRef>,
    /// Lane/role, for sites that organize builds by role.
    pub role: Option<String>,
    /// Which build of a multi-build guide to use.
    pub build_index: Option<i64>,
    /// Which named build to use.
    pub build_name: Option<String>,
}

impl SourceParams {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_champion(mut self, champion: ChampionRef) -> Self {
        self.champion = Some(champion);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_build_index(mut self, index: i64) -> Self {
        self.build_index = Some(index);
        self
    }

    pub fn with_build_name(mut self, name: impl Into<String>) -> Self {
        self.build_name = Some(name.into());
        self
    }

    /// The requested build index, clamped to `0` when missing, negative, or
    /// not below `available`.
    pub fn build_index_within(&self, available: usize) -> usize {
        self.build_index
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| *index < available)
            .unwrap_or(0)
    }
}

/// Checks common to all adapters.
///
/// The title must be 1 to 75 characters, a URL (when given) must match
/// `url_pattern`, and a role (when given) must be one of `roles`, compared
/// case-insensitively. An empty `roles` list accepts no role constraint.
pub fn validate_params(params: &SourceParams, url_pattern: &Regex, roles: &[&str]) -> Result<()> {
    validate_title(&params.title)?;

    if let Some(url) = &params.url {
        if !url_pattern.is_match(url.trim()) {
            return Err(ItemSetError::invalid_input(format!(
                "URL does not match the expected build page address: <{url}>"
            )));
        }
    }

    if let Some(role) = &params.role {
        if !roles.is_empty() && !roles.iter().any(|r| r.eq_ignore_ascii_case(role.trim())) {
            return Err(ItemSetError::invalid_input(format!(
                "unknown role <{role}>, expected one of: {}",
                roles.join(", ")
            )));
        }
    }

    Ok(())
}

/// Pick the champion for a build: the explicit parameter first, then the name
/// the adapter found in the document or URL.
pub fn pick_champion(params: &SourceParams, found: Option<String>) -> Result<ChampionRef> {
    if let Some(champion) = &params.champion {
        return Ok(champion.clone());
    }

    match found.map(|name| name.trim().to_string()) {
        Some(name) if !name.is_empty() => Ok(ChampionRef::Name(name)),
        _ => Err(ItemSetError::invalid_input(
            "no champion given and none found in the document or URL",
        )),
    }
}

/// Named capture `group` of `pattern` in the request URL, if any.
pub(crate) fn url_capture(params: &SourceParams, pattern: &Regex, group: &str) -> Option<String> {
    let url = params.url.as_deref()?;
    pattern
        .captures(url.trim())
        .and_then(|caps| caps.name(group))
        .map(|m| m.as_str().to_string())
}
