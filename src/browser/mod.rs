use anyhow::{bail, Context, Result};

use crate::prospect::types::present;
use crate::prospect::Prospect;

/// Browser-ready URL for a prospect's website, adding a scheme when missing
pub fn website_url(prospect: &Prospect) -> Option<String> {
    let site = present(&prospect.website)?.trim();
    if site.is_empty() {
        return None;
    }
    if site.starts_with("http://") || site.starts_with("https://") {
        Some(site.to_string())
    } else {
        Some(format!("https://{}", site))
    }
}

/// Open a prospect's website in the user's default browser
///
/// # Errors
/// Returns error if the prospect has no website or the browser cannot be opened
pub fn open_website(prospect: &Prospect) -> Result<String> {
    let Some(url) = website_url(prospect) else {
        bail!("{} has no website", prospect.display_name());
    };
    webbrowser::open(&url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(url)
}
