use super::Scene;
use crate::expect::ensure;
use crate::{AssertionFailure, HarnessError, Verdict};
use boardcheck_contract::BrowserContext;
use tracing::debug;

/// Root tokens a themed page defines at least one of.
pub const STYLE_TOKENS: [&str; 3] = ["--color-bg", "--color-surface", "--color-accent"];

/// Returns true if the first family in a font stack is a browser default serif.
pub fn is_default_serif(font_family: &str) -> bool {
    let first = font_family
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_ascii_lowercase();
    matches!(first.as_str(), "" | "serif" | "times" | "times new roman")
}

pub(super) async fn style_tokens_defined<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.page().await?;
    let mut missing = Vec::new();
    for token in STYLE_TOKENS {
        let value = page.style_token(token).await?;
        if value.as_deref().is_some_and(|v| !v.trim().is_empty()) {
            debug!(token, "Root styling token defined");
            return Ok(Verdict::Passed);
        }
        missing.push(token);
    }
    Err(AssertionFailure::new(format!(
        "no root styling token is defined: {}",
        missing.join(", ")
    ))
    .into())
}

pub(super) async fn body_typeface_set<C: BrowserContext>(
    scene: &Scene<'_, C>,
) -> Result<Verdict, HarnessError> {
    let page = scene.page().await?;
    let family = page.body_font_family().await?;
    ensure(!is_default_serif(&family), || {
        format!("body typeface is the default serif: {:?}", family)
    })?;
    Ok(Verdict::Passed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_serif_detection() {
        assert!(is_default_serif("serif"));
        assert!(is_default_serif("\"Times New Roman\", serif"));
        assert!(is_default_serif(""));
        assert!(!is_default_serif("\"Inter\", system-ui, sans-serif"));
        assert!(!is_default_serif("Georgia, serif"));
    }
}
