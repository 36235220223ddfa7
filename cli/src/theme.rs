//! Optional TOML theme files for non-classic game skins.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use sweepbot_core::{CellGeometry, Palette};

/// Colors and cell layout of the game surface being played.
///
/// Every field defaults to the classic theme, so a file only has to state
/// what differs.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub palette: Palette,
    pub geometry: CellGeometry,
}

impl Theme {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading theme file {}", path.display()))?;
        let theme: Self =
            toml::from_str(&text).with_context(|| format!("parsing theme file {}", path.display()))?;
        theme
            .geometry
            .validate()
            .context("theme declares an unusable cell geometry")?;
        Ok(theme)
    }
}
