use serde::{Deserialize, Serialize};

/// How display points are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// One color for every record.
    #[default]
    Default,
    /// One color per family.
    Family,
    /// One color per genus.
    Genus,
}

/// How the renderer draws the visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Points,
    /// Hexagon-binned density.
    Hex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_serde() {
        assert_eq!(serde_json::to_string(&ColorMode::Genus).unwrap(), "\"genus\"");
        let mode: DisplayMode = serde_json::from_str("\"hex\"").unwrap();
        assert_eq!(mode, DisplayMode::Hex);
        assert_eq!(ColorMode::default(), ColorMode::Default);
    }
}
