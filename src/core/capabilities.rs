//! Parsing capabilities compiled into this build.
//!
//! Logo decoding and metadata parsing are optional cargo features
//! (`png`, `yaml`). The set is probed once at startup and handed to the
//! orchestrator, which reports every file it cannot inspect instead of
//! skipping it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseCapability {
    ImageDecoding,
    Yaml,
}

impl ParseCapability {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseCapability::ImageDecoding => "image_decoding",
            ParseCapability::Yaml => "yaml",
        }
    }

    /// Per-entry message used when this capability is absent.
    pub fn missing_message(self) -> &'static str {
        match self {
            ParseCapability::ImageDecoding => {
                "image decoding support not available; cannot validate logo.png"
            }
            ParseCapability::Yaml => {
                "YAML support not available; cannot validate metadata.yaml contents"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub image_decoding: bool,
    pub yaml: bool,
}

impl Capabilities {
    /// What this binary was built with.
    pub fn detect() -> Self {
        Self {
            image_decoding: cfg!(feature = "png"),
            yaml: cfg!(feature = "yaml"),
        }
    }

    pub fn none() -> Self {
        Self {
            image_decoding: false,
            yaml: false,
        }
    }

    pub fn has(&self, capability: ParseCapability) -> bool {
        match capability {
            ParseCapability::ImageDecoding => self.image_decoding,
            ParseCapability::Yaml => self.yaml,
        }
    }

    pub fn missing(&self) -> Vec<ParseCapability> {
        [ParseCapability::ImageDecoding, ParseCapability::Yaml]
            .into_iter()
            .filter(|c| !self.has(*c))
            .collect()
    }
}
