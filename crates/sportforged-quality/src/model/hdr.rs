//! HDR markers found in broadcast release names.

use super::ParseError;

/// HDR format advertised by a release name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HdrFormat {
    DolbyVision,
    Hdr10Plus,
    Hdr10,
    /// Bare "HDR" tag with no format named.
    Hdr,
    /// Hybrid Log-Gamma, the usual format for live sport.
    Hlg,
}

impl HdrFormat {
    pub const ALL: [HdrFormat; 5] = [
        HdrFormat::DolbyVision,
        HdrFormat::Hdr10Plus,
        HdrFormat::Hdr10,
        HdrFormat::Hdr,
        HdrFormat::Hlg,
    ];

    /// Short tag as written in release names.
    pub fn label(&self) -> &'static str {
        match self {
            HdrFormat::DolbyVision => "DV",
            HdrFormat::Hdr10Plus => "HDR10+",
            HdrFormat::Hdr10 => "HDR10",
            HdrFormat::Hdr => "HDR",
            HdrFormat::Hlg => "HLG",
        }
    }

    /// Whether the format carries per-scene metadata.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, HdrFormat::DolbyVision | HdrFormat::Hdr10Plus)
    }
}

impl std::fmt::Display for HdrFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for HdrFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '.' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "dovi" | "dolbyvision" => return Ok(HdrFormat::DolbyVision),
            "hdr10plus" => return Ok(HdrFormat::Hdr10Plus),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|format| format.label().eq_ignore_ascii_case(&compact))
            .ok_or_else(|| ParseError(format!("invalid HDR format: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for format in HdrFormat::ALL {
            assert_eq!(format.label().parse::<HdrFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_release_spellings() {
        assert_eq!("Dolby.Vision".parse::<HdrFormat>(), Ok(HdrFormat::DolbyVision));
        assert_eq!("hdr10plus".parse::<HdrFormat>(), Ok(HdrFormat::Hdr10Plus));
        assert_eq!("hlg".parse::<HdrFormat>(), Ok(HdrFormat::Hlg));
        assert!("sdr".parse::<HdrFormat>().is_err());
    }

    #[test]
    fn test_dynamic_formats() {
        assert!(HdrFormat::DolbyVision.is_dynamic());
        assert!(!HdrFormat::Hlg.is_dynamic());
    }
}
