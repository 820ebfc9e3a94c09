use std::fmt;
use std::str::FromStr;

/// Camera acquisition mode, in the order the mode selector lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionMode {
    SingleFrame,
    MultiFrame,
    Continuous,
}

impl AcquisitionMode {
    /// All modes, indexed by their selector position.
    pub const ALL: [AcquisitionMode; 3] = [Self::SingleFrame, Self::MultiFrame, Self::Continuous];

    /// Selector index of this mode.
    pub fn index(self) -> usize {
        match self {
            Self::SingleFrame => 0,
            Self::MultiFrame => 1,
            Self::Continuous => 2,
        }
    }

    /// Mode at a selector index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label as the camera (GenICam `AcquisitionMode`) spells it.
    pub fn label(self) -> &'static str {
        match self {
            Self::SingleFrame => "SingleFrame",
            Self::MultiFrame => "MultiFrame",
            Self::Continuous => "Continuous",
        }
    }

    /// Exact reverse lookup of [`label`](Self::label).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lenient parse for the CLI: case-insensitive, `-`/`_` ignored.
impl FromStr for AcquisitionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "singleframe" | "single" => Ok(Self::SingleFrame),
            "multiframe" | "multi" => Ok(Self::MultiFrame),
            "continuous" => Ok(Self::Continuous),
            _ => anyhow::bail!(
                "unknown acquisition mode '{s}' (expected SingleFrame, MultiFrame or Continuous)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_label_round_trip() {
        for i in 0..3 {
            let mode = AcquisitionMode::from_index(i).unwrap();
            let back = AcquisitionMode::from_label(mode.label()).unwrap();
            assert_eq!(back.index(), i);
        }
    }

    #[test]
    fn out_of_range_index() {
        assert_eq!(AcquisitionMode::from_index(3), None);
    }

    #[test]
    fn reverse_lookup_is_exact() {
        assert_eq!(AcquisitionMode::from_label("continuous"), None);
        assert_eq!(
            AcquisitionMode::from_label("MultiFrame"),
            Some(AcquisitionMode::MultiFrame)
        );
    }

    #[test]
    fn cli_parse_is_lenient() {
        assert_eq!(
            "single-frame".parse::<AcquisitionMode>().unwrap(),
            AcquisitionMode::SingleFrame
        );
        assert_eq!(
            "CONTINUOUS".parse::<AcquisitionMode>().unwrap(),
            AcquisitionMode::Continuous
        );
        assert!("burst".parse::<AcquisitionMode>().is_err());
    }
}
