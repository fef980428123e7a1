use std::fmt;

use serde::Serialize;

use crate::tables::FXBLOCK_LEN;

/// Avatar effect encoded by the four-int fx block.
///
/// Classification is advisory: a block that matches none of the known
/// combinations is kept as `Unknown` with its raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FxPreset {
    Ordinary,
    Torch,
    Gravedigger,
    TorchGravedigger,
    Unknown([i32; FXBLOCK_LEN]),
}

impl FxPreset {
    pub const ORDINARY_RAW: [i32; FXBLOCK_LEN] = [1073741824, 2111, 2560, 5120];
    pub const TORCH_RAW: [i32; FXBLOCK_LEN] = [1288490242, 41023, 38400, 32000];
    pub const GRAVEDIGGER_RAW: [i32; FXBLOCK_LEN] = [1803886340, 61503, 30720, 15360];
    pub const TORCH_GRAVEDIGGER_RAW: [i32; FXBLOCK_LEN] = [1803886342, 61503, 38400, 32000];

    pub const KNOWN: [FxPreset; 4] = [
        FxPreset::Ordinary,
        FxPreset::Torch,
        FxPreset::Gravedigger,
        FxPreset::TorchGravedigger,
    ];

    pub fn from_raw(raw: [i32; FXBLOCK_LEN]) -> Self {
        match raw {
            Self::ORDINARY_RAW => Self::Ordinary,
            Self::TORCH_RAW => Self::Torch,
            Self::GRAVEDIGGER_RAW => Self::Gravedigger,
            Self::TORCH_GRAVEDIGGER_RAW => Self::TorchGravedigger,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> [i32; FXBLOCK_LEN] {
        match *self {
            Self::Ordinary => Self::ORDINARY_RAW,
            Self::Torch => Self::TORCH_RAW,
            Self::Gravedigger => Self::GRAVEDIGGER_RAW,
            Self::TorchGravedigger => Self::TORCH_GRAVEDIGGER_RAW,
            Self::Unknown(raw) => raw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Ordinary => "Ordinary",
            Self::Torch => "Torch",
            Self::Gravedigger => "Gravedigger's Flame",
            Self::TorchGravedigger => "Torch and Gravedigger's Flame",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Short name used on the command line.
    pub fn key(&self) -> &'static str {
        match *self {
            Self::Ordinary => "ordinary",
            Self::Torch => "torch",
            Self::Gravedigger => "gravedigger",
            Self::TorchGravedigger => "torch-gravedigger",
            Self::Unknown(_) => "unknown",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::KNOWN
            .into_iter()
            .find(|preset| preset.key().eq_ignore_ascii_case(key))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for FxPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(raw) => write!(
                f,
                "Unknown ({}, {}, {}, {})",
                raw[0], raw[1], raw[2], raw[3]
            ),
            _ => f.write_str(self.as_str()),
        }
    }
}
