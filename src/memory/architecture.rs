// Mon Jan 19 2026 - Alex

use crate::memory::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86,
    X64,
    Arm32,
    Arm64,
}

impl Architecture {
    pub fn pointer_size(self) -> u64 {
        match self {
            Self::X86 | Self::Arm32 => 4,
            Self::X64 | Self::Arm64 => 8,
        }
    }

    pub fn is_64bit(self) -> bool {
        self.pointer_size() == 8
    }
}

impl FromStr for Architecture {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" => Ok(Self::X86),
            "x64" | "amd64" | "x86_64" => Ok(Self::X64),
            "arm" | "arm32" => Ok(Self::Arm32),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            other => Err(MemoryError::UnknownArchitecture(other.to_string())),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86 => write!(f, "x86"),
            Self::X64 => write!(f, "x64"),
            Self::Arm32 => write!(f, "arm32"),
            Self::Arm64 => write!(f, "arm64"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("AMD64".parse::<Architecture>().unwrap(), Architecture::X64);
        assert_eq!("arm".parse::<Architecture>().unwrap(), Architecture::Arm32);
        assert_eq!("aarch64".parse::<Architecture>().unwrap(), Architecture::Arm64);
    }

    #[test]
    fn test_unknown_architecture() {
        let err = "mips".parse::<Architecture>().unwrap_err();
        assert!(matches!(err, MemoryError::UnknownArchitecture(ref s) if s == "mips"));
    }

    #[test]
    fn test_pointer_sizes() {
        assert_eq!(Architecture::X86.pointer_size(), 4);
        assert_eq!(Architecture::Arm32.pointer_size(), 4);
        assert_eq!(Architecture::X64.pointer_size(), 8);
        assert!(Architecture::Arm64.is_64bit());
    }
}
