//! SDAT container version sniffing.

use crate::consts::SDAT_SIGNATURES;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

const SIGNATURE_LEN: u64 = 16;

/// Version of the proprietary SDAT container, read from its trailing signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerVersion {
    /// Not an SDAT file.
    NotApplicable,
    /// An SDAT file without any known trailing signature (treated as corrupt).
    Unrecognized,
    V2_2,
    V2_4,
    /// A known-mutated revision; these files are archived separately.
    V3_3,
    V4_0,
    /// The trailing bytes could not be read.
    Error,
}
impl ContainerVersion {
    /// Sniffs the version of the file at `path` which is `size` bytes long.
    ///
    /// Only `.sdat` files are inspected; anything else is
    /// [`NotApplicable`](Self::NotApplicable).
    pub fn detect(path: impl AsRef<Path>, extension: &str, size: Option<u64>) -> Self {
        if !extension.eq_ignore_ascii_case("sdat") {
            return Self::NotApplicable;
        }
        let Some(size) = size else {
            return Self::Error;
        };
        if size < SIGNATURE_LEN {
            return Self::Unrecognized;
        }
        match read_trailer(path.as_ref()) {
            Ok(trailer) => Self::from_trailer(&trailer),
            Err(e) => {
                tracing::debug!(path = %path.as_ref().display(), error = ?e, "Unable to read SDAT trailer");
                Self::Error
            },
        }
    }

    fn from_trailer(trailer: &[u8; 16]) -> Self {
        SDAT_SIGNATURES
            .iter()
            .find(|(signature, _)| *signature == trailer)
            .map(|(_, version)| Self::from_version_str(version))
            .unwrap_or(Self::Unrecognized)
    }

    fn from_version_str(version: &str) -> Self {
        match version {
            "2.2" => Self::V2_2,
            "2.4" => Self::V2_4,
            "3.3" => Self::V3_3,
            "4.0" => Self::V4_0,
            _ => Self::Unrecognized,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplicable => "NA",
            Self::Unrecognized => "0",
            Self::V2_2 => "2.2",
            Self::V2_4 => "2.4",
            Self::V3_3 => "3.3",
            Self::V4_0 => "4.0",
            Self::Error => "ERROR",
        }
    }
}
impl Display for ContainerVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

fn read_trailer(path: &Path) -> Result<[u8; 16]> {
    let mut file = File::open(path).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
    file.seek(SeekFrom::End(-(SIGNATURE_LEN as i64))).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
    let mut trailer = [0; 16];
    file.read_exact(&mut trailer).or_raise(|| ErrorKind::Unreadable(path.to_path_buf()))?;
    Ok(trailer)
}
