// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document version numbers and the versions where defaults changed.

use std::fmt;
use std::str::FromStr;

/// A `major.minor[.patch]` document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl DocumentVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Faces carry topology tags from this version on.
    pub const TAGS: DocumentVersion = DocumentVersion::new(1, 3, 0);
    /// Face groups carry a connect mode from this version on.
    pub const CONNECT_MODE: DocumentVersion = DocumentVersion::new(1, 5, 0);
    /// Face group ids are joined with `;` from this version on.
    pub const SEMICOLON_IDS: DocumentVersion = DocumentVersion::new(2, 0, 0);
    /// Version written by this release.
    pub const CURRENT: DocumentVersion = DocumentVersion::new(2, 1, 0);
}

/// Error returned when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError;

impl FromStr for DocumentVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> std::result::Result<u32, ParseVersionError> {
            match parts.next() {
                Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => {
                    p.parse().map_err(|_| ParseVersionError)
                }
                None if !required => Ok(0),
                _ => Err(ParseVersionError),
            }
        };
        let major = next(true)?;
        let minor = next(true)?;
        let patch = next(false)?;
        if parts.next().is_some() {
            return Err(ParseVersionError);
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planscape_topology::DOCUMENT_VERSION;

    #[test]
    fn current_matches_topology_writer() {
        assert_eq!(
            DOCUMENT_VERSION.parse::<DocumentVersion>(),
            Ok(DocumentVersion::CURRENT)
        );
        assert_eq!(DocumentVersion::CURRENT.to_string(), DOCUMENT_VERSION);
    }

    #[test]
    fn parses_two_and_three_parts() {
        assert_eq!("1.4".parse::<DocumentVersion>(), Ok(DocumentVersion::new(1, 4, 0)));
        assert_eq!(" 2.0.7 ".parse::<DocumentVersion>(), Ok(DocumentVersion::new(2, 0, 7)));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "2", "2.", "a.b", "1.2.3.4", "-1.0", "1.+2"] {
            assert_eq!(bad.parse::<DocumentVersion>(), Err(ParseVersionError), "{bad}");
        }
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(DocumentVersion::new(1, 10, 0) > DocumentVersion::new(1, 9, 0));
        assert!(DocumentVersion::TAGS < DocumentVersion::CONNECT_MODE);
        assert!(DocumentVersion::SEMICOLON_IDS < DocumentVersion::CURRENT);
    }
}
