//! Manifest license labels → Flickr license ids.

/// Flickr's numeric license ids. Only the ones the manifest can select are
/// listed; anything unrecognised falls back to `AllRightsReserved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LicenseCode {
    AllRightsReserved = 0,
    NoKnownCopyrightRestrictions = 10,
}

impl LicenseCode {
    pub fn id(self) -> u8 {
        self as u8
    }
}

const NO_KNOWN_COPYRIGHT: &str = "no-known-copyright";

/// Resolve a free-text license label. Total over all inputs.
pub fn resolve(label: &str) -> LicenseCode {
    if label.trim().eq_ignore_ascii_case(NO_KNOWN_COPYRIGHT) {
        LicenseCode::NoKnownCopyrightRestrictions
    } else {
        LicenseCode::AllRightsReserved
    }
}
