//! Compilation header: target language, version and switches.

use std::fmt;

use bitflags::bitflags;

use crate::Language;

bitflags! {
    /// Compile switches given on the command line as `/NAME`.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HeaderFlags: u32 {
        /// Resolve subroutine bindings statically, one shader permutation per binding set.
        const NO_SUBROUTINES = 1 << 0;
        /// Write generated stage sources next to the compiled artifacts.
        const OUTPUT_GENERATED_SHADERS = 1 << 1;
        /// Ask the backend to optimize.
        const OPTIMIZE = 1 << 2;
    }
}

impl HeaderFlags {
    /// Flag for a switch, with or without its leading slash.
    pub fn from_switch(switch: &str) -> Option<HeaderFlags> {
        match switch.trim_start_matches('/') {
            "NOSUB" => Some(HeaderFlags::NO_SUBROUTINES),
            "OUTPUT" => Some(HeaderFlags::OUTPUT_GENERATED_SHADERS),
            "O" => Some(HeaderFlags::OPTIMIZE),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("unknown target profile `{0}`; expected one of spv10, glsl450, glsl330, hlsl5, c")]
    UnknownProfile(String),
}

/// Target and options shared by every program of one compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub language: Language,
    pub major: u32,
    pub minor: u32,
    pub flags: HeaderFlags,
}

impl Header {
    pub fn new(language: Language, major: u32, minor: u32) -> Self {
        Header {
            language,
            major,
            minor,
            flags: HeaderFlags::empty(),
        }
    }

    /// Parse a target profile such as `spv10`, `glsl450`, `hlsl5` or `c`.
    ///
    /// The digits after the language prefix are the major version followed
    /// by the minor version, one digit each.
    pub fn from_profile(profile: &str) -> Result<Header, HeaderError> {
        let unknown = || HeaderError::UnknownProfile(profile.to_owned());

        let (language, digits) = if let Some(rest) = profile.strip_prefix("spv") {
            (Language::SpirV, rest)
        } else if let Some(rest) = profile.strip_prefix("glsl") {
            (Language::Glsl, rest)
        } else if let Some(rest) = profile.strip_prefix("hlsl") {
            (Language::Hlsl, rest)
        } else if profile == "c" {
            return Ok(Header::new(Language::C, 0, 0));
        } else {
            return Err(unknown());
        };

        let mut versions = digits.chars().map(|c| c.to_digit(10));
        let major = versions.next().flatten().ok_or_else(unknown)?;
        let minor = match versions.next() {
            Some(digit) => digit.ok_or_else(unknown)?,
            None => 0,
        };
        // Trailing revision digits (the `0` in `glsl450`) carry no meaning.
        if versions.any(|digit| digit.is_none()) {
            return Err(unknown());
        }
        Ok(Header::new(language, major, minor))
    }

    /// Apply command line switches. Returns the switches that were not recognized.
    pub fn apply_switches<'a>(&mut self, switches: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let mut unknown = Vec::new();
        for switch in switches {
            match HeaderFlags::from_switch(switch) {
                Some(flag) => self.flags |= flag,
                None => unknown.push(switch),
            }
        }
        unknown
    }

    #[must_use]
    pub fn with_flags(mut self, flags: HeaderFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn has(&self, flag: HeaderFlags) -> bool {
        self.flags.contains(flag)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}", self.language, self.major, self.minor)
    }
}
