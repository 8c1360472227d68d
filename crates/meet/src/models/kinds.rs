use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MeetError;

/// One of the three competition lifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lift {
    S,
    B,
    D,
}

impl Lift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::B => "B",
            Self::D => "D",
        }
    }

    pub fn all() -> &'static [Lift] {
        &[Self::S, Self::B, Self::D]
    }
}

impl FromStr for Lift {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::S),
            "B" => Ok(Self::B),
            "D" => Ok(Self::D),
            _ => Err(MeetError::InvalidParams {
                method: "lift".to_string(),
                reason: format!("unknown lift '{}'", s),
            }),
        }
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The combination of lifts an entry is competing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    S,
    B,
    D,
    SB,
    SD,
    BD,
    SBD,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::B => "B",
            Self::D => "D",
            Self::SB => "SB",
            Self::SD => "SD",
            Self::BD => "BD",
            Self::SBD => "SBD",
        }
    }

    pub fn lifts(&self) -> &'static [Lift] {
        match self {
            Self::S => &[Lift::S],
            Self::B => &[Lift::B],
            Self::D => &[Lift::D],
            Self::SB => &[Lift::S, Lift::B],
            Self::SD => &[Lift::S, Lift::D],
            Self::BD => &[Lift::B, Lift::D],
            Self::SBD => &[Lift::S, Lift::B, Lift::D],
        }
    }

    pub fn has_lift(&self, lift: Lift) -> bool {
        self.lifts().contains(&lift)
    }

    /// Presentation order for results: full power first, singles last.
    pub fn sort_order(&self) -> u8 {
        match self {
            Self::SBD => 0,
            Self::BD => 1,
            Self::SB => 2,
            Self::SD => 3,
            Self::S => 4,
            Self::B => 5,
            Self::D => 6,
        }
    }
}

impl FromStr for Event {
    type Err = MeetError;

    /// Valid characters are "SBD", which must occur in that order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Self::S),
            "B" => Ok(Self::B),
            "D" => Ok(Self::D),
            "SB" => Ok(Self::SB),
            "SD" => Ok(Self::SD),
            "BD" => Ok(Self::BD),
            "SBD" => Ok(Self::SBD),
            _ => Err(MeetError::InvalidParams {
                method: "event".to_string(),
                reason: format!("unknown event '{}'", s),
            }),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Mx is an honorific that does not indicate gender, used by federations for
// lifters who do not fall into the M or F categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    M,
    F,
    Mx,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
            Self::Mx => "Mx",
        }
    }

    pub fn sort_order(&self) -> u8 {
        match self {
            Self::F => 0,
            Self::M => 1,
            Self::Mx => 2,
        }
    }
}

impl FromStr for Sex {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::M),
            "F" => Ok(Self::F),
            "Mx" => Ok(Self::Mx),
            _ => Err(MeetError::InvalidParams {
                method: "sex".to_string(),
                reason: format!("unknown sex '{}'", s),
            }),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equipment {
    #[default]
    Bare,
    Sleeves,
    Wraps,
    #[serde(rename = "Single-ply")]
    SinglePly,
    #[serde(rename = "Multi-ply")]
    MultiPly,
}

impl Equipment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bare => "Bare",
            Self::Sleeves => "Sleeves",
            Self::Wraps => "Wraps",
            Self::SinglePly => "Single-ply",
            Self::MultiPly => "Multi-ply",
        }
    }

    pub fn sort_order(&self) -> u8 {
        match self {
            Self::Bare => 0,
            Self::Sleeves => 1,
            Self::Wraps => 2,
            Self::SinglePly => 3,
            Self::MultiPly => 4,
        }
    }
}

impl FromStr for Equipment {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bare" => Ok(Self::Bare),
            "Sleeves" => Ok(Self::Sleeves),
            "Wraps" => Ok(Self::Wraps),
            "Single-ply" => Ok(Self::SinglePly),
            "Multi-ply" => Ok(Self::MultiPly),
            _ => Err(MeetError::InvalidParams {
                method: "equipment".to_string(),
                reason: format!("unknown equipment '{}'", s),
            }),
        }
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lettered sub-group of entries on a platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Flight {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
}

impl Flight {
    pub fn all() -> &'static [Flight] {
        &[
            Self::A,
            Self::B,
            Self::C,
            Self::D,
            Self::E,
            Self::F,
            Self::G,
            Self::H,
            Self::I,
            Self::J,
            Self::K,
        ]
    }

    pub fn as_char(&self) -> char {
        (b'A' + *self as u8) as char
    }
}

impl FromStr for Flight {
    type Err = MeetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if ('A'..='K').contains(&c) => {
                Ok(Self::all()[(c as u8 - b'A') as usize])
            }
            _ => Err(MeetError::InvalidParams {
                method: "flight".to_string(),
                reason: format!("unknown flight '{}'", s),
            }),
        }
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    #[default]
    Wilks,
    Glossbrenner,
    #[serde(rename = "IPF Points")]
    IpfPoints,
}

/// Interface language of the views attached to this meet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Eo,
    Es,
    Fr,
    De,
    Ru,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LiftStatus {
    #[default]
    NotAttempted,
    Success,
    Failure,
}

impl LiftStatus {
    pub fn is_judged(&self) -> bool {
        !matches!(self, Self::NotAttempted)
    }
}

impl From<bool> for LiftStatus {
    fn from(success: bool) -> Self {
        if success { Self::Success } else { Self::Failure }
    }
}
