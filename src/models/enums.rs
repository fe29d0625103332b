use crate::db::DatabaseError;
use serde::{Deserialize, Deserializer, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Action {
    Upload => "upload",
    Medicine => "medicine",
    Ai => "ai",
    Daily => "daily",
});

impl Action {
    /// Points awarded each time the action is applied.
    pub fn points(self) -> u32 {
        match self {
            Action::Upload => 50,
            Action::Medicine => 40,
            Action::Ai => 30,
            Action::Daily => 20,
        }
    }
}

str_enum!(AveragingPolicy {
    NullAsZero => "null_as_zero",
    ExcludeMissing => "exclude_missing",
});

str_enum!(DailyRepeatPolicy {
    AwardOncePerDay => "award_once_per_day",
    AwardEveryCall => "award_every_call",
});

/// Document-authenticity classification attached to an extracted record.
///
/// Serialized with capitalized names (`"Valid"`); decoding is
/// case-insensitive because backends are inconsistent about casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Legality {
    Valid,
    Invalid,
    #[default]
    Unverified,
}

impl Legality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Legality::Valid => "Valid",
            Legality::Invalid => "Invalid",
            Legality::Unverified => "Unverified",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "valid" => Some(Legality::Valid),
            "invalid" => Some(Legality::Invalid),
            "unverified" => Some(Legality::Unverified),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Legality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(Legality::Unverified),
            Some(s) => Legality::parse(&s).ok_or_else(|| {
                serde::de::Error::unknown_variant(&s, &["Valid", "Invalid", "Unverified"])
            }),
        }
    }
}
