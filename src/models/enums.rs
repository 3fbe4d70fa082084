use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A wire string that matches no variant of the target enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {field}: {value}")]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Serde goes through the wire string, so the JSON form is exactly
/// what `as_str` returns. The first variant is the `Default`.
macro_rules! str_enum {
    ($name:ident { $first:ident => $first_s:literal $(, $variant:ident => $s:literal)* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $first,
            $($variant),*
        }

        impl $name {
            pub const ALL: &'static [Self] = &[Self::$first, $(Self::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    Self::$first => $first_s,
                    $(Self::$variant => $s),*
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$first
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $first_s => Ok(Self::$first),
                    $($s => Ok(Self::$variant),)*
                    _ => Err(InvalidEnumValue {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(Priority {
    Routine => "routine",
    Urgent => "urgent",
    Stat => "stat",
});

str_enum!(DoctorNoteType {
    Progress => "Progress",
    Consultation => "Consultation",
    Procedure => "Procedure",
    Discharge => "Discharge",
    Other => "Other",
});

str_enum!(RecommendationType {
    Treatment => "Treatment",
    Investigation => "Investigation",
    Consultation => "Consultation",
    Discharge => "Discharge",
    Transfer => "Transfer",
    Other => "Other",
});

str_enum!(FileCategory {
    Report => "Report",
    Image => "Image",
    Document => "Document",
    ConsentForm => "Consent Form",
    Other => "Other",
});

str_enum!(PharmacistNoteType {
    MedicationReview => "Medication Review",
    DrugInteraction => "Drug Interaction",
    DosageAdjustment => "Dosage Adjustment",
    AllergyAlert => "Allergy Alert",
    Other => "Other",
});

str_enum!(RecordStatus {
    Pending => "pending",
    Ordered => "ordered",
    Draft => "draft",
});

str_enum!(NotificationKind {
    Critical => "critical",
    Discharge => "discharge",
});

str_enum!(DateFormat {
    DayMonthYear => "DD/MM/YYYY",
    MonthDayYear => "MM/DD/YYYY",
    Iso => "YYYY-MM-DD",
});

impl DateFormat {
    /// Lenient parse for stored preferences; unknown values fall back.
    pub fn from_preference(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }

    pub fn format(&self, date: chrono::NaiveDate) -> String {
        let pattern = match self {
            Self::DayMonthYear => "%d/%m/%Y",
            Self::MonthDayYear => "%m/%d/%Y",
            Self::Iso => "%Y-%m-%d",
        };
        date.format(pattern).to_string()
    }
}
