use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Declares a closed enumeration together with its wire codes.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    other => Err(Error::BadRequest(format!(
                        "Unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Pipeline stage of an application.
    ApplicationStatus {
        Applied => "APPLIQUEE",
        PhoneInterview => "ENTRETIEN_TELEPHONIQUE",
        TechnicalInterview => "ENTRETIEN_TECHNIQUE",
        HrInterview => "ENTRETIEN_RH",
        Offer => "OFFRE",
        Rejected => "REFUSEE",
        NoResponse => "SANS_REPONSE",
    }
);

wire_enum!(Priority {
    Low => "BASSE",
    Medium => "MOYENNE",
    High => "HAUTE",
});

wire_enum!(ContractType {
    Cdi => "CDI",
    Cdd => "CDD",
    Freelance => "FREELANCE",
    Internship => "STAGE",
    WorkStudy => "ALTERNANCE",
    Temporary => "INTERIM",
});

wire_enum!(ContactChannel {
    Email => "EMAIL",
    Linkedin => "LINKEDIN",
    Phone => "TELEPHONE",
    Website => "SITE",
});

wire_enum!(RemunerationType {
    Annual => "ANNUEL",
    Monthly => "MENSUEL",
    Hourly => "HORAIRE",
});

wire_enum!(TeleworkType {
    Full => "COMPLET",
    Partial => "PARTIEL",
    OnSite => "AUCUN",
});

impl ApplicationStatus {
    /// Statuses that still count as an open process.
    pub fn is_active(&self) -> bool {
        !matches!(self, ApplicationStatus::Rejected | ApplicationStatus::NoResponse)
    }

    pub fn is_interview(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::PhoneInterview
                | ApplicationStatus::TechnicalInterview
                | ApplicationStatus::HrInterview
        )
    }
}
