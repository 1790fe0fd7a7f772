//! Closed vocabularies persisted on job records.
//!
//! Every value serializes to the exact kebab-case string stored in the
//! database and used in URLs. New values need an explicit variant here.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ExperienceLevel {
    EntryLevel,
    MidLevel,
    Senior,
    Manager,
    Director,
    Executive,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::EntryLevel => "Entry level",
            ExperienceLevel::MidLevel => "Mid level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Manager => "Manager",
            ExperienceLevel::Director => "Director",
            ExperienceLevel::Executive => "Executive",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contractor,
    Temporary,
    Internship,
}

impl EmploymentType {
    pub fn label(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contractor => "Contractor",
            EmploymentType::Temporary => "Temporary",
            EmploymentType::Internship => "Internship",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkMode {
    pub fn label(&self) -> &'static str {
        match self {
            WorkMode::Remote => "Remote",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::Onsite => "On-site",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Province {
    SanJose,
    Alajuela,
    Heredia,
    Guanacaste,
    Puntarenas,
    Limon,
    Cartago,
}

impl Province {
    pub fn label(&self) -> &'static str {
        match self {
            Province::SanJose => "San José",
            Province::Alajuela => "Alajuela",
            Province::Heredia => "Heredia",
            Province::Guanacaste => "Guanacaste",
            Province::Puntarenas => "Puntarenas",
            Province::Limon => "Limón",
            Province::Cartago => "Cartago",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum JobFunction {
    Engineering,
    Product,
    Design,
    Data,
    Devops,
    Qa,
    Security,
    ItSupport,
    Sales,
    Marketing,
    CustomerSuccess,
    Finance,
    HumanResources,
    Operations,
    Legal,
    Other,
}

impl JobFunction {
    pub fn label(&self) -> &'static str {
        match self {
            JobFunction::Engineering => "Engineering",
            JobFunction::Product => "Product",
            JobFunction::Design => "Design",
            JobFunction::Data => "Data",
            JobFunction::Devops => "DevOps",
            JobFunction::Qa => "QA",
            JobFunction::Security => "Security",
            JobFunction::ItSupport => "IT Support",
            JobFunction::Sales => "Sales",
            JobFunction::Marketing => "Marketing",
            JobFunction::CustomerSuccess => "Customer Success",
            JobFunction::Finance => "Finance",
            JobFunction::HumanResources => "Human Resources",
            JobFunction::Operations => "Operations",
            JobFunction::Legal => "Legal",
            JobFunction::Other => "Other",
        }
    }
}

/// Language of a posting. Also names the text search configuration used to
/// analyze it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl Language {
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Location {
    CostaRica,
    Latam,
}

impl Location {
    pub fn label(&self) -> &'static str {
        match self {
            Location::CostaRica => "Costa Rica",
            Location::Latam => "LATAM",
        }
    }
}
