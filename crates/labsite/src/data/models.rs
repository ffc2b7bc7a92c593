//! Record shapes returned by the data service.
//!
//! Field names follow the service's JSON documents. Optional strings and lists that the service sends as `null`
//! or omits deserialize to empty values, so templates only ever check for emptiness.
use std::fmt::{self, Display, Formatter};

use maud::{PreEscaped, html};
use serde::{Deserialize, Deserializer};

/// `null` reads as the type's default, like a missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `null` list is empty, and `null` items are dropped.
fn nullable_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.into_iter().flatten().collect())
}

/// Entry of an id-only listing, e.g. `/teaching/ids`. Also matches full documents, extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct IdEntry {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Funding agency a project is filed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ProjectCategory {
    /// Core research grant from the Science and Engineering Research Board.
    #[serde(rename = "CG")]
    CoreGrant,
    #[serde(rename = "ISRO")]
    Isro,
    #[serde(rename = "WBDST")]
    WestBengalDst,
    #[default]
    #[serde(other)]
    Other,
}

/// Logo shown in the "Sponsored by" section of a project.
pub struct Sponsor {
    pub image_url: &'static str,
    pub alt: &'static str,
}

impl ProjectCategory {
    pub fn sponsor(&self) -> Option<Sponsor> {
        match self {
            ProjectCategory::CoreGrant => Some(Sponsor {
                image_url: "https://i.ibb.co/7g48NnK/Science-and-Engineering-Research-Board.png",
                alt: "SERB Image",
            }),
            ProjectCategory::Isro => Some(Sponsor {
                image_url: "https://i.ibb.co/1Gp83zZ/1200px-Indian-Space-Research-Organisation-Logo-svg.png",
                alt: "ISRO image",
            }),
            ProjectCategory::WestBengalDst => Some(Sponsor {
                image_url: "https://i.ibb.co/BfVHpCc/Emblem-of-West-Bengal-01.png",
                alt: "WB-DST image",
            }),
            ProjectCategory::Other => None,
        }
    }
}

/// Key/value row of a project's details table. Both sides are plain text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Information {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Person {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// May contain markup.
    #[serde(default, deserialize_with = "nullable")]
    pub designation: String,
}

impl Person {
    /// The service sends placeholder objects with an empty name for unfilled slots.
    pub fn is_present(&self) -> bool {
        !self.name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestigatorRole {
    Principal,
    /// The only co-investigator.
    CoPrincipal,
    /// First of two co-investigators.
    FirstCoPrincipal,
    SecondCoPrincipal,
}

impl InvestigatorRole {
    pub fn label(&self) -> &'static str {
        match self {
            InvestigatorRole::Principal => "Principal Investigator",
            InvestigatorRole::CoPrincipal => "Co-Principal Investigator",
            InvestigatorRole::FirstCoPrincipal => "Co-Principal Investigator I",
            InvestigatorRole::SecondCoPrincipal => "Co-Principal Investigator II",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", default)]
    pub id: String,
    /// May contain markup.
    pub title: String,
    /// May contain markup.
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: ProjectCategory,
    #[serde(default, deserialize_with = "nullable")]
    pub informations: Vec<Information>,
    #[serde(rename = "PI", default)]
    pub principal_investigator: Option<Person>,
    #[serde(rename = "CoPI_1", default)]
    pub first_co_investigator: Option<Person>,
    #[serde(rename = "CoPI_2", default)]
    pub second_co_investigator: Option<Person>,
}

impl Project {
    /// Investigators to show, in display order, with their labels.
    ///
    /// The first co-investigator only gets the `I` suffix when a second one is present.
    pub fn investigators(&self) -> Vec<(InvestigatorRole, &Person)> {
        fn present(person: &Option<Person>) -> Option<&Person> {
            person.as_ref().filter(|p| p.is_present())
        }

        let principal = present(&self.principal_investigator);
        let first = present(&self.first_co_investigator);
        let second = present(&self.second_co_investigator);

        let first_role = if second.is_some() {
            InvestigatorRole::FirstCoPrincipal
        } else {
            InvestigatorRole::CoPrincipal
        };

        [
            principal.map(|p| (InvestigatorRole::Principal, p)),
            first.map(|p| (first_role, p)),
            second.map(|p| (InvestigatorRole::SecondCoPrincipal, p)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().filter(|image| !image.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Publication {
    pub title: String,
    #[serde(rename = "paperLink", default)]
    pub paper_link: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub authors: String,
    #[serde(default, deserialize_with = "nullable")]
    pub publisher: String,
}

impl Publication {
    /// Citation line as untrusted HTML: linked title, authors, publisher.
    ///
    /// The result still has to go through the sanitizer, every part may carry markup from the service.
    pub fn citation_html(&self) -> String {
        let title = match self.paper_link.as_deref().filter(|link| !link.is_empty()) {
            Some(link) => html! {
                a."hover:text-blue-500"."hover:underline" target="_blank" href=(link) {
                    (PreEscaped(&self.title))
                }
            }
            .into_string(),
            None => self.title.clone(),
        };

        format!("{}. {}. {}. ", title, self.authors, self.publisher)
    }
}

/// Response of the per-id project fetch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectDetails {
    pub project: Project,
    #[serde(default, deserialize_with = "nullable")]
    pub publications: Vec<Publication>,
}

/// The service sends credit points either as a number or as free text (e.g. `"3 + 1"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CreditPoints {
    Number(serde_json::Number),
    Text(String),
}

impl Display for CreditPoints {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CreditPoints::Number(number) => write!(f, "{}", number),
            CreditPoints::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingRecord {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub credit_points: Option<CreditPoints>,
    #[serde(default, deserialize_with = "nullable")]
    pub session: String,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub routine: Vec<String>,
    /// Threshold with a trailing percent sign, e.g. `"75%"`.
    #[serde(default, deserialize_with = "nullable")]
    pub attendance_percentage: String,
    /// May contain markup.
    #[serde(default, deserialize_with = "nullable")]
    pub course_description: String,
    // The remaining lists hold HTML fragments.
    #[serde(rename = "teachingLearningProccess", default, deserialize_with = "nullable_strings")]
    pub teaching_learning_process: Vec<String>,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub course_objectives: Vec<String>,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub programme_objectives: Vec<String>,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub prerequisites: Vec<String>,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub syllabus: Vec<String>,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub reference_books: Vec<String>,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub other_resources: Vec<String>,
    #[serde(default, deserialize_with = "nullable_strings")]
    pub miscellaneous: Vec<String>,
}

impl TeachingRecord {
    /// Numeric part of the attendance threshold: everything before the first `%`.
    pub fn attendance_threshold(&self) -> &str {
        self.attendance_percentage
            .split('%')
            .next()
            .unwrap_or_default()
    }

    /// Labeled list sections, in display order. Empty ones are included, callers skip them.
    pub fn sections(&self) -> [(&'static str, &[String]); 8] {
        [
            ("Teaching Learning Process", self.teaching_learning_process.as_slice()),
            ("Course objectives", self.course_objectives.as_slice()),
            ("Programme objectives", self.programme_objectives.as_slice()),
            ("Prerequisites", self.prerequisites.as_slice()),
            ("Syllabus", self.syllabus.as_slice()),
            ("Recommended books", self.reference_books.as_slice()),
            ("Other resources", self.other_resources.as_slice()),
            ("Miscellaneous", self.miscellaneous.as_slice()),
        ]
    }
}
