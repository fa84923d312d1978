use std::fmt;

use serde::{Deserialize, Serialize};

use super::scaling::PrintOption;

/// Identifier wrapper for intake sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The twelve Belmont college affiliations offered on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum College {
    FristCollegeOfMedicine,
    PharmacyAndHealthSciences,
    SciencesAndMathematics,
    OMoreArchitectureAndDesign,
    WatkinsArt,
    MasseyBusiness,
    Education,
    CurbEntertainmentAndMusicBusiness,
    InmanNursing,
    Law,
    LiberalArtsAndSocialSciences,
    MusicAndPerformingArts,
}

impl College {
    pub const ALL: [College; 12] = [
        College::FristCollegeOfMedicine,
        College::PharmacyAndHealthSciences,
        College::SciencesAndMathematics,
        College::OMoreArchitectureAndDesign,
        College::WatkinsArt,
        College::MasseyBusiness,
        College::Education,
        College::CurbEntertainmentAndMusicBusiness,
        College::InmanNursing,
        College::Law,
        College::LiberalArtsAndSocialSciences,
        College::MusicAndPerformingArts,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            College::FristCollegeOfMedicine => "Thomas F. Frist, Jr. College of Medicine",
            College::PharmacyAndHealthSciences => "College of Pharmacy & Health Sciences",
            College::SciencesAndMathematics => "College of Sciences & Mathematics",
            College::OMoreArchitectureAndDesign => "O'More College of Architecture & Design",
            College::WatkinsArt => "Watkins College of Art",
            College::MasseyBusiness => "Jack C. Massey College of Business",
            College::Education => "College of Education",
            College::CurbEntertainmentAndMusicBusiness => {
                "Mike Curb College of Entertainment & Music Business"
            }
            College::InmanNursing => "Gordon E. Inman College of Nursing",
            College::Law => "College of Law",
            College::LiberalArtsAndSocialSciences => "College of Liberal Arts & Social Sciences",
            College::MusicAndPerformingArts => "College of Music & Performing Arts",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|college| college.label() == raw)
    }
}

/// Applicant's relationship to the university.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Faculty,
    Staff,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Faculty, Role::Staff, Role::Student];

    pub const fn label(self) -> &'static str {
        match self {
            Role::Faculty => "Faculty",
            Role::Staff => "Staff",
            Role::Student => "Student",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.label() == raw)
    }
}

/// Event the poster is being printed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseCase {
    StudentResearchDay,
    SparkSymposium,
    ExternalConference,
    FacultySymposium,
    Other,
}

impl UseCase {
    pub const ALL: [UseCase; 5] = [
        UseCase::StudentResearchDay,
        UseCase::SparkSymposium,
        UseCase::ExternalConference,
        UseCase::FacultySymposium,
        UseCase::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            UseCase::StudentResearchDay => "FCOM Student Research Day",
            UseCase::SparkSymposium => "SPARK Symposium",
            UseCase::ExternalConference => "External Conference",
            UseCase::FacultySymposium => "Belmont Faculty Symposium",
            UseCase::Other => "Other",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|use_case| use_case.label() == raw)
    }
}

/// Validated applicant identity captured when the intake form is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub first_name: String,
    pub last_name: String,
    pub college: College,
    pub role: Role,
    pub use_case: UseCase,
    pub purpose: String,
    pub email: String,
}

impl Applicant {
    /// Name as it appears in the outbound webhook payload.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The uploaded poster, read fully into owned memory once at intake and
/// immutable for the rest of the submission's lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct PosterFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PosterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterFile")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Raw intake form fields as they arrive from the client, before validation.
#[derive(Debug, Default, Clone)]
pub struct IntakeForm {
    pub first_name: String,
    pub last_name: String,
    pub college: String,
    pub role: String,
    pub use_case: String,
    pub purpose: String,
    pub email: String,
}

/// One atomic intake action: the form fields plus the uploaded poster.
#[derive(Debug, Default, Clone)]
pub struct IntakeSubmission {
    pub form: IntakeForm,
    pub poster: Option<PosterFile>,
}

/// The three wizard stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Intake,
    Preview,
    Success,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Intake => "intake",
            Stage::Preview => "preview",
            Stage::Success => "success",
        }
    }
}

/// Session state. Submission data exists exactly while the session sits in
/// the preview stage; the other stages hold nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Intake,
    Preview {
        applicant: Applicant,
        poster: PosterFile,
        chosen_option: Option<PrintOption>,
    },
    Success,
}

impl SessionState {
    pub const fn stage(&self) -> Stage {
        match self {
            SessionState::Intake => Stage::Intake,
            SessionState::Preview { .. } => Stage::Preview,
            SessionState::Success => Stage::Success,
        }
    }
}

/// Store record for one wizard session.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub session_id: SessionId,
    pub state: SessionState,
}
