//! Locale-specific marker phrases and headers used by the processors
//!
//! Curriculum documents are matched purely on literal phrases. Everything a
//! processor searches for or writes as a header lives here so the engine itself
//! stays language-agnostic.

use serde::{Deserialize, Serialize};

/// Language of the curriculum documents being ingested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Brazilian Portuguese (UFSM curriculum PDFs)
    #[default]
    Portuguese,
    /// English rendering of the same document layout
    English,
}

/// Workload category summed into the course total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadCategory {
    /// Fixed (mandatory) curriculum contents
    Fixed,
    /// Complementary graduation disciplines
    Dcg,
    /// Complementary graduation activities
    Acg,
    /// Complementary extension activities
    Acex,
}

impl WorkloadCategory {
    /// All categories in summary order
    pub const ALL: [WorkloadCategory; 4] = [Self::Fixed, Self::Dcg, Self::Acg, Self::Acex];
}

/// Structural section of a curriculum-structure document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    GeneralInfo,
    FixedCurriculum,
    FlexibleCurriculum,
    Dcg,
    Acg,
    Acex,
}

impl SectionKind {
    /// Canonical output order
    pub const ALL: [SectionKind; 6] = [
        Self::GeneralInfo,
        Self::FixedCurriculum,
        Self::FlexibleCurriculum,
        Self::Dcg,
        Self::Acg,
        Self::Acex,
    ];

    /// Value of the `type` tag for this section
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::GeneralInfo => "general_info",
            Self::FixedCurriculum => "fixed_curriculum",
            Self::FlexibleCurriculum => "flexible_curriculum",
            Self::Dcg => "dcg",
            Self::Acg => "acg",
            Self::Acex => "acex",
        }
    }

    /// Workload category whose total is attached to this section
    pub fn workload(&self) -> Option<WorkloadCategory> {
        match self {
            Self::GeneralInfo | Self::FlexibleCurriculum => None,
            Self::FixedCurriculum => Some(WorkloadCategory::Fixed),
            Self::Dcg => Some(WorkloadCategory::Dcg),
            Self::Acg => Some(WorkloadCategory::Acg),
            Self::Acex => Some(WorkloadCategory::Acex),
        }
    }
}

/// Phrase that terminates a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndMarker {
    /// Literal phrase
    Phrase(String),
    /// Literal phrase immediately followed by one or more digits
    /// (page-numbered running headers such as "Estrutura Curricular3")
    Numbered(String),
}

/// Start/end anchors and output header for one section
#[derive(Debug, Clone)]
pub struct SectionRule {
    pub kind: SectionKind,
    pub start: String,
    pub ends: Vec<EndMarker>,
    /// Whether the section may run to the end of the document
    pub until_end: bool,
    pub header: String,
    /// Trailing note, `{hours}` is replaced with the section's workload
    pub hours_note: Option<String>,
}

/// Marker used to locate a workload value
#[derive(Debug, Clone)]
pub struct WorkloadRule {
    pub category: WorkloadCategory,
    pub marker: String,
}

/// Labels of the workload summary segment
#[derive(Debug, Clone)]
pub struct SummaryLabels {
    pub title: String,
    pub total: String,
    pub breakdown: String,
    pub fixed: String,
    pub dcg: String,
    pub acg: String,
    pub acex: String,
    pub calculation: String,
    pub hours: String,
}

impl SummaryLabels {
    /// Label of one breakdown line
    pub fn category(&self, category: WorkloadCategory) -> &str {
        match category {
            WorkloadCategory::Fixed => &self.fixed,
            WorkloadCategory::Dcg => &self.dcg,
            WorkloadCategory::Acg => &self.acg,
            WorkloadCategory::Acex => &self.acex,
        }
    }
}

/// Full set of phrases for one locale
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Literal marker for "curricular structure" documents
    pub structure_marker: String,
    /// Literal marker for "course load"
    pub course_load_marker: String,
    /// Label preceding a minimum workload value
    pub minimum_load_label: String,
    /// Singular hour unit; an optional trailing `s` is accepted
    pub hour_unit: String,
    /// Word following the ordinal in semester headings
    pub semester_word: String,
    pub workloads: Vec<WorkloadRule>,
    pub sections: Vec<SectionRule>,
    pub summary: SummaryLabels,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::portuguese()
    }
}

impl Vocabulary {
    /// Vocabulary for a locale
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Portuguese => Self::portuguese(),
            Locale::English => Self::english(),
        }
    }

    /// Marker phrase of a workload category
    pub fn workload_marker(&self, category: WorkloadCategory) -> Option<&str> {
        self.workloads
            .iter()
            .find(|w| w.category == category)
            .map(|w| w.marker.as_str())
    }

    /// Portuguese phrases as printed in UFSM curriculum PDFs
    pub fn portuguese() -> Self {
        Self {
            structure_marker: "Estrutura Curricular".to_string(),
            course_load_marker: "Carga horária".to_string(),
            minimum_load_label: "Carga horária mínima:".to_string(),
            hour_unit: "hora".to_string(),
            semester_word: "Semestre".to_string(),
            workloads: vec![
                workload(WorkloadCategory::Fixed, "Conteúdos do currículo fixo"),
                workload(WorkloadCategory::Dcg, "Disciplinas complementares de graduação"),
                workload(WorkloadCategory::Acg, "Atividades complementares de graduação"),
                workload(WorkloadCategory::Acex, "Atividades complementares de extensão"),
            ],
            sections: vec![
                SectionRule {
                    kind: SectionKind::GeneralInfo,
                    start: "Informações gerais do currículo".to_string(),
                    ends: phrases(&["Estruturas curriculares", "Disciplinas do currículo"]),
                    until_end: false,
                    header: "INFORMAÇÕES GERAIS DO CURRÍCULO".to_string(),
                    hours_note: None,
                },
                SectionRule {
                    kind: SectionKind::FixedCurriculum,
                    start: "Conteúdos do currículo fixo".to_string(),
                    ends: phrases(&["Disciplinas do currículo flexível", "Atividades complementares"]),
                    until_end: false,
                    header: "CURRÍCULO FIXO (CONTEÚDOS OBRIGATÓRIOS)".to_string(),
                    hours_note: Some(
                        "Esta é a base obrigatória do curso com carga horária mínima de {hours} horas."
                            .to_string(),
                    ),
                },
                SectionRule {
                    kind: SectionKind::FlexibleCurriculum,
                    start: "Disciplinas do currículo flexível".to_string(),
                    ends: phrases(&["Atividades complementares", "Disciplinas complementares"]),
                    until_end: false,
                    header: "CURRÍCULO FLEXÍVEL (DISCIPLINAS OPTATIVAS)".to_string(),
                    hours_note: None,
                },
                SectionRule {
                    kind: SectionKind::Dcg,
                    start: "Disciplinas complementares de graduação (DCG)".to_string(),
                    ends: vec![EndMarker::Numbered("Estrutura Curricular".to_string())],
                    until_end: true,
                    header: "DCG - DISCIPLINAS COMPLEMENTARES DE GRADUAÇÃO".to_string(),
                    hours_note: Some("Carga horária mínima obrigatória: {hours} horas".to_string()),
                },
                SectionRule {
                    kind: SectionKind::Acg,
                    start: "Atividades complementares de graduação (ACG)".to_string(),
                    ends: phrases(&[
                        "Disciplinas complementares",
                        "Atividades complementares de extensão",
                    ]),
                    until_end: true,
                    header: "ACG - ATIVIDADES COMPLEMENTARES DE GRADUAÇÃO".to_string(),
                    hours_note: Some("Carga horária mínima obrigatória: {hours} horas".to_string()),
                },
                SectionRule {
                    kind: SectionKind::Acex,
                    start: "Atividades complementares de extensão (ACEx)".to_string(),
                    ends: phrases(&[
                        "Atividades complementares de graduação",
                        "Disciplinas complementares",
                    ]),
                    until_end: true,
                    header: "ACEx - ATIVIDADES COMPLEMENTARES DE EXTENSÃO".to_string(),
                    hours_note: Some("Carga horária mínima obrigatória: {hours} horas".to_string()),
                },
            ],
            summary: SummaryLabels {
                title: "RESUMO DA ESTRUTURA CURRICULAR - CARGA HORÁRIA TOTAL".to_string(),
                total: "Carga horária total do curso".to_string(),
                breakdown: "Detalhamento".to_string(),
                fixed: "Conteúdos do currículo fixo".to_string(),
                dcg: "Disciplinas Complementares de Graduação (DCG)".to_string(),
                acg: "Atividades Complementares de Graduação (ACG)".to_string(),
                acex: "Atividades Complementares de Extensão (ACEx)".to_string(),
                calculation: "Cálculo".to_string(),
                hours: "horas".to_string(),
            },
        }
    }

    /// English phrases for translated curriculum documents
    pub fn english() -> Self {
        Self {
            structure_marker: "Curricular Structure".to_string(),
            course_load_marker: "Course load".to_string(),
            minimum_load_label: "Minimum course load:".to_string(),
            hour_unit: "hour".to_string(),
            semester_word: "Semester".to_string(),
            workloads: vec![
                workload(WorkloadCategory::Fixed, "Fixed curriculum contents"),
                workload(WorkloadCategory::Dcg, "Complementary graduation disciplines"),
                workload(WorkloadCategory::Acg, "Complementary graduation activities"),
                workload(WorkloadCategory::Acex, "Complementary extension activities"),
            ],
            sections: vec![
                SectionRule {
                    kind: SectionKind::GeneralInfo,
                    start: "General curriculum information".to_string(),
                    ends: phrases(&["Curricular structures", "Curriculum disciplines"]),
                    until_end: false,
                    header: "GENERAL CURRICULUM INFORMATION".to_string(),
                    hours_note: None,
                },
                SectionRule {
                    kind: SectionKind::FixedCurriculum,
                    start: "Fixed curriculum contents".to_string(),
                    ends: phrases(&[
                        "Flexible curriculum disciplines",
                        "Complementary graduation activities",
                        "Complementary extension activities",
                    ]),
                    until_end: false,
                    header: "FIXED CURRICULUM (MANDATORY CONTENTS)".to_string(),
                    hours_note: Some(
                        "This is the mandatory core of the course with a minimum course load of {hours} hours."
                            .to_string(),
                    ),
                },
                SectionRule {
                    kind: SectionKind::FlexibleCurriculum,
                    start: "Flexible curriculum disciplines".to_string(),
                    ends: phrases(&[
                        "Complementary graduation activities",
                        "Complementary extension activities",
                        "Complementary graduation disciplines",
                    ]),
                    until_end: false,
                    header: "FLEXIBLE CURRICULUM (ELECTIVE DISCIPLINES)".to_string(),
                    hours_note: None,
                },
                SectionRule {
                    kind: SectionKind::Dcg,
                    start: "Complementary graduation disciplines (DCG)".to_string(),
                    ends: vec![EndMarker::Numbered("Curricular Structure".to_string())],
                    until_end: true,
                    header: "DCG - COMPLEMENTARY GRADUATION DISCIPLINES".to_string(),
                    hours_note: Some("Mandatory minimum course load: {hours} hours".to_string()),
                },
                SectionRule {
                    kind: SectionKind::Acg,
                    start: "Complementary graduation activities (ACG)".to_string(),
                    ends: phrases(&[
                        "Complementary graduation disciplines",
                        "Complementary extension activities",
                    ]),
                    until_end: true,
                    header: "ACG - COMPLEMENTARY GRADUATION ACTIVITIES".to_string(),
                    hours_note: Some("Mandatory minimum course load: {hours} hours".to_string()),
                },
                SectionRule {
                    kind: SectionKind::Acex,
                    start: "Complementary extension activities (ACEx)".to_string(),
                    ends: phrases(&[
                        "Complementary graduation activities",
                        "Complementary graduation disciplines",
                    ]),
                    until_end: true,
                    header: "ACEx - COMPLEMENTARY EXTENSION ACTIVITIES".to_string(),
                    hours_note: Some("Mandatory minimum course load: {hours} hours".to_string()),
                },
            ],
            summary: SummaryLabels {
                title: "CURRICULAR STRUCTURE SUMMARY - TOTAL COURSE LOAD".to_string(),
                total: "Total course load".to_string(),
                breakdown: "Breakdown".to_string(),
                fixed: "Fixed curriculum contents".to_string(),
                dcg: "Complementary Graduation Disciplines (DCG)".to_string(),
                acg: "Complementary Graduation Activities (ACG)".to_string(),
                acex: "Complementary Extension Activities (ACEx)".to_string(),
                calculation: "Calculation".to_string(),
                hours: "hours".to_string(),
            },
        }
    }
}

fn workload(category: WorkloadCategory, marker: &str) -> WorkloadRule {
    WorkloadRule {
        category,
        marker: marker.to_string(),
    }
}

fn phrases(items: &[&str]) -> Vec<EndMarker> {
    items.iter().map(|s| EndMarker::Phrase(s.to_string())).collect()
}
