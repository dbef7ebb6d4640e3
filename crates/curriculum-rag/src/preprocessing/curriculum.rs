//! Curriculum-structure documents: workload summary plus one segment per section

use super::extract::{HourParser, SectionExtractor, WorkloadExtractor};
use super::vocabulary::{SectionRule, SummaryLabels, Vocabulary, WorkloadCategory};
use super::{DocumentKind, DocumentProcessor, Segment, TagValue};

/// Minimum workload of each complementary category plus the fixed curriculum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourTotals {
    pub fixed: u32,
    pub dcg: u32,
    pub acg: u32,
    pub acex: u32,
}

impl HourTotals {
    /// Hours of one category
    pub fn get(&self, category: WorkloadCategory) -> u32 {
        match category {
            WorkloadCategory::Fixed => self.fixed,
            WorkloadCategory::Dcg => self.dcg,
            WorkloadCategory::Acg => self.acg,
            WorkloadCategory::Acex => self.acex,
        }
    }

    fn set(&mut self, category: WorkloadCategory, hours: u32) {
        match category {
            WorkloadCategory::Fixed => self.fixed = hours,
            WorkloadCategory::Dcg => self.dcg = hours,
            WorkloadCategory::Acg => self.acg = hours,
            WorkloadCategory::Acex => self.acex = hours,
        }
    }

    /// Course total; four `u32` categories always fit in a `u64`
    pub fn total(&self) -> u64 {
        WorkloadCategory::ALL
            .into_iter()
            .map(|category| u64::from(self.get(category)))
            .sum()
    }

    /// Render the summary text
    pub fn render(&self, labels: &SummaryLabels) -> String {
        let total = self.total();
        let mut text = format!(
            "{}\n\n{}: {} {}\n\n{}:\n",
            labels.title, labels.total, total, labels.hours, labels.breakdown
        );
        for category in WorkloadCategory::ALL {
            text.push_str(&format!(
                "- {}: {} {}\n",
                labels.category(category),
                self.get(category),
                labels.hours
            ));
        }
        text.push_str(&format!(
            "\n{}: {} + {} + {} + {} = {} {}\n",
            labels.calculation, self.fixed, self.dcg, self.acg, self.acex, total, labels.hours
        ));
        text
    }
}

struct CompiledSection {
    rule: SectionRule,
    extractor: SectionExtractor,
}

/// Handles documents describing a program's curricular structure
///
/// Matches when both the structure and course-load markers are present, then emits
/// a workload summary followed by the general-info, fixed, flexible, DCG, ACG and
/// ACEx sections that could be located.
pub struct CurriculumStructureProcessor {
    structure_marker: String,
    course_load_marker: String,
    workloads: Vec<(WorkloadCategory, WorkloadExtractor)>,
    hours: HourParser,
    sections: Vec<CompiledSection>,
    summary: SummaryLabels,
}

impl CurriculumStructureProcessor {
    /// Build the processor from a vocabulary
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let workloads = vocabulary
            .workloads
            .iter()
            .map(|w| {
                (
                    w.category,
                    WorkloadExtractor::new(&w.marker, &vocabulary.minimum_load_label),
                )
            })
            .collect();

        let sections = vocabulary
            .sections
            .iter()
            .map(|rule| CompiledSection {
                extractor: SectionExtractor::new(&rule.start, &rule.ends, rule.until_end),
                rule: rule.clone(),
            })
            .collect();

        Self {
            structure_marker: vocabulary.structure_marker.clone(),
            course_load_marker: vocabulary.course_load_marker.clone(),
            workloads,
            hours: HourParser::new(&vocabulary.hour_unit),
            sections,
            summary: vocabulary.summary.clone(),
        }
    }

    /// Compute the four workload totals; missing sections count as zero
    pub fn hour_totals(&self, content: &str) -> HourTotals {
        let mut totals = HourTotals::default();
        for (category, extractor) in &self.workloads {
            if let Some(fragment) = extractor.fragment(content) {
                totals.set(*category, self.hours.parse(fragment));
            }
        }
        totals
    }

    fn summary_segment(&self, totals: &HourTotals) -> Segment {
        Segment::with_tags(
            totals.render(&self.summary),
            [("type", "summary_workload"), ("section", "general")],
        )
    }

    fn section_segment(&self, section: &CompiledSection, body: &str, totals: &HourTotals) -> Segment {
        let rule = &section.rule;
        let mut text = format!("{}\n\n{}", rule.header, body);
        let mut tags = vec![
            ("type", TagValue::from(rule.kind.type_tag())),
            ("section", TagValue::from("curricular_structure")),
        ];

        if let Some(category) = rule.kind.workload() {
            let hours = totals.get(category);
            if let Some(note) = &rule.hours_note {
                text.push_str("\n\n");
                text.push_str(&note.replace("{hours}", &hours.to_string()));
            }
            tags.push(("hours", TagValue::from(hours)));
        }

        Segment::with_tags(text, tags)
    }
}

impl Default for CurriculumStructureProcessor {
    fn default() -> Self {
        Self::new(&Vocabulary::default())
    }
}

impl DocumentProcessor for CurriculumStructureProcessor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::CurriculumStructure
    }

    fn can_handle(&self, content: &str) -> bool {
        content.contains(&self.structure_marker) && content.contains(&self.course_load_marker)
    }

    fn process(&self, content: &str) -> Vec<Segment> {
        let totals = self.hour_totals(content);
        tracing::debug!(
            fixed = totals.fixed,
            dcg = totals.dcg,
            acg = totals.acg,
            acex = totals.acex,
            total = totals.total(),
            "Computed curriculum workload"
        );

        let mut segments = vec![self.summary_segment(&totals)];

        for section in &self.sections {
            match section.extractor.extract(content) {
                Some(body) => {
                    segments.push(self.section_segment(section, body.trim(), &totals));
                }
                None => {
                    tracing::debug!("Section {:?} not found", section.rule.kind);
                }
            }
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::vocabulary::SectionKind;
    use proptest::prelude::*;

    const FULL_DOCUMENT: &str = "\
Estrutura Curricular
Curso: Tecnologia em Sistemas para Internet
Carga horária
Informações gerais do currículo
Regime: semestral
Estruturas curriculares
Conteúdos do currículo fixo
Disciplinas obrigatórias do 1º ao 6º semestre
Carga horária mínima: 2040 horas
Disciplinas do currículo flexível
Optativas diversas
Atividades complementares de graduação (ACG)
Carga horária mínima: 120 horas
Atividades complementares de extensão (ACEx)
Carga horária mínima: 270 horas
Disciplinas complementares de graduação (DCG)
Carga horária mínima: 180 horas
Estrutura Curricular2
";

    fn processor() -> CurriculumStructureProcessor {
        CurriculumStructureProcessor::default()
    }

    /// Pull the integers out of the "Cálculo: a + b + c + d = t" line
    fn calculation_numbers(text: &str) -> Vec<u64> {
        let line = text
            .lines()
            .find(|l| l.starts_with("Cálculo:"))
            .expect("calculation line");
        line.split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().unwrap())
            .collect()
    }

    #[test]
    fn test_can_handle_requires_both_markers() {
        let p = processor();
        assert!(p.can_handle("Estrutura Curricular ... Carga horária ..."));
        assert!(!p.can_handle("Estrutura Curricular apenas"));
        assert!(!p.can_handle("Carga horária apenas"));
        // Literal and case-sensitive
        assert!(!p.can_handle("estrutura curricular ... carga horária"));
        assert!(!p.can_handle(""));
    }

    #[test]
    fn test_scenario_fixed_and_dcg_only() {
        let text = "Estrutura Curricular ... Carga horária ... Conteúdos do currículo fixo ... \
                    Carga horária mínima: 2400 horas ... Disciplinas complementares de graduação ... \
                    Carga horária mínima: 60 horas";
        let p = processor();
        let totals = p.hour_totals(text);

        assert_eq!(
            totals,
            HourTotals { fixed: 2400, dcg: 60, acg: 0, acex: 0 }
        );
        assert_eq!(totals.total(), 2460);

        let segments = p.process(text);
        let summary = &segments[0];
        assert_eq!(summary.segment_type(), Some("summary_workload"));
        assert!(summary.text().contains("Carga horária total do curso: 2460 horas"));
        assert!(summary.text().contains("Cálculo: 2400 + 60 + 0 + 0 = 2460 horas"));
    }

    #[test]
    fn test_full_document_sections_in_canonical_order() {
        let segments = processor().process(FULL_DOCUMENT);
        let types: Vec<&str> = segments.iter().filter_map(|s| s.segment_type()).collect();

        assert_eq!(
            types,
            vec![
                "summary_workload",
                "general_info",
                "fixed_curriculum",
                "flexible_curriculum",
                "dcg",
                "acg",
                "acex",
            ]
        );
        for segment in &segments[1..] {
            assert_eq!(
                segment.tag("section").and_then(TagValue::as_text),
                Some("curricular_structure")
            );
        }
    }

    #[test]
    fn test_full_document_totals_and_hour_tags() {
        let segments = processor().process(FULL_DOCUMENT);
        assert_eq!(calculation_numbers(segments[0].text()), vec![2040, 180, 120, 270, 2610]);

        let hours = |ty: &str| {
            segments
                .iter()
                .find(|s| s.segment_type() == Some(ty))
                .and_then(|s| s.tag("hours"))
                .and_then(TagValue::as_int)
        };
        assert_eq!(hours("fixed_curriculum"), Some(2040));
        assert_eq!(hours("dcg"), Some(180));
        assert_eq!(hours("acg"), Some(120));
        assert_eq!(hours("acex"), Some(270));
        assert_eq!(hours("general_info"), None);
        assert_eq!(hours("flexible_curriculum"), None);
    }

    #[test]
    fn test_section_headers_and_bounds() {
        let segments = processor().process(FULL_DOCUMENT);
        let by_type = |ty: &str| {
            segments
                .iter()
                .find(|s| s.segment_type() == Some(ty))
                .map(|s| s.text().to_string())
                .unwrap()
        };

        let general = by_type("general_info");
        assert_eq!(
            general,
            "INFORMAÇÕES GERAIS DO CURRÍCULO\n\nInformações gerais do currículo\nRegime: semestral"
        );

        let fixed = by_type("fixed_curriculum");
        assert!(fixed.starts_with("CURRÍCULO FIXO (CONTEÚDOS OBRIGATÓRIOS)\n\nConteúdos do currículo fixo"));
        assert!(fixed.ends_with("Esta é a base obrigatória do curso com carga horária mínima de 2040 horas."));
        assert!(!fixed.contains("Optativas"));

        // ACG stops at the ACEx heading
        let acg = by_type("acg");
        assert!(acg.contains("120 horas"));
        assert!(!acg.contains("270 horas"));

        // DCG stops at the numbered running header
        let dcg = by_type("dcg");
        assert!(!dcg.contains("Estrutura Curricular2"));
        assert!(dcg.ends_with("Carga horária mínima obrigatória: 180 horas"));
    }

    #[test]
    fn test_missing_sections_are_omitted() {
        let text = "Estrutura Curricular\nCarga horária\nTexto sem seções conhecidas";
        let segments = processor().process(text);

        assert_eq!(segments.len(), 1);
        assert_eq!(calculation_numbers(segments[0].text()), vec![0, 0, 0, 0, 0]);
        assert_eq!(
            segments[0].tag("section").and_then(TagValue::as_text),
            Some("general")
        );
    }

    #[test]
    fn test_unbounded_sections_without_terminator_are_skipped() {
        // Fixed curriculum needs a following heading; DCG may run to the end
        let text = "Estrutura Curricular Carga horária Conteúdos do currículo fixo até o fim";
        let segments = processor().process(text);
        assert_eq!(segments.len(), 1);

        let text = "Estrutura Curricular Carga horária Disciplinas complementares de graduação (DCG) até o fim";
        let segments = processor().process(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].segment_type(), Some("dcg"));
    }

    #[test]
    fn test_ambiguous_markers_follow_first_occurrence() {
        // A heading quoted inside free text starts the section early; that is accepted
        let text = "Estrutura Curricular Carga horária \
                    Ver Disciplinas do currículo flexível adiante. \
                    Conteúdos do currículo fixo Núcleo Disciplinas do currículo flexível Optativas \
                    Atividades complementares fim";
        let segments = processor().process(text);
        let flexible = segments
            .iter()
            .find(|s| s.segment_type() == Some("flexible_curriculum"))
            .unwrap();
        assert!(flexible.text().contains("adiante. Conteúdos do currículo fixo"));
    }

    #[test]
    fn test_total_beyond_u32_is_exact() {
        let text = "Estrutura Curricular\nCarga horária\n\
                    Conteúdos do currículo fixo\nCarga horária mínima: 3000000000 horas\n\
                    Disciplinas complementares de graduação (DCG)\n\
                    Carga horária mínima: 3000000000 horas";
        let p = processor();
        assert_eq!(p.hour_totals(text).total(), 6_000_000_000);

        let summary = &p.process(text)[0];
        assert!(summary
            .text()
            .contains("Cálculo: 3000000000 + 3000000000 + 0 + 0 = 6000000000 horas"));
        assert!(summary
            .text()
            .contains("Carga horária total do curso: 6000000000 horas"));
        assert_eq!(
            calculation_numbers(summary.text()),
            vec![3_000_000_000, 3_000_000_000, 0, 0, 6_000_000_000]
        );
    }

    #[test]
    fn test_reprocessing_own_output_terminates() {
        let p = processor();
        for segment in p.process(FULL_DOCUMENT) {
            let again = p.process(segment.text());
            assert_eq!(again, p.process(segment.text()));
            if p.can_handle(segment.text()) {
                assert_eq!(again[0].segment_type(), Some("summary_workload"));
            }
        }
    }

    #[test]
    fn test_english_vocabulary() {
        let p = CurriculumStructureProcessor::new(&Vocabulary::english());
        let text = "Curricular Structure\nCourse load\n\
                    Fixed curriculum contents\nMinimum course load: 2400 hours\n\
                    Complementary graduation disciplines (DCG)\nMinimum course load: 60 hours";
        assert!(p.can_handle(text));

        let segments = p.process(text);
        assert!(segments[0].text().contains("Calculation: 2400 + 60 + 0 + 0 = 2460 hours"));
        let kinds: Vec<SectionKind> = SectionKind::ALL
            .into_iter()
            .filter(|k| segments.iter().any(|s| s.segment_type() == Some(k.type_tag())))
            .collect();
        assert_eq!(kinds, vec![SectionKind::Dcg]);
    }

    proptest! {
        #[test]
        fn prop_summary_total_is_sum(
            fixed in proptest::option::of(0u32..10_000),
            dcg in proptest::option::of(0u32..10_000),
            acg in proptest::option::of(0u32..10_000),
            acex in proptest::option::of(0u32..10_000),
        ) {
            let mut text = String::from("Estrutura Curricular\nCarga horária\n");
            let parts = [
                ("Conteúdos do currículo fixo", fixed),
                ("Disciplinas complementares de graduação (DCG)", dcg),
                ("Atividades complementares de graduação (ACG)", acg),
                ("Atividades complementares de extensão (ACEx)", acex),
            ];
            for (heading, hours) in parts {
                if let Some(h) = hours {
                    text.push_str(&format!("{}\nCarga horária mínima: {} horas\n", heading, h));
                }
            }

            let segments = processor().process(&text);
            prop_assert!(!segments.is_empty());
            prop_assert_eq!(segments[0].segment_type(), Some("summary_workload"));
            prop_assert_eq!(
                segments.iter().filter(|s| s.segment_type() == Some("summary_workload")).count(),
                1
            );

            let numbers = calculation_numbers(segments[0].text());
            prop_assert_eq!(numbers.len(), 5);
            prop_assert_eq!(numbers[0] + numbers[1] + numbers[2] + numbers[3], numbers[4]);
            prop_assert_eq!(numbers[0], u64::from(fixed.unwrap_or(0)));
            prop_assert_eq!(numbers[1], u64::from(dcg.unwrap_or(0)));
            prop_assert_eq!(numbers[2], u64::from(acg.unwrap_or(0)));
            prop_assert_eq!(numbers[3], u64::from(acex.unwrap_or(0)));

            let stated = format!("Carga horária total do curso: {} horas", numbers[4]);
            prop_assert!(segments[0].text().contains(&stated));
        }
    }
}
