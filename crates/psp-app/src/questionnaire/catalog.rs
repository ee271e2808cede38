//! Declarative question tables
//!
//! A catalog lists each question's answer kind and allowed options, plus the
//! conditional-visibility rules between questions. Controllers never name
//! individual questions; they walk the catalog.

use psp_core::QuestionId;

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Radio buttons, exactly one option
    SingleChoice,
    /// Checkboxes, stored as the selected options joined with ", "
    MultiChoice,
}

/// One question slot of a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpec {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub options: &'static [&'static str],
}

impl QuestionSpec {
    pub fn has_option(&self, value: &str) -> bool {
        self.options.contains(&value)
    }
}

/// `reveals` is only shown (and required) while `trigger` is answered `value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityRule {
    pub trigger: QuestionId,
    pub value: &'static str,
    pub reveals: QuestionId,
}

/// Separator between selected options of a multi-choice answer
pub const MULTI_CHOICE_SEPARATOR: &str = ", ";

pub const YES: &str = "Yes";
pub const NO: &str = "No";

const YES_NO: &[&str] = &[YES, NO];
const YES_NO_MAYBE: &[&str] = &[YES, NO, "Maybe"];

const DIAGNOSIS_DURATION: &[&str] = &[
    "Less than a month",
    "Less than 6 months",
    "Less than a year",
    "More than a year",
];

const GENDER: &[&str] = &["Male", "Female", "Other", "Prefer not to say"];

const RELATIONSHIP_IMPACT: &[&str] = &[
    "Relationships with family and friends",
    "Relationship with partner",
    "Self-esteem",
];

const OTHER_CONDITIONS: &[&str] = &[
    "Asthma",
    "Diabetes",
    "Depression",
    "Hay fever",
    "Hypertension",
    "High cholesterol",
    "Obesity",
    "Osteoporosis",
    "Peptic ulcer",
    "Plaque psoriasis",
    "Psoriatic arthritis",
    "Others",
];

/// Questions of one questionnaire, in display order
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    name: &'static str,
    questions: Vec<QuestionSpec>,
    rules: Vec<VisibilityRule>,
}

impl QuestionCatalog {
    pub fn new(
        name: &'static str,
        questions: Vec<QuestionSpec>,
        rules: Vec<VisibilityRule>,
    ) -> Self {
        Self {
            name,
            questions,
            rules,
        }
    }

    /// The 16-question introduction ("let's personalise") questionnaire
    pub fn introduction() -> Self {
        let single = |n: u32, options| QuestionSpec {
            id: QuestionId(n),
            kind: QuestionKind::SingleChoice,
            options,
        };
        let multi = |n: u32, options| QuestionSpec {
            id: QuestionId(n),
            kind: QuestionKind::MultiChoice,
            options,
        };

        let mut questions = vec![
            single(1, DIAGNOSIS_DURATION),
            single(2, GENDER),
            single(3, YES_NO),
            multi(4, RELATIONSHIP_IMPACT),
            single(5, YES_NO),
            multi(6, OTHER_CONDITIONS),
        ];
        questions.extend((7..=16).map(|n| single(n, YES_NO_MAYBE)));

        Self::new(
            "Introduction",
            questions,
            vec![VisibilityRule {
                trigger: QuestionId(5),
                value: YES,
                reveals: QuestionId(6),
            }],
        )
    }

    /// Remote category name of the questionnaire
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn questions(&self) -> &[QuestionSpec] {
        &self.questions
    }

    pub fn get(&self, id: QuestionId) -> Option<&QuestionSpec> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn rules(&self) -> &[VisibilityRule] {
        &self.rules
    }

    pub fn rules_triggered_by(&self, id: QuestionId) -> impl Iterator<Item = &VisibilityRule> {
        self.rules.iter().filter(move |r| r.trigger == id)
    }

    pub fn rule_revealing(&self, id: QuestionId) -> Option<&VisibilityRule> {
        self.rules.iter().find(|r| r.reveals == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introduction_has_sixteen_ordered_questions() {
        let catalog = QuestionCatalog::introduction();
        let ids: Vec<u32> = catalog.questions().iter().map(|q| q.id.0).collect();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
    }

    #[test]
    fn test_introduction_multi_choice_questions() {
        let catalog = QuestionCatalog::introduction();
        let multi: Vec<u32> = catalog
            .questions()
            .iter()
            .filter(|q| q.kind == QuestionKind::MultiChoice)
            .map(|q| q.id.0)
            .collect();
        assert_eq!(multi, vec![4, 6]);
        assert_eq!(catalog.get(QuestionId(6)).unwrap().options.len(), 12);
    }

    #[test]
    fn test_introduction_follow_up_rule() {
        let catalog = QuestionCatalog::introduction();
        let rule = catalog.rule_revealing(QuestionId(6)).unwrap();
        assert_eq!(rule.trigger, QuestionId(5));
        assert_eq!(rule.value, YES);
        assert_eq!(catalog.rules_triggered_by(QuestionId(5)).count(), 1);
        assert!(catalog.rule_revealing(QuestionId(7)).is_none());
    }

    #[test]
    fn test_has_option() {
        let catalog = QuestionCatalog::introduction();
        let q7 = catalog.get(QuestionId(7)).unwrap();
        assert!(q7.has_option("Maybe"));
        assert!(!q7.has_option("maybe"));
    }
}
