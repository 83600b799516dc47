use crate::model::{CaseContent, CaseType, Difficulty, Industry, VisualAssets};

/// The six independent observations difficulty is scored from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySignals {
    /// Length of the case text in characters.
    pub text_length: usize,
    pub question_count: usize,
    /// A Porter, matrix or value-chain framework is mentioned.
    pub complex_framework: bool,
    pub case_type: CaseType,
    pub industry: Industry,
    pub has_conclusion: bool,
}

impl DifficultySignals {
    pub fn new(
        text: &str,
        content: &CaseContent,
        case_type: CaseType,
        industry: Industry,
    ) -> Self {
        DifficultySignals {
            text_length: text.chars().count(),
            question_count: content.questions.len(),
            complex_framework: content
                .framework
                .iter()
                .any(|f| f.contains("Porter") || f.contains("Matrix") || f.contains("Value Chain")),
            case_type,
            industry,
            has_conclusion: content.conclusion.is_some(),
        }
    }
}

/// Weighted point sum over the difficulty signals.
pub fn difficulty_score(s: &DifficultySignals) -> u32 {
    let mut score = 0;

    score += match s.text_length {
        n if n > 2000 => 2,
        n if n > 1000 => 1,
        _ => 0,
    };

    score += match s.question_count {
        n if n >= 3 => 2,
        n if n >= 1 => 1,
        _ => 0,
    };

    if s.complex_framework {
        score += 1;
    }

    if matches!(
        s.case_type,
        CaseType::PrivateEquity | CaseType::MergersAcquisitions
    ) {
        score += 1;
    }

    if matches!(
        s.industry,
        Industry::Tech | Industry::FinancialServices | Industry::Healthcare
    ) {
        score += 1;
    }

    if s.has_conclusion {
        score += 1;
    }

    score
}

pub fn difficulty_from_score(score: u32) -> Difficulty {
    match score {
        s if s >= 5 => Difficulty::Hard,
        s if s >= 3 => Difficulty::Medium,
        _ => Difficulty::Easy,
    }
}

pub fn estimate_difficulty(s: &DifficultySignals) -> Difficulty {
    difficulty_from_score(difficulty_score(s))
}

/// Completeness score of a case, 0 to 100.
pub fn quality_score(content: &CaseContent, assets: &VisualAssets) -> u32 {
    let mut score = 0;

    if content.prompt.is_some() {
        score += 20;
    }
    if content.clarifying_information.is_some() {
        score += 10;
    }
    if !content.framework.is_empty() {
        score += 10;
    }

    score += (content.questions.len() as u32 * 10).min(30);
    score += (content.exhibits.len() as u32 * 10).min(20);

    if !assets.is_empty() {
        score += 10;
    }

    score.min(100)
}
