use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    Profitability,
    MarketEntry,
    MergersAcquisitions,
    CompetitiveResponse,
    NewProductLaunch,
    Pricing,
    CostReduction,
    Growth,
    PrivateEquity,
    ProcessOptimization,
    Offshoring,
    #[default]
    General,
}

impl CaseType {
    pub const ALL: [CaseType; 12] = [
        CaseType::Profitability,
        CaseType::MarketEntry,
        CaseType::MergersAcquisitions,
        CaseType::CompetitiveResponse,
        CaseType::NewProductLaunch,
        CaseType::Pricing,
        CaseType::CostReduction,
        CaseType::Growth,
        CaseType::PrivateEquity,
        CaseType::ProcessOptimization,
        CaseType::Offshoring,
        CaseType::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseType::Profitability => "profitability",
            CaseType::MarketEntry => "market_entry",
            CaseType::MergersAcquisitions => "mergers_acquisitions",
            CaseType::CompetitiveResponse => "competitive_response",
            CaseType::NewProductLaunch => "new_product_launch",
            CaseType::Pricing => "pricing",
            CaseType::CostReduction => "cost_reduction",
            CaseType::Growth => "growth",
            CaseType::PrivateEquity => "private_equity",
            CaseType::ProcessOptimization => "process_optimization",
            CaseType::Offshoring => "offshoring",
            CaseType::General => "general",
        }
    }

    /// Human label, e.g. "Market Entry".
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn from_str_loose(s: &str) -> Option<CaseType> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        CaseType::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    Tech,
    Retail,
    Healthcare,
    #[serde(rename = "Financial Services")]
    FinancialServices,
    Manufacturing,
    Energy,
    #[serde(rename = "Consumer Goods")]
    ConsumerGoods,
    #[serde(rename = "Real Estate")]
    RealEstate,
    #[default]
    General,
}

impl Industry {
    pub const ALL: [Industry; 9] = [
        Industry::Tech,
        Industry::Retail,
        Industry::Healthcare,
        Industry::FinancialServices,
        Industry::Manufacturing,
        Industry::Energy,
        Industry::ConsumerGoods,
        Industry::RealEstate,
        Industry::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Tech => "Tech",
            Industry::Retail => "Retail",
            Industry::Healthcare => "Healthcare",
            Industry::FinancialServices => "Financial Services",
            Industry::Manufacturing => "Manufacturing",
            Industry::Energy => "Energy",
            Industry::ConsumerGoods => "Consumer Goods",
            Industry::RealEstate => "Real Estate",
            Industry::General => "General",
        }
    }

    /// Lowercase tag form, e.g. "financial_services".
    pub fn slug(&self) -> String {
        self.as_str().to_lowercase().replace(' ', "_")
    }

    pub fn from_str_loose(s: &str) -> Option<Industry> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        Industry::ALL.into_iter().find(|i| i.slug() == key)
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Difficulty> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub text: String,
    /// The question asks for arithmetic (calculate, compute, operators).
    pub has_calculation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhibitKind {
    Table,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exhibit {
    pub exhibit_number: u32,
    #[serde(rename = "type")]
    pub kind: ExhibitKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<BTreeMap<String, String>>,
}

/// A table reconstructed from a page's text layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTable {
    pub table_index: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows as header -> cell maps (only rows as wide as the header).
    pub data: Vec<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    EmbeddedImage,
    Screenshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualAsset {
    /// 1-based page the asset was taken from.
    pub page: usize,
    pub filename: String,
    pub filepath: PathBuf,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualAssets {
    pub images: Vec<VisualAsset>,
    pub screenshots: Vec<VisualAsset>,
}

impl VisualAssets {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.screenshots.is_empty()
    }

    /// Assets whose page falls within `pages`.
    pub fn within(&self, pages: PageSpan) -> VisualAssets {
        let pick = |assets: &[VisualAsset]| {
            assets
                .iter()
                .filter(|a| pages.contains(a.page))
                .cloned()
                .collect()
        };
        VisualAssets {
            images: pick(&self.images),
            screenshots: pick(&self.screenshots),
        }
    }
}

/// Inclusive range of 1-based pages a case was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    pub first: usize,
    pub last: usize,
}

impl PageSpan {
    pub fn contains(&self, page: usize) -> bool {
        self.first <= page && page <= self.last
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseContent {
    pub prompt: Option<String>,
    pub clarifying_information: Option<String>,
    pub framework: Vec<String>,
    pub questions: Vec<Question>,
    pub exhibits: Vec<Exhibit>,
    pub conclusion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseMetadata {
    pub case_type: CaseType,
    pub industry: Industry,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStats {
    pub num_questions: usize,
    pub num_exhibits: usize,
    pub num_images: usize,
    pub num_screenshots: usize,
    pub has_visual_assets: bool,
}

impl CaseStats {
    pub fn new(content: &CaseContent, assets: &VisualAssets) -> Self {
        CaseStats {
            num_questions: content.questions.len(),
            num_exhibits: content.exhibits.len(),
            num_images: assets.images.len(),
            num_screenshots: assets.screenshots.len(),
            has_visual_assets: !assets.is_empty(),
        }
    }
}

/// One case cut out of a casebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedCase {
    /// `<pdf stem>_case_<n>`.
    pub case_id: String,
    /// File name of the PDF the case came from.
    pub source: String,
    pub pages: PageSpan,
    pub raw_text: String,
    pub content: CaseContent,
    pub metadata: CaseMetadata,
    pub visual_assets: VisualAssets,
    pub stats: CaseStats,
}

/// Everything extracted from one PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasebookExtraction {
    /// File name of the PDF.
    pub source: String,
    pub cases: Vec<ExtractedCase>,
    pub total_images: usize,
    pub total_screenshots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub extraction_date: DateTime<Utc>,
    pub total_pdfs: usize,
    pub total_cases: usize,
    pub total_images: usize,
    pub total_screenshots: usize,
    pub features: Vec<String>,
}

/// The intermediate artifact of an extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub metadata: ExtractionMetadata,
    /// File names of the PDFs that were extracted.
    pub sources: Vec<String>,
    pub cases: Vec<ExtractedCase>,
}
