use super::patterns::PatternList;
use crate::model::{CaseType, Industry};
use std::sync::LazyLock;

static CASE_TYPES: LazyLock<PatternList<CaseType>> = LazyLock::new(|| {
    PatternList::new(&[
        (CaseType::Profitability, r"(?i)profit(?:ability)?|margin|declining.*revenue"),
        (CaseType::MarketEntry, r"(?i)market entry|enter(?:ing)? (?:the )?market|expansion"),
        (CaseType::MergersAcquisitions, r"(?i)M&A|merger|acquisition|buy|purchase"),
        (CaseType::CompetitiveResponse, r"(?i)compet(?:itor|ition)|rival|threat"),
        (CaseType::NewProductLaunch, r"(?i)new product|launch|introduce"),
        (CaseType::Pricing, r"(?i)pricing|price|priced"),
        (CaseType::CostReduction, r"(?i)cost.*reduc|reduc.*cost|cut costs"),
        (CaseType::Growth, r"(?i)growth|grow|increase.*revenue"),
        (CaseType::PrivateEquity, r"(?i)private equity|PE|investment"),
        (CaseType::ProcessOptimization, r"(?i)optimi[zs](?:e|ation)|improve.*process|efficiency"),
        (CaseType::Offshoring, r"(?i)offshoring|outsourc(?:e|ing)|relocat(?:e|ing)"),
    ])
});

static INDUSTRIES: LazyLock<PatternList<Industry>> = LazyLock::new(|| {
    PatternList::new(&[
        (Industry::Tech, r"(?i)tech(?:nology)?|software|SaaS"),
        (Industry::Retail, r"(?i)retail|store|shopping|e-commerce"),
        (Industry::Healthcare, r"(?i)health(?:care)?|hospital|pharma|medical"),
        (Industry::FinancialServices, r"(?i)bank(?:ing)?|finance|insurance|asset management"),
        (Industry::Manufacturing, r"(?i)manufact(?:uring|urer)|factory|industrial|production"),
        (Industry::Energy, r"(?i)energy|oil|gas|renewable|solar|wind"),
        (Industry::ConsumerGoods, r"(?i)consumer goods|CPG|FMCG|beverage|food"),
        (Industry::RealEstate, r"(?i)real estate|hotel|resort|property"),
    ])
});

/// Case type of the first matching category, `general` when none match.
pub fn classify_case_type(text: &str) -> CaseType {
    CASE_TYPES.first(text).unwrap_or_default()
}

/// Industry of the first matching category, `General` when none match.
pub fn classify_industry(text: &str) -> Industry {
    INDUSTRIES.first(text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profitability_first() {
        // Mentions both margins and an acquisition; profitability is listed first.
        let text = "Margins fell after the acquisition of a rival.";
        assert_eq!(classify_case_type(text), CaseType::Profitability);
    }

    #[test]
    fn test_market_entry() {
        assert_eq!(
            classify_case_type("Should they be entering the market in Brazil?"),
            CaseType::MarketEntry
        );
    }

    #[test]
    fn test_general_when_nothing_matches() {
        assert_eq!(classify_case_type("Hello world"), CaseType::General);
    }

    #[test]
    fn test_case_type_pattern_stays_on_one_line() {
        let text = "The cost base is large.\nWe want to reduce churn.";
        assert_eq!(classify_case_type(text), CaseType::General);
        assert_eq!(
            classify_case_type("We need to reduce cost in the plant."),
            CaseType::CostReduction
        );
    }

    #[test]
    fn test_industry_order() {
        assert_eq!(classify_industry("A software bank"), Industry::Tech);
        assert_eq!(classify_industry("A regional bank"), Industry::FinancialServices);
        assert_eq!(classify_industry("A luxury resort"), Industry::RealEstate);
        assert_eq!(classify_industry("Zzz"), Industry::General);
    }
}
