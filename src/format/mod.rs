//! Output formatting for listings, review analyses and shopping reports
//! (table, JSON, markdown).

use crate::amazon::Product;
use crate::analysis::{AnalyzedProduct, ReviewAnalysis};
use crate::commands::ShopReport;
use crate::config::OutputFormat;

const NO_RECOMMENDATION: &str = "Sorry, couldn't find a suitable recommendation.";

/// Formats command results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats search listings.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
        }
    }

    /// Formats the review analysis of one product.
    pub fn format_review_analysis(&self, asin: &str, analysis: Option<&ReviewAnalysis>) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "asin": asin,
                "review_analysis": analysis,
            }))
            .unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Table => match analysis {
                Some(analysis) => self.table_analysis(asin, analysis),
                None => format!("No reviews found for {}.", asin),
            },
            OutputFormat::Markdown => match analysis {
                Some(analysis) => self.markdown_analysis(asin, analysis),
                None => format!("*No reviews found for {}.*", asin),
            },
        }
    }

    /// Formats a shopping run: analyzed products followed by the recommendation.
    pub fn format_shop_report(&self, report: &ShopReport) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.table_report(report),
            OutputFormat::Markdown => self.markdown_report(report),
        }
    }

    // Table formatting

    fn table_products(&self, products: &[Product]) -> String {
        let asin_width = 10;
        let price_width = 12;
        let rating_width = 8;
        let prime_width = 5;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<asin_width$}  {:<price_width$}  {:<rating_width$}  {:<prime_width$}  {}",
            "ASIN", "Price", "Rating", "Prime", "Title"
        ));
        lines.push(format!(
            "{:-<asin_width$}  {:-<price_width$}  {:-<rating_width$}  {:-<prime_width$}  {:-<title_width$}",
            "", "", "", "", ""
        ));

        for product in products {
            let prime = if product.is_prime { "Yes" } else { "No" };

            lines.push(format!(
                "{:<asin_width$}  {:>price_width$}  {:>rating_width$}  {:<prime_width$}  {}",
                product.asin,
                price_cell(product),
                rating_cell(product),
                prime,
                truncate(&product.title, title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    fn table_analysis(&self, asin: &str, analysis: &ReviewAnalysis) -> String {
        let mut lines = Vec::new();
        let sentiment = &analysis.sentiment_summary;

        lines.push(format!("Review analysis for {}", asin));
        lines.push(String::new());
        lines.push(format!("{:<20}{}", "Reviews:", analysis.total_reviews));
        lines.push(format!("{:<20}{:.2} / 5", "Average rating:", analysis.average_rating));
        lines.push(format!(
            "{:<20}{} ({:.0}%)",
            "Verified purchases:",
            analysis.verified_purchases,
            analysis.verified_ratio() * 100.0
        ));
        lines.push(format!(
            "{:<20}{} positive, {} negative, {} neutral",
            "Sentiment:", sentiment.positive, sentiment.negative, sentiment.neutral
        ));

        lines.push(String::new());
        lines.push("Rating distribution:".to_string());
        for (rating, count) in analysis.rating_distribution.iter().rev() {
            lines.push(format!("  {:>4}  {:<20}  {}", rating, "#".repeat((*count).min(20)), count));
        }

        if !analysis.common_phrases.is_empty() {
            lines.push(String::new());
            lines.push("Common phrases:".to_string());
            for (phrase, count) in analysis.common_phrases.iter() {
                lines.push(format!("  {:<30}  {}", format!("\"{}\"", phrase), count));
            }
        }

        lines.join("\n")
    }

    fn table_report(&self, report: &ShopReport) -> String {
        let mut lines = Vec::new();

        let budget = match report.budget {
            Some(budget) => format!(" (budget: {:.2})", budget),
            None => String::new(),
        };
        lines.push(format!("Analyzed products for '{}'{}", report.query, budget));
        lines.push(String::new());

        lines.push(format!(
            "{:<10}  {:>12}  {:>6}  {:>7}  {:>5}  {:>8}  {:<9}  {}",
            "ASIN", "Price", "Stars", "Reviews", "Avg", "Verified", "+/-/=", "Title"
        ));
        lines.push(format!(
            "{:-<10}  {:-<12}  {:-<6}  {:-<7}  {:-<5}  {:-<8}  {:-<9}  {:-<40}",
            "", "", "", "", "", "", "", ""
        ));

        for product in &report.products {
            let (reviews, avg, verified, sentiment) = analysis_cells(product);
            lines.push(format!(
                "{:<10}  {:>12}  {:>6}  {:>7}  {:>5}  {:>8}  {:<9}  {}",
                product.basic_info.asin,
                price_cell(&product.basic_info),
                rating_cell(&product.basic_info),
                reviews,
                avg,
                verified,
                sentiment,
                truncate(&product.detailed_info.title, 40)
            ));
        }

        lines.push(String::new());
        match &report.recommendation {
            Some(text) => {
                lines.push("AI Recommendation:".to_string());
                lines.push(text.clone());
            }
            None => lines.push(NO_RECOMMENDATION.to_string()),
        }

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| ASIN | Price | Rating | Prime | Title |".to_string());
        lines.push("|------|-------|--------|-------|-------|".to_string());

        for product in products {
            let prime = if product.is_prime { "✓" } else { "" };

            lines.push(format!(
                "| {} | {} | {} | {} | [{}]({}) |",
                product.asin,
                price_cell(product),
                rating_cell(product),
                prime,
                truncate(&product.title, 40),
                product.url
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    fn markdown_analysis(&self, asin: &str, analysis: &ReviewAnalysis) -> String {
        let mut lines = Vec::new();
        let sentiment = &analysis.sentiment_summary;

        lines.push(format!("## Reviews for {}", asin));
        lines.push(String::new());
        lines.push(format!("- **Reviews:** {}", analysis.total_reviews));
        lines.push(format!("- **Average rating:** {:.2}/5", analysis.average_rating));
        lines.push(format!(
            "- **Verified purchases:** {} ({:.0}%)",
            analysis.verified_purchases,
            analysis.verified_ratio() * 100.0
        ));
        lines.push(format!(
            "- **Sentiment:** {} positive, {} negative, {} neutral",
            sentiment.positive, sentiment.negative, sentiment.neutral
        ));

        if !analysis.common_phrases.is_empty() {
            lines.push(String::new());
            lines.push("| Phrase | Count |".to_string());
            lines.push("|--------|-------|".to_string());
            for (phrase, count) in analysis.common_phrases.iter() {
                lines.push(format!("| {} | {} |", phrase, count));
            }
        }

        lines.join("\n")
    }

    fn markdown_report(&self, report: &ShopReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## Analyzed products for \"{}\"", report.query));
        if let Some(budget) = report.budget {
            lines.push(String::new());
            lines.push(format!("*Budget: {:.2}*", budget));
        }
        lines.push(String::new());

        lines.push("| ASIN | Price | Stars | Reviews | Avg | Verified | +/-/= | Title |".to_string());
        lines.push("|------|-------|-------|---------|-----|----------|-------|-------|".to_string());

        for product in &report.products {
            let (reviews, avg, verified, sentiment) = analysis_cells(product);
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} | {} | [{}]({}) |",
                product.basic_info.asin,
                price_cell(&product.basic_info),
                rating_cell(&product.basic_info),
                reviews,
                avg,
                verified,
                sentiment,
                truncate(&product.detailed_info.title, 40),
                product.basic_info.url
            ));
        }

        lines.push(String::new());
        lines.push("## AI Recommendation".to_string());
        lines.push(String::new());
        lines.push(report.recommendation.clone().unwrap_or_else(|| NO_RECOMMENDATION.to_string()));

        lines.join("\n")
    }
}

fn price_cell(product: &Product) -> String {
    match &product.price {
        Some(p) if !p.is_hidden => format!("{:.2}", p.current),
        Some(_) => "In cart".to_string(),
        None => "N/A".to_string(),
    }
}

fn rating_cell(product: &Product) -> String {
    match &product.rating {
        Some(r) => format!("{:.1}", r.stars),
        None => "N/A".to_string(),
    }
}

/// Review count, average, verified share and sentiment tally cells.
fn analysis_cells(product: &AnalyzedProduct) -> (String, String, String, String) {
    match &product.review_analysis {
        Some(a) => (
            a.total_reviews.to_string(),
            format!("{:.1}", a.average_rating),
            format!("{:.0}%", a.verified_ratio() * 100.0),
            format!(
                "{}/{}/{}",
                a.sentiment_summary.positive, a.sentiment_summary.negative, a.sentiment_summary.neutral
            ),
        ),
        None => ("0".to_string(), "-".to_string(), "-".to_string(), "-".to_string()),
    }
}

/// Shortens to at most `max` characters, ending in "..." when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
