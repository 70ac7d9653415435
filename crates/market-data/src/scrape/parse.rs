//! Heuristic label/value extraction from profile pages.
//!
//! Fields are declared in [`FIELD_SPECS`] as `{field, candidate labels,
//! parser}` and consumed by one generic routine: scan element text for an
//! exact label match (value = adjacent sibling text) or a `Label:` prefix
//! (value = post-colon substring). The routine is independent of any
//! network fetch. A label that appears nowhere in the document leaves the
//! field absent.

use scraper::{ElementRef, Html, Selector};

use crate::models::{MoverRow, ScrapedProfile};

use super::numeric::{parse_numeric, parse_percent};

/// Profile fields extractable from a scraped page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProfileField {
    Price,
    ChangePercent,
    PeRatio,
    ForwardPe,
    DividendYield,
    DividendGrowth,
    Beta,
    ExpenseRatio,
    Week52High,
    Week52Low,
    MarketCap,
    Revenue,
    Eps,
    SharesOutstanding,
    Volume,
}

/// Which parser a field's raw text goes through.
#[derive(Clone, Copy, Debug)]
pub enum ValueKind {
    /// Scalar with optional currency sign and magnitude suffix.
    Plain,
    /// Percent; the `%`-bearing token is isolated first.
    Percent,
}

pub struct FieldSpec {
    pub field: ProfileField,
    pub labels: &'static [&'static str],
    pub kind: ValueKind,
}

/// Declarative extraction table. Label variants cover the page layouts
/// observed across the stock and ETF profile categories.
pub const FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        field: ProfileField::Price,
        labels: &["Stock Price", "Price"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::ChangePercent,
        labels: &["Change", "Price Change"],
        kind: ValueKind::Percent,
    },
    FieldSpec {
        field: ProfileField::PeRatio,
        labels: &["PE Ratio", "P/E Ratio"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::ForwardPe,
        labels: &["Forward PE", "Forward P/E"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::DividendYield,
        labels: &["Dividend Yield"],
        kind: ValueKind::Percent,
    },
    FieldSpec {
        field: ProfileField::DividendGrowth,
        labels: &["Dividend Growth"],
        kind: ValueKind::Percent,
    },
    FieldSpec {
        field: ProfileField::Beta,
        labels: &["Beta", "Beta (5Y)"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::ExpenseRatio,
        labels: &["Expense Ratio"],
        kind: ValueKind::Percent,
    },
    FieldSpec {
        field: ProfileField::Week52High,
        labels: &["52-Week High", "52 Week High"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::Week52Low,
        labels: &["52-Week Low", "52 Week Low"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::MarketCap,
        labels: &["Market Cap", "Assets Under Management"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::Revenue,
        labels: &["Revenue", "Revenue (ttm)"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::Eps,
        labels: &["EPS", "EPS (ttm)"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::SharesOutstanding,
        labels: &["Shares Out", "Shares Outstanding"],
        kind: ValueKind::Plain,
    },
    FieldSpec {
        field: ProfileField::Volume,
        labels: &["Volume", "Average Volume"],
        kind: ValueKind::Plain,
    },
];

/// Extract every field in [`FIELD_SPECS`] plus the textual name, sector
/// and description.
pub fn parse_profile(html: &str) -> ScrapedProfile {
    let doc = Html::parse_document(html);
    let mut profile = ScrapedProfile::default();

    for spec in FIELD_SPECS {
        let Some(raw) = find_labeled_value(&doc, spec.labels) else {
            continue;
        };
        let value = match spec.kind {
            ValueKind::Plain => parse_numeric(&raw),
            ValueKind::Percent => parse_percent(&raw),
        };
        if let Some(value) = value {
            set_field(&mut profile, spec.field, value);
        }
    }

    profile.name = first_heading_text(&doc);
    profile.sector = find_labeled_value(&doc, &["Sector"]).filter(|s| !s.is_empty());
    profile.description = find_labeled_value(&doc, &["Description"])
        .or_else(|| section_paragraph(&doc, "About"))
        .filter(|s| !s.is_empty());

    profile
}

fn set_field(profile: &mut ScrapedProfile, field: ProfileField, value: rust_decimal::Decimal) {
    use ProfileField::*;
    match field {
        Price => profile.price = Some(value),
        ChangePercent => profile.daily_change_percent = Some(value),
        PeRatio => profile.pe_ratio = Some(value),
        ForwardPe => profile.forward_pe = Some(value),
        DividendYield => profile.dividend_yield = Some(value),
        DividendGrowth => profile.dividend_growth = Some(value),
        Beta => profile.beta = Some(value),
        ExpenseRatio => profile.expense_ratio = Some(value),
        Week52High => profile.week_52_high = Some(value),
        Week52Low => profile.week_52_low = Some(value),
        MarketCap => profile.market_cap = Some(value),
        Revenue => profile.revenue = Some(value),
        Eps => profile.eps = Some(value),
        SharesOutstanding => profile.shares_outstanding = Some(value),
        Volume => profile.volume = Some(value),
    }
}

/// Text directly inside an element, excluding descendants.
fn own_text(element: &ElementRef) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| t.to_string()))
        .collect::<String>()
        .trim()
        .to_string()
}

/// First non-empty text after `element`, from either a text node or the
/// next sibling element's full text.
fn next_sibling_text(element: &ElementRef) -> Option<String> {
    for sibling in element.next_siblings() {
        if let Some(text) = sibling.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if let Some(el) = ElementRef::wrap(sibling) {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn strip_label_prefix<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let head = text.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let tail = text.get(label.len()..)?.trim_start();
    let tail = tail.strip_prefix(':')?.trim();
    (!tail.is_empty()).then_some(tail)
}

/// Scan the whole document for any of `labels`, in exact-match or
/// `Label:` prefix form.
fn find_labeled_value(doc: &Html, labels: &[&str]) -> Option<String> {
    let any = Selector::parse("*").ok()?;
    for element in doc.select(&any) {
        let text = own_text(&element);
        if text.is_empty() {
            continue;
        }
        for label in labels {
            if text.eq_ignore_ascii_case(label) {
                if let Some(value) = next_sibling_text(&element) {
                    return Some(value);
                }
            } else if let Some(rest) = strip_label_prefix(&text, label) {
                return Some(rest.to_string());
            }
        }
    }
    None
}

fn first_heading_text(doc: &Html) -> Option<String> {
    let h1 = Selector::parse("h1").ok()?;
    doc.select(&h1)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
}

/// Paragraph following a heading that starts with `heading_prefix`
/// ("About Apple Inc." and the like).
fn section_paragraph(doc: &Html, heading_prefix: &str) -> Option<String> {
    let headings = Selector::parse("h2, h3").ok()?;
    for heading in doc.select(&headings) {
        let text = heading.text().collect::<String>();
        if text.trim().starts_with(heading_prefix) {
            if let Some(value) = next_sibling_text(&heading) {
                return Some(value);
            }
        }
    }
    None
}

fn looks_like_symbol(text: &str) -> bool {
    !text.is_empty()
        && text.len() <= 7
        && text.chars().any(|c| c.is_ascii_uppercase())
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-')
}

/// Parse a market-movers listing table: one row per symbol with name,
/// price and percent change. Rows without a recognizable symbol cell are
/// skipped.
pub fn parse_movers(html: &str) -> Vec<MoverRow> {
    let doc = Html::parse_document(html);
    let Ok(row_selector) = Selector::parse("table tbody tr") else {
        return Vec::new();
    };
    let Ok(cell_selector) = Selector::parse("td") else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for row in doc.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 3 {
            continue;
        }
        let Some(symbol_idx) = cells.iter().position(|cell| looks_like_symbol(cell)) else {
            continue;
        };
        let symbol = cells[symbol_idx].clone();
        let name = cells.get(symbol_idx + 1).cloned().unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        let change_percent = cells
            .iter()
            .skip(symbol_idx + 2)
            .find(|cell| cell.contains('%'))
            .and_then(|cell| parse_percent(cell));
        let price = cells
            .iter()
            .skip(symbol_idx + 2)
            .find(|cell| !cell.contains('%'))
            .and_then(|cell| parse_numeric(cell));
        rows.push(MoverRow {
            symbol,
            name,
            price,
            change_percent,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PROFILE_FIXTURE: &str = r#"
        <html><body>
        <h1>Apple Inc. (AAPL)</h1>
        <div>Sector</div><div>Technology</div>
        <table><tbody>
            <tr><td>Market Cap</td><td>2.8T</td></tr>
            <tr><td>PE Ratio</td><td>28.5</td></tr>
            <tr><td>Dividend Yield</td><td>0.55%</td></tr>
            <tr><td>52-Week High</td><td>$199.62</td></tr>
            <tr><td>EPS (ttm)</td><td>6.42</td></tr>
            <tr><td>Shares Out</td><td>15.5B</td></tr>
        </tbody></table>
        <div>Beta: 1.21</div>
        <h2>About Apple Inc.</h2>
        <p>Apple designs consumer electronics and services.</p>
        </body></html>
    "#;

    #[test]
    fn extracts_sibling_values() {
        let profile = parse_profile(PROFILE_FIXTURE);
        assert_eq!(profile.market_cap, Some(dec!(2800000000000)));
        assert_eq!(profile.pe_ratio, Some(dec!(28.5)));
        assert_eq!(profile.dividend_yield, Some(dec!(0.55)));
        assert_eq!(profile.week_52_high, Some(dec!(199.62)));
        assert_eq!(profile.eps, Some(dec!(6.42)));
        assert_eq!(profile.shares_outstanding, Some(dec!(15500000000)));
    }

    #[test]
    fn extracts_colon_prefixed_values() {
        let profile = parse_profile(PROFILE_FIXTURE);
        assert_eq!(profile.beta, Some(dec!(1.21)));
    }

    #[test]
    fn extracts_text_fields() {
        let profile = parse_profile(PROFILE_FIXTURE);
        assert_eq!(profile.name.as_deref(), Some("Apple Inc. (AAPL)"));
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(
            profile.description.as_deref(),
            Some("Apple designs consumer electronics and services.")
        );
    }

    #[test]
    fn missing_labels_stay_absent() {
        let profile = parse_profile(PROFILE_FIXTURE);
        assert_eq!(profile.expense_ratio, None);
        assert_eq!(profile.dividend_growth, None);
        assert_eq!(profile.forward_pe, None);
    }

    #[test]
    fn empty_document_yields_empty_profile() {
        let profile = parse_profile("<html><body></body></html>");
        assert_eq!(profile.price, None);
        assert_eq!(profile.name, None);
        assert_eq!(profile.sector, None);
    }

    #[test]
    fn movers_table_rows_parse() {
        let html = r#"
            <table><tbody>
                <tr><td>1</td><td>NVDA</td><td>NVIDIA Corp</td><td>+4.12%</td><td>$485.20</td></tr>
                <tr><td>2</td><td>AMD</td><td>Advanced Micro Devices</td><td>+2.50%</td><td>$118.40</td></tr>
                <tr><td colspan="5">ad row</td></tr>
            </tbody></table>
        "#;
        let rows = parse_movers(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "NVDA");
        assert_eq!(rows[0].name, "NVIDIA Corp");
        assert_eq!(rows[0].change_percent, Some(dec!(4.12)));
        assert_eq!(rows[0].price, Some(dec!(485.20)));
    }
}
