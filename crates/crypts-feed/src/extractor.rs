//! Asset row extraction from market page markup.
//!
//! Locates the primary data table and reads fixed columns from each row.
//! The page layout is an external contract; when it drifts the extractor
//! fails with a specific `ParseError` instead of emitting a partial row set.

use crypts_core::{RawAssetRecord, Trend, TrendCell};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AssetField, ParseError, ParseResult};

/// Where each field lives in a table row.
///
/// Indices are zero-based positions among the row's cells. Defaults follow
/// the live page: star, rank, name, price, 1h, 24h, 7d, market cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorLayout {
    /// CSS selector for the data table (first match wins).
    #[serde(default = "default_table_selector")]
    pub table_selector: String,
    /// CSS selector whose presence inside a cell marks a downward move.
    #[serde(default = "default_down_marker")]
    pub down_marker: String,
    #[serde(default = "default_name_index")]
    pub name_index: usize,
    #[serde(default = "default_price_index")]
    pub price_index: usize,
    #[serde(default = "default_change_1h_index")]
    pub change_1h_index: usize,
    #[serde(default = "default_change_24h_index")]
    pub change_24h_index: usize,
    #[serde(default = "default_market_cap_index")]
    pub market_cap_index: usize,
}

fn default_table_selector() -> String {
    "table".to_string()
}

fn default_down_marker() -> String {
    ".icon-Caret-down".to_string()
}

fn default_name_index() -> usize {
    2
}

fn default_price_index() -> usize {
    3
}

fn default_change_1h_index() -> usize {
    4
}

fn default_change_24h_index() -> usize {
    5
}

fn default_market_cap_index() -> usize {
    7
}

impl Default for ExtractorLayout {
    fn default() -> Self {
        Self {
            table_selector: default_table_selector(),
            down_marker: default_down_marker(),
            name_index: default_name_index(),
            price_index: default_price_index(),
            change_1h_index: default_change_1h_index(),
            change_24h_index: default_change_24h_index(),
            market_cap_index: default_market_cap_index(),
        }
    }
}

impl ExtractorLayout {
    fn index_of(&self, field: AssetField) -> usize {
        match field {
            AssetField::Name => self.name_index,
            AssetField::Price => self.price_index,
            AssetField::Change1h => self.change_1h_index,
            AssetField::Change24h => self.change_24h_index,
            AssetField::MarketCap => self.market_cap_index,
        }
    }
}

/// Compiled extractor. Cheap to share across cycles.
#[derive(Debug)]
pub struct RowExtractor {
    layout: ExtractorLayout,
    table: Selector,
    down_marker: Selector,
    paragraph: Selector,
}

impl RowExtractor {
    /// Compile the layout's selectors.
    pub fn new(layout: ExtractorLayout) -> ParseResult<Self> {
        let table = compile(&layout.table_selector)?;
        let down_marker = compile(&layout.down_marker)?;
        let paragraph = compile("p")?;

        Ok(Self {
            layout,
            table,
            down_marker,
            paragraph,
        })
    }

    pub fn layout(&self) -> &ExtractorLayout {
        &self.layout
    }

    /// Extract asset records in document order.
    ///
    /// When `limit > 0` only the first `limit` rows are read; rows further
    /// down are never inspected, so lazily rendered placeholder rows past
    /// the limit cannot fail the cycle.
    pub fn extract(&self, markup: &str, limit: usize) -> ParseResult<Vec<RawAssetRecord>> {
        let document = Html::parse_document(markup);

        let table = document
            .select(&self.table)
            .next()
            .ok_or_else(|| ParseError::TableNotFound {
                selector: self.layout.table_selector.clone(),
            })?;

        let body = child_elements(table, &["tbody"])
            .into_iter()
            .next()
            .ok_or(ParseError::BodyNotFound)?;

        let rows = child_elements(body, &["tr"]);
        let take = if limit > 0 { limit } else { rows.len() };

        let records = rows
            .into_iter()
            .take(take)
            .enumerate()
            .map(|(idx, row)| self.extract_row(idx + 1, row))
            .collect::<ParseResult<Vec<_>>>()?;

        debug!(rows = records.len(), limit, "Extracted asset rows");
        Ok(records)
    }

    fn extract_row(&self, rank: usize, row: ElementRef<'_>) -> ParseResult<RawAssetRecord> {
        let cells = child_elements(row, &["td", "th"]);
        let cell = |field: AssetField| self.cell_at(&cells, rank, field);

        let name = self.read_name(rank, cell(AssetField::Name)?)?;
        let price = self.read_trend_cell(cell(AssetField::Price)?);
        let change_1h = self.read_trend_cell(cell(AssetField::Change1h)?);
        let change_24h = self.read_trend_cell(cell(AssetField::Change24h)?);
        let market_cap = self.read_market_cap(rank, cell(AssetField::MarketCap)?)?;

        Ok(RawAssetRecord::from_cells(
            rank, name, price, change_1h, change_24h, market_cap,
        ))
    }

    fn cell_at<'a>(
        &self,
        cells: &[ElementRef<'a>],
        rank: usize,
        field: AssetField,
    ) -> ParseResult<ElementRef<'a>> {
        let index = self.layout.index_of(field);
        cells.get(index).copied().ok_or(ParseError::MissingCell {
            row: rank,
            field,
            index,
            found: cells.len(),
        })
    }

    /// Name is the first paragraph of the cell; the symbol follows it.
    fn read_name(&self, rank: usize, cell: ElementRef<'_>) -> ParseResult<String> {
        let name = match cell.select(&self.paragraph).next() {
            Some(p) => element_text(p),
            None => element_text(cell),
        };

        if name.is_empty() {
            return Err(ParseError::EmptyField {
                row: rank,
                field: AssetField::Name,
            });
        }
        Ok(name)
    }

    fn read_trend_cell(&self, cell: ElementRef<'_>) -> TrendCell {
        let has_marker = cell.select(&self.down_marker).next().is_some();
        TrendCell::new(element_text(cell), Trend::from_down_marker(has_marker))
    }

    /// Market cap is nested: the first child of the cell's first paragraph
    /// holds the abbreviated figure, later siblings the full one.
    fn read_market_cap(&self, rank: usize, cell: ElementRef<'_>) -> ParseResult<String> {
        let paragraph = cell
            .select(&self.paragraph)
            .next()
            .ok_or(ParseError::MissingElement {
                row: rank,
                field: AssetField::MarketCap,
                element: "p",
            })?;

        let text = paragraph
            .children()
            .find_map(|node| {
                if let Some(element) = ElementRef::wrap(node) {
                    Some(element_text(element))
                } else {
                    node.value()
                        .as_text()
                        .map(|t| collapse_whitespace(t))
                        .filter(|t| !t.is_empty())
                }
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ParseError::EmptyField {
                row: rank,
                field: AssetField::MarketCap,
            });
        }
        Ok(text)
    }
}

fn compile(selector: &str) -> ParseResult<Selector> {
    Selector::parse(selector).map_err(|e| ParseError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Direct element children with one of the given tag names.
fn child_elements<'a>(parent: ElementRef<'a>, names: &[&str]) -> Vec<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| names.contains(&el.value().name()))
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
