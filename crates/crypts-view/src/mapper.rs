//! Presentation mapper.
//!
//! Turns filtered records into display-ready rows. Total and deterministic:
//! the same records always yield the same cells.

use crypts_core::{Emphasis, Glyph, RawAssetRecord, RenderCell, RenderRow, Trend};

/// Map every record, preserving order.
pub fn map_records(records: &[RawAssetRecord]) -> Vec<RenderRow> {
    records.iter().map(map_record).collect()
}

/// Map a single record.
pub fn map_record(record: &RawAssetRecord) -> RenderRow {
    RenderRow {
        name: RenderCell::plain(record.name.clone(), Emphasis::Accent),
        price: trended(&record.price_text, record.price_trend),
        change_1h: trended(&record.change_1h_text, record.trend_1h),
        change_24h: trended(&record.change_24h_text, record.trend_24h),
        market_cap: RenderCell::plain(record.market_cap.clone(), Emphasis::Strong),
    }
}

fn trended(text: &str, trend: Trend) -> RenderCell {
    match trend {
        Trend::Up => RenderCell::with_glyph(text, Emphasis::Positive, Glyph::Up),
        Trend::Down => RenderCell::with_glyph(text, Emphasis::Negative, Glyph::Down),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypts_core::TrendCell;

    fn record(price: Trend, h1: Trend, h24: Trend) -> RawAssetRecord {
        RawAssetRecord::from_cells(
            1,
            "Bitcoin",
            TrendCell::new("$64,210.55", price),
            TrendCell::new("0.45%", h1),
            TrendCell::new("2.10%", h24),
            "$1.26T",
        )
    }

    #[test]
    fn test_trend_selects_glyph_and_emphasis() {
        let row = map_record(&record(Trend::Up, Trend::Down, Trend::Up));

        assert_eq!(row.price.glyph, Some(Glyph::Up));
        assert_eq!(row.price.emphasis, Emphasis::Positive);
        assert_eq!(row.price.display(), "△ $64,210.55");

        assert_eq!(row.change_1h.glyph, Some(Glyph::Down));
        assert_eq!(row.change_1h.emphasis, Emphasis::Negative);
        assert_eq!(row.change_1h.display(), "▽ 0.45%");

        assert_eq!(row.change_24h.emphasis, Emphasis::Positive);
    }

    #[test]
    fn test_name_and_market_cap_pass_through() {
        let row = map_record(&record(Trend::Down, Trend::Down, Trend::Down));

        assert_eq!(row.name.text, "Bitcoin");
        assert_eq!(row.name.emphasis, Emphasis::Accent);
        assert!(row.name.glyph.is_none());

        assert_eq!(row.market_cap.text, "$1.26T");
        assert_eq!(row.market_cap.emphasis, Emphasis::Strong);
        assert!(row.market_cap.glyph.is_none());
    }

    #[test]
    fn test_mapping_is_deterministic_and_ordered() {
        let records = vec![
            record(Trend::Up, Trend::Up, Trend::Down),
            record(Trend::Down, Trend::Up, Trend::Up),
        ];

        let first = map_records(&records);
        let second = map_records(&records);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].price.glyph, Some(Glyph::Down));
    }

    #[test]
    fn test_empty_input_maps_to_empty() {
        assert!(map_records(&[]).is_empty());
    }
}
