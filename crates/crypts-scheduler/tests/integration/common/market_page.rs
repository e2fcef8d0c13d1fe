//! Market page fixtures shaped like the live listing table.

/// One listing row: star, rank, name, price, 1h, 24h, 7d, market cap.
pub fn coin_row(rank: usize, name: &str, price: &str, down_1h: bool) -> String {
    let caret = if down_1h { "icon-Caret-down" } else { "icon-Caret-up" };
    format!(
        r#"<tr>
            <td><span class="star"></span></td>
            <td><p>{rank}</p></td>
            <td><a href="/currencies/{rank}/"><div><p class="coin-item-name">{name}</p><p>SYM</p></div></a></td>
            <td><div><span>{price}</span></div></td>
            <td><span><span class="{caret}"></span>0.50%</span></td>
            <td><span><span class="icon-Caret-up"></span>1.25%</span></td>
            <td><span>3.00%</span></td>
            <td><p><span>$10B</span><span>$10,000,000,000</span></p></td>
        </tr>"#
    )
}

pub fn page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table><thead><tr><th>#</th></tr></thead><tbody>{}</tbody></table></body></html>"#,
        rows.concat()
    )
}

/// `count` rows named "Coin 1".."Coin N" priced $100, $200, ...
pub fn numbered_page(count: usize) -> String {
    let rows: Vec<String> = (1..=count)
        .map(|i| coin_row(i, &format!("Coin {i}"), &format!("${}.00", i * 100), i % 2 == 0))
        .collect();
    page(&rows)
}

pub fn named_page(names: &[(&str, &str)]) -> String {
    let rows: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, (name, price))| coin_row(i + 1, name, price, false))
        .collect();
    page(&rows)
}

/// A page whose layout has drifted: no data table at all.
pub fn drifted_page() -> String {
    r#"<html><body><div class="grid">maintenance</div></body></html>"#.to_string()
}
