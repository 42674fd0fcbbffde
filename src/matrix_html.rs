use crate::table::MatrixTable;

/// Renders `<thead>`/`<tbody>` markup for a matrix table element.
pub fn render_table_html(table: &MatrixTable) -> String {
    let header_cells: String = table
        .header
        .iter()
        .map(|name| format!("<th>{}</th>", html_escape(name)))
        .collect();

    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .cells
                .iter()
                .map(|cell| {
                    format!(
                        r#"<td class="{class}" style="background-color: {bg};" title="{title}">{value}</td>"#,
                        class = cell.intensity.css_class(),
                        bg = cell.intensity.css_background(),
                        title = html_escape(&cell.tooltip),
                        value = html_escape(&cell.content),
                    )
                })
                .collect();
            format!("<tr><th>{}</th>{cells}</tr>", html_escape(&row.header))
        })
        .collect();

    format!("<thead><tr><th></th>{header_cells}</tr></thead><tbody>{rows}</tbody>")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{CoOccurrenceMatrix, Player};
    use crate::scale::BandedScale;
    use crate::table::{NameStyle, build_table};

    #[test]
    fn names_are_escaped_and_cells_carry_tooltips() {
        let matrix = CoOccurrenceMatrix::new(
            vec![
                Player::new(1, "<Ola>", None),
                Player::new(2, "Kari \"K\"", None),
            ],
            vec![vec![0, 1], vec![1, 0]],
            Some(1.0),
        )
        .expect("matrix");
        let table = build_table(&matrix, &BandedScale, NameStyle::FirstName);
        let html = render_table_html(&table);

        assert!(html.starts_with("<thead><tr><th></th><th>&lt;Ola&gt;</th>"));
        assert!(html.contains(r#"title="&lt;Ola&gt; played with Kari &quot;K&quot; in 1 match""#));
        assert!(html.contains(r#"class="matrix-level-10""#));
        assert!(html.contains(r#"class="matrix-level-0" style="background-color: #f8f9fa;""#));
        assert!(html.ends_with("</tr></tbody>"));
    }
}
