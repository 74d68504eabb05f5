use crate::render::cleanup::clean_text;
use crate::types::{Block, BlockContent, PageResult, TableGrid};

/// Render an analyzed page as Markdown.
pub fn render_page(page: &PageResult) -> String {
    let mut output = String::new();

    for block in &page.blocks {
        let rendered = render_block(block);
        if rendered.is_empty() {
            continue;
        }
        output.push_str(&rendered);
        output.push_str("\n\n");
    }

    output.trim_end().to_string()
}

/// Render a single block, without the trailing blank line.
pub fn render_block(block: &Block) -> String {
    match &block.content {
        BlockContent::Header { text } => format!("## {}", clean_text(text)),
        BlockContent::Paragraph { text } | BlockContent::Text { text } => clean_text(text),
        BlockContent::Table { grid: Some(grid) } => render_table(grid),
        BlockContent::Table { grid: None } => block
            .lines
            .iter()
            .map(|line| line.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        BlockContent::Image {
            text,
            image,
            failed,
            ..
        } => {
            let mut out = format!("![{}](image:{})", escape_markdown(&image.name), image.name);
            if *failed {
                out.push_str(" (OCR failed)");
            }
            let text = clean_text(text);
            if !text.is_empty() {
                out.push_str("\n\n");
                out.push_str(&text);
            }
            out
        }
    }
}

/// Render a grid as a pipe table, using its first row as the header row.
///
/// Rows narrower than the widest row are padded with empty cells.
pub fn render_table(grid: &TableGrid) -> String {
    let Some((headers, rows)) = grid.rows.split_first() else {
        return String::new();
    };
    let width = grid.rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    push_row(&mut out, headers, width);
    out.push('|');
    for _ in 0..width {
        out.push_str(" --- |");
    }
    out.push('\n');
    for row in rows {
        push_row(&mut out, row, width);
    }
    out.trim_end().to_string()
}

fn push_row(out: &mut String, cells: &[String], width: usize) {
    out.push('|');
    for cell in cells {
        out.push_str(&format!(" {} |", escape_markdown(cell)));
    }
    // Pad missing cells.
    for _ in cells.len()..width {
        out.push_str("  |");
    }
    out.push('\n');
}

/// Escape Markdown special characters in text.
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageRef, Line, Token};

    fn block(content: BlockContent) -> Block {
        Block {
            content,
            y_start: 0.0,
            y_end: 0.0,
            lines: Vec::new(),
        }
    }

    fn grid(rows: &[&[&str]]) -> TableGrid {
        TableGrid {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    fn image(text: &str, failed: bool) -> Block {
        block(BlockContent::Image {
            text: text.to_string(),
            image: ImageRef {
                name: "img_p1_0".to_string(),
                uri: String::new(),
            },
            failed,
            error: None,
        })
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
        assert_eq!(escape_markdown("plain text"), "plain text");
        assert_eq!(escape_markdown("a|b"), "a\\|b");
    }

    #[test]
    fn test_render_table() {
        let md = render_table(&grid(&[&["Name", "Age"], &["Alice", "30"]]));
        assert_eq!(md, "| Name | Age |\n| --- | --- |\n| Alice | 30 |");
    }

    #[test]
    fn test_render_table_pads_short_rows() {
        let md = render_table(&grid(&[&["A", "B", "C"], &["1", "2"]]));
        assert!(md.ends_with("| 1 | 2 |  |"));
    }

    #[test]
    fn test_render_table_escapes_cells() {
        let md = render_table(&grid(&[&["a|b", "c"], &["*", "d"]]));
        assert!(md.contains("| a\\|b |"));
        assert!(md.contains("| \\* |"));
    }

    #[test]
    fn test_render_table_empty() {
        assert!(render_table(&TableGrid::default()).is_empty());
    }

    #[test]
    fn test_render_header_and_paragraph() {
        let page = PageResult {
            page_number: 1,
            blocks: vec![
                block(BlockContent::Header {
                    text: "Intro".to_string(),
                }),
                block(BlockContent::Paragraph {
                    text: "Some   infor-\nmation.".to_string(),
                }),
            ],
        };
        assert_eq!(render_page(&page), "## Intro\n\nSome information.");
    }

    #[test]
    fn test_render_table_without_grid_uses_lines() {
        let token = |text: &str, x: f64| Token {
            text: text.to_string(),
            x,
            y: 100.0,
            width: 10.0,
            height: 10.0,
            font_size: 10.0,
        };
        let mut b = block(BlockContent::Table { grid: None });
        b.lines = vec![Line::new(100.0, vec![token("a", 0.0), token("b", 50.0)])];
        assert_eq!(render_block(&b), "a b");
    }

    #[test]
    fn test_render_image_with_text() {
        let md = render_block(&image("Figure 1", false));
        assert_eq!(md, "![img\\_p1\\_0](image:img_p1_0)\n\nFigure 1");
    }

    #[test]
    fn test_render_image_failed() {
        let md = render_block(&image("", true));
        assert_eq!(md, "![img\\_p1\\_0](image:img_p1_0) (OCR failed)");
    }

    #[test]
    fn test_render_empty_page() {
        let page = PageResult {
            page_number: 3,
            blocks: Vec::new(),
        };
        assert_eq!(render_page(&page), "");
    }
}
