//! Fixed-tag text extraction from HTML documents.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::types::Chunk;

/// Structural elements that qualify as retrieval chunks, in document order.
const CHUNK_TAGS: &str = "p, h1, h2, h3, h4, h5, h6, li, td, th, pre, blockquote, table";

static CHUNK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CHUNK_TAGS).expect("static selector must parse"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector must parse"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("static selector must parse"));

/// Extract text chunks from HTML, one per qualifying element.
///
/// A `table` element is flattened into a single chunk (cells joined by tabs,
/// rows by newlines); elements nested inside a table do not produce chunks of
/// their own. Chunks whose text is empty after trimming are dropped.
#[must_use]
pub fn extract_chunks(html: &str) -> Vec<Chunk> {
    let document = Html::parse_document(html);

    let mut chunks = Vec::new();
    for element in document.select(&CHUNK_SELECTOR) {
        if inside_table(element) {
            continue;
        }

        let tag = element.value().name().to_ascii_lowercase();
        let text = if tag == "table" {
            flatten_table(element)
        } else {
            element.text().collect::<String>().trim().to_owned()
        };

        if text.is_empty() {
            continue;
        }

        chunks.push(Chunk { text, tag });
    }

    chunks
}

fn inside_table(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name().eq_ignore_ascii_case("table"))
}

/// Flatten a table into tab-delimited cells and newline-delimited rows.
fn flatten_table(table: ElementRef<'_>) -> String {
    table
        .select(&ROW_SELECTOR)
        .map(|row| {
            row.select(&CELL_SELECTOR)
                .map(|cell| cell.text().collect::<String>().trim().to_owned())
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_qualifying_elements_returns_empty() {
        let chunks = extract_chunks("<html><body><div>just a div</div></body></html>");
        assert!(chunks.is_empty());
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(extract_chunks("").is_empty());
    }

    #[test]
    fn paragraphs_and_headings_in_document_order() {
        let html = "<h1>Title</h1><p>First.</p><p>Second.</p>";
        let chunks = extract_chunks(html);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].tag, "h1");
        assert_eq!(chunks[0].text, "Title");
        assert_eq!(chunks[1].text, "First.");
        assert_eq!(chunks[2].text, "Second.");
    }

    #[test]
    fn list_items_chunked_individually() {
        let html = "<ul><li>A</li><li>B</li><li>C</li></ul>";
        let chunks = extract_chunks(html);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.tag == "li"));
    }

    #[test]
    fn whitespace_only_elements_dropped() {
        let html = "<p>   </p><p>kept</p><li>\n\t</li>";
        let chunks = extract_chunks(html);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "kept");
    }

    #[test]
    fn text_is_trimmed() {
        let chunks = extract_chunks("<p>  padded  </p>");
        assert_eq!(chunks[0].text, "padded");
    }

    #[test]
    fn table_produces_one_merged_chunk() {
        let html = "<table>\
            <tr><th>City</th><th>Country</th></tr>\
            <tr><td>Paris</td><td>France</td></tr>\
            </table>";
        let chunks = extract_chunks(html);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tag, "table");
        assert_eq!(chunks[0].text, "City\tCountry\nParis\tFrance");
    }

    #[test]
    fn table_cells_do_not_chunk_separately() {
        let html = "<table><tr><td>cell</td></tr></table><p>after</p>";
        let chunks = extract_chunks(html);
        let tags: Vec<&str> = chunks.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["table", "p"]);
    }

    #[test]
    fn empty_table_dropped() {
        let chunks = extract_chunks("<table></table>");
        assert!(chunks.is_empty());
    }

    #[test]
    fn nested_table_does_not_duplicate() {
        let html = "<table><tr><td><table><tr><td>inner</td></tr></table></td></tr></table>";
        let chunks = extract_chunks(html);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tag, "table");
        assert!(chunks[0].text.contains("inner"));
    }

    #[test]
    fn blockquote_and_pre_chunked() {
        let html = "<blockquote>quoted</blockquote><pre>code block</pre>";
        let chunks = extract_chunks(html);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].tag, "blockquote");
        assert_eq!(chunks[1].tag, "pre");
    }

    #[test]
    fn nested_text_is_concatenated() {
        let html = "<p>Hello <b>bold</b> world</p>";
        let chunks = extract_chunks(html);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello bold world");
    }

    #[test]
    fn n_qualifying_elements_yield_n_chunks() {
        let html: String = (0..25).map(|i| format!("<p>chunk {i}</p>")).collect();
        let chunks = extract_chunks(&html);
        assert_eq!(chunks.len(), 25);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.text, format!("chunk {i}"));
        }
    }

    mod proptest_extract {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn extraction_never_panics(html in "\\PC{0,2000}") {
                let _ = extract_chunks(&html);
            }

            #[test]
            fn extracted_chunks_are_non_empty(html in "(<p>[a-z ]{0,50}</p>){1,5}") {
                for chunk in extract_chunks(&html) {
                    prop_assert!(!chunk.text.trim().is_empty());
                }
            }
        }
    }
}
