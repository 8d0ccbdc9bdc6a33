//! Page extractor for the site's listing and book pages
//!
//! Listing pages carry:
//! - `.npage` links with page numbers (the last one is the last catalog page)
//! - one `.d_book` block per book, whose first link points at the detail page
//!
//! Book detail pages carry:
//! - `<h1>` with `name :: author`
//! - `.bookimage a img` with the cover
//! - `.texts span` with reader comments
//! - `span.d_book a` with genre labels
//!
//! Required elements that are missing produce an `ExtractError` instead of an
//! empty result, since that means the site layout changed.

use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const PAGE_NUMBER: &str = ".npage";
const BOOK_CARD: &str = ".d_book";
const LINK: &str = "a[href]";
const TITLE: &str = "h1";
const COVER: &str = ".bookimage a img";
const COMMENT_BLOCK: &str = ".texts";
const COMMENT_TEXT: &str = "span";
const GENRE: &str = "span.d_book a";

/// Separator between book name and author in the page title
const TITLE_SEPARATOR: &str = "::";

/// Metadata found on a book detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    /// Book name, trimmed but not yet sanitized
    pub title: String,
    pub author: String,
    /// Absolute URL of the cover image
    pub cover_url: Url,
    pub comments: Vec<String>,
    pub genres: Vec<String>,
}

fn selector(css: &'static str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|_| ExtractError::InvalidSelector(css))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn resolve(href: &str, base_url: &Url) -> ExtractResult<Url> {
    base_url
        .join(href.trim())
        .map_err(|source| ExtractError::InvalidLink {
            href: href.to_string(),
            source,
        })
}

/// Returns the number of the last catalog page
///
/// # Example
///
/// ```
/// use tululu_fetch::crawler::extract_last_page_number;
///
/// let html = r#"<p><a class="npage" href="/l55/2">2</a><a class="npage" href="/l55/701">701</a></p>"#;
/// assert_eq!(extract_last_page_number(html).unwrap(), 701);
/// ```
pub fn extract_last_page_number(html: &str) -> ExtractResult<u32> {
    let document = Html::parse_document(html);
    let page_selector = selector(PAGE_NUMBER)?;

    let last = document
        .select(&page_selector)
        .last()
        .ok_or(ExtractError::MissingElement(PAGE_NUMBER))?;

    let text = element_text(&last);
    text.parse::<u32>()
        .map_err(|_| ExtractError::InvalidPageNumber(text))
}

/// Returns the absolute detail-page links of all books on a listing page, in page order
pub fn extract_book_links(html: &str, base_url: &Url) -> ExtractResult<Vec<String>> {
    let document = Html::parse_document(html);
    let card_selector = selector(BOOK_CARD)?;
    let link_selector = selector(LINK)?;

    let mut links = Vec::new();
    for card in document.select(&card_selector) {
        let href = card
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or(ExtractError::MissingAttribute {
                selector: BOOK_CARD,
                attr: "href",
            })?;
        links.push(resolve(href, base_url)?.to_string());
    }

    if links.is_empty() {
        return Err(ExtractError::MissingElement(BOOK_CARD));
    }

    Ok(links)
}

/// Extracts title, author, cover, comments and genres from a book detail page
pub fn extract_book_details(html: &str, base_url: &Url) -> ExtractResult<BookDetails> {
    let document = Html::parse_document(html);

    let title_selector = selector(TITLE)?;
    let heading = document
        .select(&title_selector)
        .next()
        .map(|h1| element_text(&h1))
        .ok_or(ExtractError::MissingElement(TITLE))?;

    let (title, author) = heading
        .split_once(TITLE_SEPARATOR)
        .map(|(title, author)| (title.trim().to_string(), author.trim().to_string()))
        .ok_or_else(|| ExtractError::MalformedTitle(heading.clone()))?;

    if title.is_empty() || author.contains(TITLE_SEPARATOR) {
        return Err(ExtractError::MalformedTitle(heading));
    }

    let cover_selector = selector(COVER)?;
    let cover_src = document
        .select(&cover_selector)
        .next()
        .ok_or(ExtractError::MissingElement(COVER))?
        .value()
        .attr("src")
        .ok_or(ExtractError::MissingAttribute {
            selector: COVER,
            attr: "src",
        })?;
    let cover_url = resolve(cover_src, base_url)?;

    let block_selector = selector(COMMENT_BLOCK)?;
    let text_selector = selector(COMMENT_TEXT)?;
    let comments = document
        .select(&block_selector)
        .filter_map(|block| block.select(&text_selector).next())
        .map(|span| element_text(&span))
        .collect();

    let genre_selector = selector(GENRE)?;
    let genres = document
        .select(&genre_selector)
        .map(|a| element_text(&a))
        .collect();

    Ok(BookDetails {
        title,
        author,
        cover_url,
        comments,
        genres,
    })
}
