//! This client fetches the bin collection page and parses it into a collection result.

use reqwest::{
    header::{COOKIE, USER_AGENT},
    Client,
};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error};

use crate::collection::{CollectionResult, UNKNOWN};

static URL: &str = "https://eform.southoxon.gov.uk/ebase/BINZONE_DESKTOP.eb";
static QUERY: [(&str, &str); 2] = [("SOVA_TAG", "VALE"), ("ebd", "0")];
static BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";

static SELECTOR_EXTRA_INFO: &str = "div.binextra";
static SELECTOR_TYPE_INFO: &str = "div.bintxt";
static SELECTOR_EMPHASIS: &str = "strong";
static SELECTOR_HEADING: &str = "h2";

/// Client for the council's bin zone page.
#[derive(Debug, Clone)]
pub struct BinClient {
    client: Client,
    url: String,
}

impl BinClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: String::from(URL),
        }
    }

    /// Point the client at another endpoint.
    pub(crate) fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Get the next collection for a property.
    ///
    /// Any network or HTTP error yields [`CollectionResult::fetch_error`].
    pub async fn get(&self, uprn: &str) -> CollectionResult {
        match self.get_html(uprn).await {
            Ok(html) => parse(&html),
            Err(err) => {
                error!(error = %err, "error fetching bin collection data");
                CollectionResult::fetch_error()
            }
        }
    }

    /// Get the bin zone HTML from the official server.
    async fn get_html(&self, uprn: &str) -> reqwest::Result<String> {
        debug!(url = %self.url, "requesting bin collection page");
        let response = self
            .client
            .get(&self.url)
            .query(&QUERY)
            .header(COOKIE, cookie(uprn))
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}

/// The cookie selecting a property, `:` and `@` are already percent-encoded.
fn cookie(uprn: &str) -> String {
    format!("SVBINZONE=VALE%3AUPRN%40{uprn}")
}

/// Parse the bin zone HTML to a collection result.
///
/// Missing or unexpected markup falls back to [`UNKNOWN`] values.
pub fn parse(html: &str) -> CollectionResult {
    let dom = Html::parse_document(html);
    let root = dom.root_element();
    let (day, special_message) = first(root, SELECTOR_EXTRA_INFO)
        .map(parse_extra_info)
        .unwrap_or_default();
    let kind = first(root, SELECTOR_TYPE_INFO)
        .and_then(|type_info| first(type_info, SELECTOR_HEADING))
        .map(trimmed_text)
        .filter(|kind| !kind.is_empty());
    CollectionResult::new(
        day.unwrap_or_else(|| String::from(UNKNOWN)),
        kind.unwrap_or_else(|| String::from(UNKNOWN)),
        special_message,
    )
}

/// Extract the day and the optional special message from the extra info block.
fn parse_extra_info(extra_info: ElementRef<'_>) -> (Option<String>, Option<String>) {
    match first(extra_info, SELECTOR_EMPHASIS) {
        Some(emphasis) => {
            let day = text_after_line_break(extra_info, emphasis).and_then(truncate_day);
            (day, Some(trimmed_text(emphasis)))
        }
        None => (truncate_day(&trimmed_text(extra_info)), None),
    }
}

/// Find the text node right after the first `<br>` following the emphasis.
fn text_after_line_break<'a>(
    extra_info: ElementRef<'a>,
    emphasis: ElementRef<'a>,
) -> Option<&'a str> {
    let line_break = extra_info
        .descendants()
        .skip_while(|node| node.id() != emphasis.id())
        .skip(1)
        .find(|node| {
            node.value()
                .as_element()
                .is_some_and(|element| element.name() == "br")
        })?;
    line_break
        .next_sibling()?
        .value()
        .as_text()
        .map(|text| &**text)
}

/// Cut the day description at the first hyphen.
fn truncate_day(text: &str) -> Option<String> {
    let day = text.split_once('-').map_or(text, |(day, _)| day).trim();
    if day.is_empty() {
        return None;
    }
    Some(String::from(day))
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

fn first<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let found = element.select(&selector).next();
    found
}
