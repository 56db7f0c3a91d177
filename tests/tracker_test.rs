//! Full page passes: widget placement, lookup, and final message.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use brand_owner_tracker::display::NOT_FOUND_MESSAGE;
use brand_owner_tracker::{
    dom, page, ExtractionOutcome, HttpOwnerLookup, LayoutMode, NoLookup, Options, Tracker, WidgetState,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_URL: &str = "https://www.amazon.com/dp/B00TEST123";

const BRAND_PAGE: &str = r#"<html><body>
    <div id="centerCol">
        <span id="productTitle">Air Zoom Pegasus</span>
        <div id="corePriceDisplay_desktop_feature_div"><span class="a-price">$120.00</span></div>
        <ul><li>Brand: Nike</li></ul>
    </div>
    <div id="rightCol"><div id="desktop_buybox"><div id="addToCart">Add to Cart</div></div></div>
</body></html>"#;

fn widget_text(doc: &dom::Document) -> String {
    doc.select("#brand-owner-info .brand-owner-text").text().to_string()
}

#[tokio::test]
async fn brand_page_resolves_owner_through_service() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getCompanyThatOwnsBrand/Nike"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "brand_name": "Nike",
            "owning_company_name": "Nike, Inc."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = Options {
        lookup_base_url: mock_server.uri(),
        ..Options::default()
    };
    let tracker = Tracker::from_options(options).unwrap();
    let doc = dom::parse(BRAND_PAGE);

    let report = tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert!(report.inserted);
    assert_eq!(report.outcome, ExtractionOutcome::BrandOnly { brand: "Nike".into() });
    assert_eq!(report.owner.unwrap().owning_company_name.as_deref(), Some("Nike, Inc."));
    assert_eq!(widget_text(&doc), "The brand Nike is owned by Nike, Inc.");
    assert!(!doc.select("#brand-owner-info").has_class("loading"));

    // Placed under the price, inside the price wrapper.
    assert!(doc
        .select("#corePriceDisplay_desktop_feature_div + .brand-owner-price-wrapper #brand-owner-info")
        .exists());
}

#[tokio::test]
async fn failed_lookup_reads_as_own_company() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let lookup = HttpOwnerLookup::new(&mock_server.uri(), Duration::from_secs(5)).unwrap();
    let tracker = Tracker::new(Options::default(), lookup);
    let doc = dom::parse(BRAND_PAGE);

    let report = tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert_eq!(report.owner, None);
    assert_eq!(report.message, "Nike is its own company");
}

#[tokio::test]
async fn manufacturer_page_never_calls_lookup() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let options = Options {
        lookup_base_url: mock_server.uri(),
        ..Options::default()
    };
    let tracker = Tracker::from_options(options).unwrap();
    let doc = dom::parse(
        r#"<html><body>
            <span id="productTitle">Kettle</span>
            <table><tr><th>Brand</th><td>Acme</td></tr><tr><th>Manufacturer</th><td>Acme Appliances</td></tr></table>
        </body></html>"#,
    );

    let report = tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert_eq!(report.message, "The brand Acme is manufactured by Acme Appliances");
    assert_eq!(widget_text(&doc), report.message);
}

#[tokio::test]
async fn book_page_shows_publisher() {
    let tracker = Tracker::new(Options::default(), NoLookup);
    let doc = dom::parse(
        r#"<html><body>
            <div id="wayfinding-breadcrumbs_feature_div"><a>Books</a></div>
            <span id="productTitle">My Book</span>
            <table><tr><td>Publisher</td><td>Acme Press</td></tr></table>
        </body></html>"#,
    );

    let report = tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert_eq!(report.message, "My Book is published by Acme Press");
    assert_eq!(doc.select("#brand-owner-info .brand-owner-icon").text().to_string(), "📚");
}

#[tokio::test]
async fn empty_page_shows_not_found() {
    let tracker = Tracker::new(Options::default(), NoLookup);
    let doc = dom::parse("<html><body><p>nothing here</p></body></html>");

    let report = tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert_eq!(report.state, WidgetState::NotFound);
    assert_eq!(widget_text(&doc), NOT_FOUND_MESSAGE);
    // Only the body was left, so the widget is its last child.
    assert!(doc.select("body > #brand-owner-info:last-child").exists());
}

#[tokio::test]
async fn buybox_layout_goes_into_desktop_buybox() {
    let options = Options::default().with_stored_layout(Some("buybox"));
    assert_eq!(options.layout_mode, LayoutMode::Buybox);
    let tracker = Tracker::new(options, NoLookup);
    let doc = dom::parse(BRAND_PAGE);

    let report = tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert!(report.inserted);
    assert!(doc.select("#desktop_buybox > .brand-owner-buybox-wrapper #brand-owner-info").exists());
}

#[tokio::test]
async fn custom_widget_id_is_used() {
    let options = Options {
        widget_id: "owner-badge".to_string(),
        ..Options::default()
    };
    let tracker = Tracker::new(options, NoLookup);
    let doc = dom::parse(BRAND_PAGE);

    tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert!(doc.select("#owner-badge").exists());
    assert!(doc.select("#brand-owner-info").is_empty());
}

#[tokio::test]
async fn widget_id_starting_with_digit_reaches_final_state() {
    let options = Options {
        widget_id: "1badge".to_string(),
        ..Options::default()
    };
    let tracker = Tracker::new(options, NoLookup);
    let doc = dom::parse(BRAND_PAGE);

    let first = tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert!(first.inserted);
    let text = doc.select(".brand-owner-info .brand-owner-text").text().to_string();
    assert_eq!(text, first.message);
    assert_eq!(text, "Nike is its own company");
    assert!(!doc.select(".brand-owner-info").has_class("loading"));

    // A second pass replaces the widget rather than adding another.
    tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert_eq!(doc.select(".brand-owner-info").length(), 1);
}

#[tokio::test]
async fn latin1_page_from_bytes() {
    let bytes = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><ul><li>Brand: Nestl\xE9</li></ul></body></html>";
    let doc = page::parse_bytes(bytes);
    let tracker = Tracker::new(Options::default(), NoLookup);

    let report = tracker.process(&doc, PRODUCT_URL).await.unwrap();
    assert_eq!(report.outcome, ExtractionOutcome::BrandOnly { brand: "Nestlé".into() });
}
