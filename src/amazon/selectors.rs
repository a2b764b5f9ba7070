//! CSS selectors for Amazon HTML parsing.
//!
//! All selectors used by the parser live here so that markup changes on
//! Amazon's side only need to be fixed in one place.
//!
//! **Update process**: when parsing fails, capture an HTML sample, update the
//! selector, and add a fixture under `tests/fixtures/`.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for search results pages.
pub mod search {
    use super::*;

    /// Product card container - main search result item.
    pub static RESULT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-component-type='s-search-result']").unwrap());

    /// ASIN attribute on result card.
    pub static ASIN_ATTR: &str = "data-asin";

    /// Product title text.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "h2 a span, \
             h2 span.a-text-normal, \
             .a-size-medium.a-text-normal",
        )
        .unwrap()
    });

    /// Title link for URL extraction.
    pub static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "h2 a.a-link-normal, \
             h2 a.s-link-style, \
             h2 a",
        )
        .unwrap()
    });

    pub static IMAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img.s-image, .s-product-image-container img").unwrap());

    /// Current price (offscreen text is the full formatted price).
    pub static PRICE_CURRENT: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".a-price:not([data-a-strike]) .a-offscreen, \
             .a-price .a-offscreen",
        )
        .unwrap()
    });

    /// Whole price part, used when the offscreen text is missing.
    pub static PRICE_WHOLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-price-whole").unwrap());

    /// Original price (strikethrough).
    pub static PRICE_ORIGINAL: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".a-price[data-a-strike] .a-offscreen, \
             .a-text-price .a-offscreen",
        )
        .unwrap()
    });

    pub static PRICE_RANGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".a-price-range, .a-price + .a-price").unwrap());

    /// Star rating text ("4.5 out of 5 stars").
    pub static RATING_STARS: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "i.a-icon-star-small span.a-icon-alt, \
             i.a-icon-star span.a-icon-alt, \
             span.a-icon-alt",
        )
        .unwrap()
    });

    pub static RATING_COUNT: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "span.a-size-base.s-underline-text, \
             a[href*='customerReviews'] span",
        )
        .unwrap()
    });

    pub static PRIME_BADGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("i.a-icon-prime, [data-component-type='s-prime-badge']").unwrap()
    });

    pub static SPONSORED: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(".puis-label-popover-default, .s-label-popover-default").unwrap()
    });

    pub static AMAZON_CHOICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-component-type='s-merchandised-badge']").unwrap());

    pub static BRAND: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "h5.s-line-clamp-1 span, \
             .a-row.a-size-base.a-color-secondary span",
        )
        .unwrap()
    });

    /// Result count banner ("1-48 of over 10,000 results").
    pub static TOTAL_RESULTS: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".a-section.a-spacing-small span:first-child, \
             .sg-col-inner .a-section span",
        )
        .unwrap()
    });

    pub static NEXT_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("a.s-pagination-next, .s-pagination-item.s-pagination-next").unwrap()
    });
}

/// Selectors for product detail pages.
pub mod product {
    use super::*;

    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#productTitle, #title span").unwrap());

    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#corePrice_feature_div .a-price .a-offscreen, \
             #priceblock_ourprice, \
             #priceblock_dealprice, \
             .a-price .a-offscreen",
        )
        .unwrap()
    });

    pub static PRICE_WHOLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-price-whole").unwrap());

    pub static PRICE_ORIGINAL: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#corePrice_feature_div .a-text-price .a-offscreen, \
             .a-text-price .a-offscreen",
        )
        .unwrap()
    });

    pub static RATING: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#acrPopover span.a-icon-alt, \
             .a-icon-star span.a-icon-alt, \
             span.a-icon-alt",
        )
        .unwrap()
    });

    pub static REVIEW_COUNT: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("#acrCustomerReviewText, #acrCustomerReviewLink span").unwrap()
    });

    pub static BRAND: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#bylineInfo, .po-brand .po-break-word").unwrap());

    /// "About this item" bullet points.
    pub static FEATURES: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#feature-bullets ul li span").unwrap());

    pub static AVAILABILITY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#availability").unwrap());
}

/// Selectors for customer review pages (`/product-reviews/{asin}`).
pub mod reviews {
    use super::*;

    /// One review block.
    pub static REVIEW: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div[data-hook='review']").unwrap());

    /// Star icon ("5.0 out of 5 stars").
    pub static STAR_RATING: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "i[data-hook='review-star-rating'], \
             i[data-hook='cmps-review-star-rating']",
        )
        .unwrap()
    });

    /// Title container, which also wraps the star icon.
    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-hook='review-title']").unwrap());

    /// Title text without the star icon.
    pub static TITLE_TEXT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-hook='review-title'] > span:last-child").unwrap());

    pub static BODY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span[data-hook='review-body']").unwrap());

    pub static DATE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span[data-hook='review-date']").unwrap());

    pub static VERIFIED_BADGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span[data-hook='avp-badge']").unwrap());

    pub static NEXT_PAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("li.a-last a").unwrap());
}

/// Selectors for the navigation bar (session checks).
pub mod nav {
    use super::*;

    /// Greeting line ("Hello, sign in" / "Hello, Jane").
    pub static ACCOUNT_GREETING: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#nav-link-accountList-nav-line-1").unwrap());
}

/// Selectors for detecting error/captcha pages.
pub mod errors {
    use super::*;

    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("form[action*='validateCaptcha'], img[src*='captcha']").unwrap()
    });

    /// Dog page (Amazon's 503 error page).
    pub static DOG_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("img[alt*='dog'], .a-box-inner a[href='/ref=cs_503_link']").unwrap()
    });
}
