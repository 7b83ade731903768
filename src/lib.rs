//! Deterministic runtime for the interactive widgets of a static menu page:
//! a navigation search overlay with a live row filter, and independent
//! accordion panels.
//!
//! The widgets run against an in-memory DOM, so their behavior can be
//! exercised and asserted from plain Rust tests without a browser. A [`Page`]
//! is parsed from HTML, controllers are installed against it once, and user
//! events (click, keyup, submit) are driven through the same synchronous
//! dispatch a browser event loop would provide.
//!
//! ```
//! use vanilla_widgets::{Page, Result, SearchOverlayConfig};
//!
//! fn main() -> Result<()> {
//!     let html = r#"
//!         <nav class='p-navigation'>
//!           <button class='js-search-button'>Search</button>
//!           <form class='p-search-box'>
//!             <input class='p-search-box__input'>
//!             <button class='p-search-box__reset' type='reset'>Clear</button>
//!           </form>
//!           <div class='p-navigation__search-overlay'></div>
//!         </nav>
//!         <div class='grid p-strip'>
//!           <div id='fizz' class='drink'>Gin Fizz</div>
//!           <div id='punch' class='drink'>Rum Punch</div>
//!         </div>
//!         "#;
//!
//!     let mut page = Page::from_html(html)?;
//!     page.install_search_overlay(SearchOverlayConfig::default())?;
//!
//!     page.click(".js-search-button")?;
//!     page.assert_has_class(".p-navigation", "has-search-open")?;
//!     page.assert_focused(".p-search-box__input")?;
//!
//!     page.type_text(".p-search-box__input", "gin")?;
//!     page.assert_visible("#fizz")?;
//!     page.assert_hidden("#punch")?;
//!     Ok(())
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;

mod accordion;
mod dom;
mod html;
mod page;
mod search;
mod selector;

pub use accordion::AccordionConfig;
pub use page::Page;
pub use search::{OverlayPhase, SearchOverlayConfig};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    MissingElement {
        component: String,
        selector: String,
    },
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::MissingElement {
                component,
                selector,
            } => write!(
                f,
                "{component} initialization failed: required element {selector} is missing"
            ),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}
