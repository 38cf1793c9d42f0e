//! Hero page table and the cyclic page cursor

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::style::{Gradient, Rgba};
use crate::{Error, Result};

/// One hero carousel page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    #[serde(default)]
    pub subtitle: Vec<String>,
    /// Image asset reference, resolved by the renderer
    pub image: String,
    pub gradient: Gradient,
}

/// How an out-of-range swipe target is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTargetPolicy {
    /// Target is taken modulo the page count
    #[default]
    Wrap,
    /// Target is clamped to the last page
    Clamp,
    /// Target is refused and the current page kept
    Reject,
}

/// Ordered, non-empty, cyclic page sequence with a cursor
#[derive(Debug, Clone)]
pub struct Carousel {
    pages: Vec<Page>,
    current: usize,
    policy: PageTargetPolicy,
}

impl Carousel {
    pub fn new(pages: Vec<Page>, policy: PageTargetPolicy) -> Result<Self> {
        if pages.is_empty() {
            return Err(Error::EmptyPages);
        }
        Ok(Self {
            pages,
            current: 0,
            policy,
        })
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false; the constructor refuses empty sequences
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Advance one page, wrapping at the end. Returns the new index.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.pages.len();
        debug!(page = self.current, "Carousel advanced");
        self.current
    }

    /// Resolve a swipe target against the configured policy without moving
    pub fn resolve(&self, target: usize) -> Result<usize> {
        let len = self.pages.len();
        if target < len {
            return Ok(target);
        }
        match self.policy {
            PageTargetPolicy::Wrap => Ok(target % len),
            PageTargetPolicy::Clamp => Ok(len - 1),
            PageTargetPolicy::Reject => Err(Error::PageOutOfRange { index: target, len }),
        }
    }

    /// Jump to `target`. Returns the index actually selected.
    pub fn select(&mut self, target: usize) -> Result<usize> {
        match self.resolve(target) {
            Ok(index) => {
                self.current = index;
                debug!(target, page = index, "Carousel page selected");
                Ok(index)
            }
            Err(e) => {
                warn!(target, "Rejected carousel target: {}", e);
                Err(e)
            }
        }
    }
}

/// The three pages shipped with the app
pub fn default_pages() -> Vec<Page> {
    let subtitle = vec![
        "One Qualification.".to_string(),
        "Endless Global Opportunities".to_string(),
    ];
    vec![
        Page {
            title: "Dip IFR".to_string(),
            subtitle: subtitle.clone(),
            image: "pic2".to_string(),
            gradient: Gradient::diagonal(vec![
                Rgba::rgb(0x20, 0x51, 0x88),
                Rgba::rgb(0x64, 0xae, 0xde),
            ]),
        },
        Page {
            title: "2nd Page".to_string(),
            subtitle: subtitle.clone(),
            image: "pic2".to_string(),
            gradient: Gradient::diagonal(vec![
                Rgba::rgb(0xaf, 0x52, 0xde),
                Rgba::rgb(0xff, 0x2d, 0x55),
            ]),
        },
        Page {
            title: "3rd Page".to_string(),
            subtitle,
            image: "pic2".to_string(),
            gradient: Gradient::diagonal(vec![
                Rgba::rgb(0xff, 0x3b, 0x30),
                Rgba::rgb(0xff, 0x95, 0x00),
            ]),
        },
    ]
}
