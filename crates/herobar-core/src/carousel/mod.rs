//! Hero carousel: page table, cursor and auto-advance clock

mod clock;
mod pages;

pub use clock::CarouselClock;
pub use pages::{default_pages, Carousel, Page, PageTargetPolicy};
