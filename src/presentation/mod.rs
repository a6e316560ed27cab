pub mod carousel;
pub mod landing;
pub mod splash;

pub use carousel::{triage_carousel, Carousel, EmptyCarousel, TriageSlide};
pub use landing::{Feature, Hero, FEATURES, HERO, PRODUCT_NAME, TAGLINE};
pub use splash::{SplashSequence, SplashStage};
