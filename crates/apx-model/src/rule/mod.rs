mod selector;
pub use selector::Selector;

mod extraction;
pub use extraction::ExtractionRule;
