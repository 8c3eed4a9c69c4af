pub mod text_normalizer;
pub mod timestamp_resolver;
pub mod token_index;
pub mod word_locator;
