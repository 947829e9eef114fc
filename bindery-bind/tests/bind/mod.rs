mod fixtures;

mod errors;
mod injectables;
mod merge_with_null;
