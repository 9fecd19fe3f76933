pub(crate) mod import;
pub(crate) mod query;
