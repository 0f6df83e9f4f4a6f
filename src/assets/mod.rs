pub(crate) mod layer;
pub(crate) mod library;
pub(crate) mod registry;
