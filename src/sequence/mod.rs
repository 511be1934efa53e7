pub(crate) mod order;
pub(crate) mod scan;
