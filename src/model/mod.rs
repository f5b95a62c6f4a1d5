pub(crate) mod slot;
