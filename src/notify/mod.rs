pub(crate) mod notice;
