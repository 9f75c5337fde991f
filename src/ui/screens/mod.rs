pub(crate) mod dashboard;
pub(crate) mod form;
pub(crate) mod history;
