pub(crate) mod discover;
pub(crate) mod jobs;
pub(crate) mod report;
