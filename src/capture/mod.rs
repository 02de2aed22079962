pub(crate) mod orchestrator;
pub(crate) mod plan;
pub(crate) mod session;
pub(crate) mod sink;
