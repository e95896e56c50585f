pub(crate) mod count;
pub(crate) mod graph;
pub(crate) mod helpers;
pub(crate) mod verify;
