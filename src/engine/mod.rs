pub(crate) mod grid;
pub(crate) mod session;
pub(crate) mod spawn;
pub(crate) mod tile;
