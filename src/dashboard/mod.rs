pub mod analysis;
pub mod cache;
pub mod command;
pub mod model;
pub mod paginate;
pub mod reconcile;
pub mod remote;
pub mod task;
