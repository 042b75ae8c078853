pub mod logging;
pub mod matcher;
pub mod model;
pub mod review;
pub mod store;
