pub use airdata::*;

mod airdata;
