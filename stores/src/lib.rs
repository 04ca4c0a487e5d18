pub mod catalog;
pub mod composer;
pub mod observable;
pub mod session;
