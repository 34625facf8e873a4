pub mod authorization;
pub mod catalog;
pub mod experiments;
pub mod invocation;
pub mod modes;
pub mod shared;
pub mod workflow;
