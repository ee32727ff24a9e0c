pub mod automation_loop;

pub use automation_loop::use_automation_loop;
