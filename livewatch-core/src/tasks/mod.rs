pub mod status_sweep;

pub use status_sweep::spawn_status_sweep_task;
