pub mod allocate_cmd;
pub mod config_cmd;
pub mod output;
pub mod renderer;
pub mod scenario_cmd;
