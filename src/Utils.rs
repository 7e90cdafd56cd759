//MIT License
/// saving sampled grids as CSV
pub mod csv_export;
/// plotting the flow-rate curve and its trapezoid panels
pub mod plots;
/// loading integration requests from TOML task files
pub mod task_parser;
