pub mod angles;
pub mod command_list;
pub mod constants;
pub mod dc;
pub mod enrich;
pub mod geodesy;
pub mod optimize;
pub mod performance;
pub mod providers;
pub mod race;
pub mod simplify;
pub mod solrace_errors;
pub mod track;
