pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod error;
pub mod export;
pub mod git;
pub mod model;
pub mod oracle;
pub mod run;
pub mod sample;
pub mod util;
