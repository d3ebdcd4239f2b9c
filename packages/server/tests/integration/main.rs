mod common;
mod execute;
mod interviews;
mod problems;
mod reports;
mod submissions;
